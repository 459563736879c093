//! Session assembly from selected exercises and their planned sets.

use crate::{Error, Exercise, ExerciseSet, Result, Session, Set};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Build a planned session, keeping exercises in the order given
///
/// Every exercise needs at least one set with `min_reps <= max_reps`, and no
/// exercise may appear twice. Breaking either is a bug upstream, reported as
/// [`Error::Invariant`].
pub fn assemble(date: NaiveDate, planned: Vec<(Exercise, Vec<Set>)>) -> Result<Session> {
    let mut seen = HashSet::new();
    let mut exercise_sets = Vec::with_capacity(planned.len());

    for (exercise, sets) in planned {
        if !seen.insert(exercise.id.clone()) {
            return Err(Error::Invariant(format!(
                "{} selected twice for {}",
                exercise.id, date
            )));
        }
        if sets.is_empty() {
            return Err(Error::Invariant(format!(
                "{} has no planned sets",
                exercise.id
            )));
        }
        if let Some(bad) = sets.iter().find(|s| s.min_reps > s.max_reps) {
            return Err(Error::Invariant(format!(
                "{} planned with min reps {} above max reps {}",
                exercise.id, bad.min_reps, bad.max_reps
            )));
        }

        exercise_sets.push(ExerciseSet {
            exercise_id: exercise.id,
            sets,
            warmup_completed_at: None,
        });
    }

    Ok(Session::planned(date, exercise_sets))
}
