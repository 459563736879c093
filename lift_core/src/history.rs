//! Indexed view over completed training history.
//!
//! The planner only ever looks at sessions that were completed before the
//! target date. They are held newest first in a plain vector so every
//! "most recent" lookup is a deterministic linear scan.

use crate::{ExerciseSet, Experience, FeedbackLevel, Phase, Session};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, HashSet};

/// Read-only lookups over a borrowed history slice
#[derive(Clone, Debug)]
pub struct HistoryIndex<'a> {
    as_of: NaiveDate,
    sessions: Vec<&'a Session>,
    by_date: BTreeMap<NaiveDate, &'a Session>,
}

impl<'a> HistoryIndex<'a> {
    /// Index the completed sessions dated strictly before `as_of`
    ///
    /// Sessions are ordered by date, newest first; when two share a date the
    /// later completion wins.
    pub fn build(history: &'a [Session], as_of: NaiveDate) -> Self {
        let mut sessions: Vec<&Session> = history
            .iter()
            .filter(|s| s.is_completed() && s.date < as_of)
            .collect();

        sessions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.completed_at.cmp(&a.completed_at))
        });

        let mut by_date = BTreeMap::new();
        for session in &sessions {
            by_date.entry(session.date).or_insert(*session);
        }

        tracing::debug!(
            "Indexed {} completed sessions before {} ({} supplied)",
            sessions.len(),
            as_of,
            history.len()
        );

        Self {
            as_of,
            sessions,
            by_date,
        }
    }

    /// Completed sessions, newest first
    pub fn sessions(&self) -> &[&'a Session] {
        &self.sessions
    }

    /// Whether `date` holds a completed session
    pub fn was_completed(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// The last time `exercise_id` was performed
    pub fn latest_exercise_set(&self, exercise_id: &str) -> Option<&'a ExerciseSet> {
        self.sessions
            .iter()
            .find_map(|s| s.exercise_set(exercise_id))
    }

    /// Rating of the most recent session that included `exercise_id`
    ///
    /// Returns `None` when that session was never rated; older ratings are
    /// not consulted.
    pub fn latest_feedback(&self, exercise_id: &str) -> Option<FeedbackLevel> {
        self.sessions
            .iter()
            .find(|s| s.exercise_set(exercise_id).is_some())
            .and_then(|s| s.difficulty_rating)
            .and_then(FeedbackLevel::from_rating)
    }

    /// Most recent completed session on the same weekday as `date`
    pub fn latest_same_weekday(&self, date: NaiveDate) -> Option<&'a Session> {
        let weekday = date.weekday();
        self.sessions
            .iter()
            .find(|s| s.date < date && s.date.weekday() == weekday)
            .copied()
    }

    /// Date of the oldest completed session
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.sessions.last().map(|s| s.date)
    }

    /// Training age relative to the index date
    pub fn experience(&self, beginner_days: i64) -> Experience {
        match self.earliest_date() {
            Some(first) if self.as_of - first >= Duration::days(beginner_days) => {
                Experience::Experienced
            }
            _ => Experience::Beginner,
        }
    }

    /// IDs of exercises performed on or after `cutoff`
    pub fn trained_since(&self, cutoff: NaiveDate) -> HashSet<&'a str> {
        self.sessions
            .iter()
            .take_while(|s| s.date >= cutoff)
            .flat_map(|s| s.exercise_sets.iter().map(|es| es.exercise_id.as_str()))
            .collect()
    }

    /// Consecutive most-recent attempts at `exercise_id` that hit max reps in `phase`
    ///
    /// Scans newest to oldest over sessions containing the exercise and stops
    /// at the first attempt that missed max reps or was in another phase.
    pub fn max_streak(&self, exercise_id: &str, phase: Phase) -> usize {
        self.sessions
            .iter()
            .filter_map(|s| s.exercise_set(exercise_id))
            .take_while(|es| es.all_hit_max() && Phase::infer(es) == Some(phase))
            .count()
    }
}
