//! Exercise selection for a planned session.
//!
//! Selection runs in three passes over the category-filtered pool:
//!
//! 1. **Continuity**: carry over most of the exercises from the last
//!    completed session on the same weekday, compound movements first
//! 2. **Coverage**: fill open slots with exercises hitting target muscle
//!    groups nothing selected so far trains
//! 3. **Random fill**: shuffle whatever is left and take from the front
//!
//! Passes 2 and 3 run first over exercises not trained recently, then over
//! the recently trained ones.

use crate::config::SelectionConfig;
use crate::{Category, Error, Exercise, HistoryIndex, Result, Session};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Share of the session carried over from the continuity anchor
pub const CONTINUITY_RATIO: f64 = 0.8;

/// Primary muscle groups needed for an exercise to count as compound
pub const COMPOUND_MIN_PRIMARY: usize = 2;

/// Exercises trained within this many days are deprioritized
pub const RECENT_WINDOW_DAYS: i64 = 14;

/// Exercises in a full body session
pub const FULL_BODY_COUNT: usize = 6;

/// Exercises in an upper or lower session
pub const SPLIT_COUNT: usize = 5;

/// Smallest selection that still makes a session
pub const MIN_SESSION_EXERCISES: usize = 1;

const UPPER_TARGETS: &[&str] = &["Chest", "Back", "Shoulders", "Biceps", "Triceps"];
const LOWER_TARGETS: &[&str] = &["Quadriceps", "Hamstrings", "Glutes", "Calves"];

/// Muscle groups a session of `category` should cover
pub fn target_muscles(category: Category) -> Vec<&'static str> {
    match category {
        Category::Upper => UPPER_TARGETS.to_vec(),
        Category::Lower => LOWER_TARGETS.to_vec(),
        Category::FullBody => UPPER_TARGETS.iter().chain(LOWER_TARGETS).copied().collect(),
    }
}

/// Number of exercises a session of `category` should contain
pub fn target_count(category: Category, config: &SelectionConfig) -> usize {
    match category {
        Category::FullBody => config.full_body_count,
        Category::Upper | Category::Lower => config.split_count,
    }
}

/// Pick the exercises for a `category` session on `date`
///
/// The result is ordered: continuity carry-overs first, then fills in the
/// order they were chosen. It never holds more than the target count and
/// never repeats an exercise.
pub fn select_exercises<R: Rng + ?Sized>(
    pool: &[Exercise],
    category: Category,
    date: NaiveDate,
    history: &HistoryIndex<'_>,
    config: &SelectionConfig,
    rng: &mut R,
) -> Result<Vec<Exercise>> {
    if pool.is_empty() {
        return Err(Error::EmptyPool);
    }

    let candidates: Vec<&Exercise> = pool
        .iter()
        .filter(|e| category.admits(e.category))
        .collect();

    if candidates.is_empty() {
        return Err(Error::NoExercisesForCategory(category));
    }

    let target = target_count(category, config);

    let mut selected = match history.latest_same_weekday(date) {
        Some(anchor) => continuity_picks(&candidates, anchor, target, config),
        None => Vec::new(),
    };
    tracing::debug!(
        "Carried over {} exercises from the last {} session",
        selected.len(),
        date.format("%A")
    );

    let recent = history.trained_since(date - Duration::days(config.recent_window_days));
    let chosen: HashSet<&str> = selected.iter().map(|e| e.id.as_str()).collect();
    let (stale, fresh): (Vec<&Exercise>, Vec<&Exercise>) = candidates
        .iter()
        .copied()
        .filter(|e| !chosen.contains(e.id.as_str()))
        .partition(|e| recent.contains(e.id.as_str()));

    let targets = target_muscles(category);
    for (tier, label) in [(fresh, "fresh"), (stale, "recent")] {
        if selected.len() >= target {
            break;
        }
        let before = selected.len();
        fill_from_tier(tier, &targets, target, &mut selected, rng);
        tracing::debug!(
            "Filled {} slots from {} exercises",
            selected.len() - before,
            label
        );
    }

    if selected.len() < MIN_SESSION_EXERCISES {
        return Err(Error::InsufficientSelection {
            selected: selected.len(),
            minimum: MIN_SESSION_EXERCISES,
        });
    }

    tracing::info!(
        "Selected {} of {} {} candidates",
        selected.len(),
        candidates.len(),
        category
    );

    Ok(selected.into_iter().cloned().collect())
}

/// Exercises carried over from the continuity anchor
fn continuity_picks<'p>(
    candidates: &[&'p Exercise],
    anchor: &Session,
    target: usize,
    config: &SelectionConfig,
) -> Vec<&'p Exercise> {
    let quota = ((target as f64) * config.continuity_ratio).ceil() as usize;
    let quota = quota.min(target).min(anchor.exercise_sets.len());

    let from_anchor: Vec<&Exercise> = anchor
        .exercise_sets
        .iter()
        .filter_map(|es| candidates.iter().find(|e| e.id == es.exercise_id).copied())
        .collect();

    let min_primary = config.compound_min_primary;
    let compound = from_anchor
        .iter()
        .filter(|e| e.primary_muscles.len() >= min_primary);
    let isolation = from_anchor
        .iter()
        .filter(|e| e.primary_muscles.len() < min_primary);

    let mut seen = HashSet::new();
    compound
        .chain(isolation)
        .copied()
        .filter(|e| seen.insert(e.id.as_str()))
        .take(quota)
        .collect()
}

/// Fill open slots from one tier: coverage first, then shuffled order
fn fill_from_tier<'p, R: Rng + ?Sized>(
    mut tier: Vec<&'p Exercise>,
    targets: &[&str],
    target: usize,
    selected: &mut Vec<&'p Exercise>,
    rng: &mut R,
) {
    tier.shuffle(rng);

    for &exercise in &tier {
        if selected.len() >= target {
            return;
        }
        let uncovered: Vec<&str> = targets
            .iter()
            .copied()
            .filter(|m| !selected.iter().any(|s| s.trains(m)))
            .collect();
        if uncovered.iter().any(|m| exercise.trains(m)) {
            selected.push(exercise);
        }
    }

    for exercise in tier {
        if selected.len() >= target {
            return;
        }
        if !selected.iter().any(|s| s.id == exercise.id) {
            selected.push(exercise);
        }
    }
}
