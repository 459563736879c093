//! Split scheduling: which body region a given day trains.
//!
//! The rules are a fixed priority chain rather than a rotation:
//!
//! 1. **Rest day** → full body (filler plan)
//! 2. **Training tomorrow** → lower body first
//! 3. **Trained yesterday** → upper body (assume yesterday was lower)
//! 4. Otherwise → full body

use crate::{Category, HistoryIndex, Preferences};
use chrono::{Datelike, NaiveDate};

/// Decide the workout category for `date`
pub fn determine_category(
    preferences: &Preferences,
    history: &HistoryIndex<'_>,
    date: NaiveDate,
) -> Category {
    if !preferences.is_training_day(date.weekday()) {
        tracing::info!("{} is not a training day, planning full body", date);
        return Category::FullBody;
    }

    // Tomorrow is checked before yesterday on purpose.
    if preferences.is_training_day(date.weekday().succ()) {
        tracing::info!("Training again tomorrow, planning lower body for {}", date);
        return Category::Lower;
    }

    let trained_yesterday = date
        .pred_opt()
        .is_some_and(|yesterday| history.was_completed(yesterday));
    if trained_yesterday {
        tracing::info!("Trained yesterday, planning upper body for {}", date);
        return Category::Upper;
    }

    tracing::info!("Standalone training day, planning full body for {}", date);
    Category::FullBody
}
