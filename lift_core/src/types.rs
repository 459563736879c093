//! Core domain types for the Lift planner.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their categories
//! - Sets, per-exercise set lists and sessions
//! - Weekly training preferences

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Exercise Types
// ============================================================================

/// Body region a workout (or exercise) targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FullBody,
    Upper,
    Lower,
}

impl Category {
    /// Parse a category label, falling back to full body for anything unknown
    pub fn from_label(label: &str) -> Category {
        match label.trim().to_lowercase().as_str() {
            "upper" | "upper_body" => Category::Upper,
            "lower" | "lower_body" => Category::Lower,
            "full_body" | "full" | "fullbody" => Category::FullBody,
            other => {
                tracing::warn!("Unknown category {:?}, defaulting to full_body", other);
                Category::FullBody
            }
        }
    }

    /// Whether an exercise of `exercise` category may appear in a session of this category
    pub fn admits(self, exercise: Category) -> bool {
        match self {
            Category::FullBody => true,
            Category::Upper | Category::Lower => self == exercise,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::FullBody => write!(f, "full_body"),
            Category::Upper => write!(f, "upper"),
            Category::Lower => write!(f, "lower"),
        }
    }
}

/// How an exercise is loaded
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    Weighted,
    Bodyweight,
}

/// An exercise definition (e.g., "Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub exercise_type: ExerciseType,
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Exercise {
    /// Whether `muscle` is one of this exercise's primary muscle groups
    pub fn trains(&self, muscle: &str) -> bool {
        self.primary_muscles
            .iter()
            .any(|m| m.eq_ignore_ascii_case(muscle))
    }
}

// ============================================================================
// Set Types
// ============================================================================

/// Load carried by a set
///
/// Bodyweight sets carry no weight at all; weighted sets always carry a
/// value, which may be zero while the user has yet to pick a working weight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Load {
    Bodyweight,
    Weighted(f64),
}

impl Load {
    /// Starting load for an exercise with no history
    pub fn initial(exercise_type: ExerciseType) -> Load {
        match exercise_type {
            ExerciseType::Weighted => Load::Weighted(0.0),
            ExerciseType::Bodyweight => Load::Bodyweight,
        }
    }

    /// Weight in kilograms, if this is a weighted load
    pub fn kg(&self) -> Option<f64> {
        match self {
            Load::Weighted(kg) => Some(*kg),
            Load::Bodyweight => None,
        }
    }
}

/// A single planned or performed set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Set {
    pub load: Load,
    pub min_reps: u32,
    pub max_reps: u32,
    #[serde(default)]
    pub completed_reps: Option<u32>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Set {
    /// A fresh, unperformed set
    pub fn planned(load: Load, min_reps: u32, max_reps: u32) -> Self {
        Self {
            load,
            min_reps,
            max_reps,
            completed_reps: None,
            completed_at: None,
        }
    }

    /// Completed reps reached the top of the range
    pub fn hit_max(&self) -> bool {
        self.completed_reps.is_some_and(|r| r >= self.max_reps)
    }

    /// Completed reps fell short of the bottom of the range
    pub fn failed(&self) -> bool {
        self.completed_reps.is_some_and(|r| r < self.min_reps)
    }
}

/// One exercise's sets within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseSet {
    pub exercise_id: String,
    pub sets: Vec<Set>,
    #[serde(default)]
    pub warmup_completed_at: Option<DateTime<Utc>>,
}

impl ExerciseSet {
    /// Every set was performed at or above its max reps
    pub fn all_hit_max(&self) -> bool {
        !self.sets.is_empty() && self.sets.iter().all(Set::hit_max)
    }
}

// ============================================================================
// Session Types
// ============================================================================

/// Lifecycle position of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Planned,
    Started,
    Completed,
}

/// One calendar day's training session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub date: NaiveDate,
    #[serde(default)]
    pub difficulty_rating: Option<u8>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub exercise_sets: Vec<ExerciseSet>,
}

impl Session {
    /// A session in the planned state
    pub fn planned(date: NaiveDate, exercise_sets: Vec<ExerciseSet>) -> Self {
        Self {
            date,
            difficulty_rating: None,
            started_at: None,
            completed_at: None,
            exercise_sets,
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.completed_at.is_some() {
            SessionStatus::Completed
        } else if self.started_at.is_some() {
            SessionStatus::Started
        } else {
            SessionStatus::Planned
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Find the sets planned for an exercise
    pub fn exercise_set(&self, exercise_id: &str) -> Option<&ExerciseSet> {
        self.exercise_sets
            .iter()
            .find(|es| es.exercise_id == exercise_id)
    }

    /// Mark the session started (no-op if it already is)
    pub fn start(&mut self, at: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(at);
        }
    }

    /// Record completed reps for an exercise, one value per set in order
    pub fn record_reps(&mut self, exercise_id: &str, reps: &[u32], at: DateTime<Utc>) -> Result<()> {
        if self.is_completed() {
            return Err(Error::Store(format!(
                "session {} is already completed",
                self.date
            )));
        }

        let exercise_set = self
            .exercise_sets
            .iter_mut()
            .find(|es| es.exercise_id == exercise_id)
            .ok_or_else(|| {
                Error::Store(format!("{} is not part of session {}", exercise_id, self.date))
            })?;

        if reps.len() > exercise_set.sets.len() {
            return Err(Error::Store(format!(
                "{} has {} sets, got {} rep counts",
                exercise_id,
                exercise_set.sets.len(),
                reps.len()
            )));
        }

        for (set, &count) in exercise_set.sets.iter_mut().zip(reps) {
            set.completed_reps = Some(count);
            set.completed_at = Some(at);
        }

        self.start(at);
        Ok(())
    }

    /// Mark the session completed with a 1-5 difficulty rating
    pub fn finish(&mut self, at: DateTime<Utc>, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(Error::Other(format!(
                "difficulty rating must be between 1 and 5, got {}",
                rating
            )));
        }
        self.start(at);
        self.completed_at = Some(at);
        self.difficulty_rating = Some(rating);
        Ok(())
    }
}

// ============================================================================
// Preference Types
// ============================================================================

/// Availability for one weekday: either a flag or planned minutes
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TrainingDay {
    Flag(bool),
    Minutes(u32),
}

impl Default for TrainingDay {
    fn default() -> Self {
        TrainingDay::Flag(false)
    }
}

impl TrainingDay {
    pub fn is_training(&self) -> bool {
        match self {
            TrainingDay::Flag(flag) => *flag,
            TrainingDay::Minutes(minutes) => *minutes > 0,
        }
    }
}

/// Weekly training availability
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preferences {
    #[serde(default)]
    pub monday: TrainingDay,
    #[serde(default)]
    pub tuesday: TrainingDay,
    #[serde(default)]
    pub wednesday: TrainingDay,
    #[serde(default)]
    pub thursday: TrainingDay,
    #[serde(default)]
    pub friday: TrainingDay,
    #[serde(default)]
    pub saturday: TrainingDay,
    #[serde(default)]
    pub sunday: TrainingDay,
}

impl Preferences {
    /// Preferences with exactly the given weekdays marked as training days
    pub fn with_training_days(days: &[Weekday]) -> Self {
        let mut prefs = Self::default();
        for day in days {
            *prefs.day_mut(*day) = TrainingDay::Flag(true);
        }
        prefs
    }

    pub fn day(&self, weekday: Weekday) -> TrainingDay {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    fn day_mut(&mut self, weekday: Weekday) -> &mut TrainingDay {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    pub fn is_training_day(&self, weekday: Weekday) -> bool {
        self.day(weekday).is_training()
    }
}
