//! Session planning entry point.
//!
//! Planning runs in a fixed order:
//!
//! 1. **Index** the completed history before the target date
//! 2. **Schedule** the day's category (upper / lower / full body)
//! 3. **Select** exercises for that category
//! 4. **Progress** each exercise from its last attempt and rating
//! 5. **Assemble** the planned session
//!
//! Nothing here performs I/O or mutates its inputs. Given the same inputs and
//! RNG state the output is identical.

use crate::assembler::assemble;
use crate::progression::ProgressionEngine;
use crate::schedule::determine_category;
use crate::selection::select_exercises;
use crate::{Category, Config, Error, Exercise, HistoryIndex, Preferences, Result, Session};
use chrono::{Datelike, NaiveDate};
use rand::Rng;

/// Plan the session for `date` with default tuning
///
/// Uses the thread-local RNG for the shuffled selection fill. Use
/// [`Planner::generate_with_rng`] for reproducible plans.
pub fn generate(
    pool: &[Exercise],
    history: &[Session],
    preferences: &Preferences,
    date: NaiveDate,
) -> Result<Session> {
    Planner::default().generate(pool, history, preferences, date)
}

/// Session planner carrying its tuning configuration
#[derive(Clone, Debug, Default)]
pub struct Planner {
    config: Config,
}

impl Planner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Plan the session for `date`
    pub fn generate(
        &self,
        pool: &[Exercise],
        history: &[Session],
        preferences: &Preferences,
        date: NaiveDate,
    ) -> Result<Session> {
        self.generate_with_rng(pool, history, preferences, date, &mut rand::thread_rng())
    }

    /// Plan the session for `date` drawing randomness from `rng`
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        pool: &[Exercise],
        history: &[Session],
        preferences: &Preferences,
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<Session> {
        validate(pool, date)?;
        let index = HistoryIndex::build(history, date);
        let category = determine_category(preferences, &index, date);
        self.plan(pool, &index, category, date, rng)
    }

    /// Plan a session of a fixed `category`, skipping the split scheduler
    pub fn generate_for_category<R: Rng + ?Sized>(
        &self,
        pool: &[Exercise],
        history: &[Session],
        category: Category,
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<Session> {
        validate(pool, date)?;
        let index = HistoryIndex::build(history, date);
        tracing::info!("Planning {} for {} (category overridden)", category, date);
        self.plan(pool, &index, category, date, rng)
    }

    fn plan<R: Rng + ?Sized>(
        &self,
        pool: &[Exercise],
        index: &HistoryIndex<'_>,
        category: Category,
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<Session> {
        let selected = select_exercises(pool, category, date, index, &self.config.selection, rng)?;

        let progression = ProgressionEngine::new(&self.config.progression, index);
        tracing::debug!(
            "Progressing as {:?} over {} completed sessions",
            progression.experience(),
            index.sessions().len()
        );

        let planned = selected
            .into_iter()
            .map(|exercise| {
                let sets = progression.plan(&exercise);
                (exercise, sets)
            })
            .collect();

        let session = assemble(date, planned)?;
        tracing::info!(
            "Planned {} session for {} with {} exercises",
            category,
            date,
            session.exercise_sets.len()
        );
        Ok(session)
    }
}

/// Reject inputs nothing can be planned from
///
/// The zero date (0001-01-01) is what an unset date deserialises to
/// elsewhere. Dates without a neighbour on both sides cannot be scheduled.
fn validate(pool: &[Exercise], date: NaiveDate) -> Result<()> {
    let is_zero = date.year() == 1 && date.ordinal() == 1;
    if is_zero || date.pred_opt().is_none() || date.succ_opt().is_none() {
        return Err(Error::InvalidDate(date));
    }
    if pool.is_empty() {
        return Err(Error::EmptyPool);
    }
    Ok(())
}
