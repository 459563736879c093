//! Caller-side glue: materialise the planning snapshot and run the planner.

use crate::{
    Config, ExerciseRepository, Planner, PreferencesRepository, Result, Session,
    SessionRepository,
};
use chrono::{Duration, NaiveDate};
use rand::Rng;

/// Plan `date` from the repositories' current contents
///
/// History is limited to the configured lookback window. The returned
/// session is not persisted.
pub fn plan_day<R: Rng + ?Sized>(
    exercises: &dyn ExerciseRepository,
    sessions: &dyn SessionRepository,
    preferences: &dyn PreferencesRepository,
    config: &Config,
    date: NaiveDate,
    rng: &mut R,
) -> Result<Session> {
    let pool = exercises.list()?;
    let since = date
        .checked_sub_signed(Duration::days(config.history_lookback_days))
        .unwrap_or(NaiveDate::MIN);
    let history = sessions.list(since)?;
    let preferences = preferences.get()?;

    tracing::debug!(
        "Planning {} from {} exercises and {} sessions since {}",
        date,
        pool.len(),
        history.len(),
        since
    );

    Planner::new(config.clone()).generate_with_rng(&pool, &history, &preferences, date, rng)
}
