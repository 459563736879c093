//! Collaborator contracts for loading the planner's input snapshot.
//!
//! The engine never calls these itself. Callers use them to materialise the
//! exercise pool, history window and preferences before calling
//! [`crate::generate`].

use crate::{Config, Exercise, Preferences, Result, Session};
use chrono::NaiveDate;

/// Source of the active exercise catalog
pub trait ExerciseRepository {
    /// Every active exercise with resolved muscle groups
    fn list(&self) -> Result<Vec<Exercise>>;
}

/// Source of stored training sessions
pub trait SessionRepository {
    /// Sessions dated on or after `since`, oldest first
    fn list(&self, since: NaiveDate) -> Result<Vec<Session>>;

    /// The session stored for `date`, if any
    fn get(&self, date: NaiveDate) -> Result<Option<Session>>;
}

/// Source of weekly training availability
pub trait PreferencesRepository {
    fn get(&self) -> Result<Preferences>;
}

impl PreferencesRepository for Config {
    fn get(&self) -> Result<Preferences> {
        Ok(self.preferences.clone())
    }
}

/// An in-memory history snapshot
impl SessionRepository for Vec<Session> {
    fn list(&self, since: NaiveDate) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self.iter().filter(|s| s.date >= since).cloned().collect();
        sessions.sort_by_key(|s| s.date);
        Ok(sessions)
    }

    fn get(&self, date: NaiveDate) -> Result<Option<Session>> {
        Ok(self.iter().find(|s| s.date == date).cloned())
    }
}
