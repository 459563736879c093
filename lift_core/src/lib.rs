#![forbid(unsafe_code)]

//! Core domain model and planning engine for the Lift training planner.
//!
//! This crate provides:
//! - Domain types (exercises, sets, sessions, preferences)
//! - History indexing over completed sessions
//! - Split scheduling, exercise selection and set progression
//! - Session assembly behind a single `generate` entry point
//! - Repository contracts plus file-backed implementations for callers

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod repository;
pub mod store;
pub mod history;
pub mod schedule;
pub mod selection;
pub mod feedback;
pub mod progression;
pub mod assembler;
pub mod engine;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, load_catalog_csv, Catalog};
pub use config::Config;
pub use repository::{ExerciseRepository, PreferencesRepository, SessionRepository};
pub use store::SessionStore;
pub use history::HistoryIndex;
pub use feedback::{Adjustment, FeedbackLevel};
pub use progression::{Experience, Phase};
pub use engine::{generate, Planner};
