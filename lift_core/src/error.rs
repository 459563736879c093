//! Error types for the lift_core library.

use crate::Category;
use chrono::NaiveDate;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lift_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No exercises were supplied at all
    #[error("Exercise pool is empty")]
    EmptyPool,

    /// The pool has nothing usable for the chosen category
    #[error("No exercises available for category {0}")]
    NoExercisesForCategory(Category),

    /// Target date cannot be planned (zero value or calendar edge)
    #[error("Invalid target date: {0}")]
    InvalidDate(NaiveDate),

    /// Selection came back smaller than the smallest plannable session
    #[error("Selected {selected} exercises, need at least {minimum}")]
    InsufficientSelection { selected: usize, minimum: usize },

    /// A planned session broke one of its structural invariants
    #[error("Invariant violation: {0}")]
    Invariant(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Session store error
    #[error("Session store error: {0}")]
    Store(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
