//! Error types for the ironlog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ironlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
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

    /// Persistence gateway error
    #[error("Store error: {0}")]
    Store(String),

    /// A user operation violated a precondition; no state was changed
    #[error("{0}")]
    Rejected(#[from] Rejection),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Validation rejections: user-facing warnings, never fatal.
///
/// Every rejected operation leaves the session untouched, so the caller
/// can surface the message and carry on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// A set must record at least one non-zero measurement
    #[error("a set needs a weight or a rep count")]
    EmptySet,

    /// Operation requires an open exercise
    #[error("no exercise in progress")]
    NoOpenExercise,

    /// An exercise can only be closed once it has at least one set
    #[error("exercise has no completed sets")]
    NoSetsInExercise,

    /// A workout with zero completed exercises cannot be finished
    #[error("workout has no exercises")]
    EmptyWorkout,

    /// Operation is not valid in the session's current state
    #[error("operation '{operation}' is not valid while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
}

impl Error {
    /// True for validation rejections (warn-and-continue), false for real failures
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::Rejected(_))
    }
}
