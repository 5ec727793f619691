//! Error types shared by the catalog, the store and the session controller

use thiserror::Error;

/// Input rejected at the boundary; the operation did not mutate anything
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("exercise name must not be empty")]
    EmptyName,

    #[error("sets must be greater than zero")]
    NonPositiveSets,

    #[error("reps must be greater than zero")]
    NonPositiveReps,

    #[error("weight must be a non-negative number, got {0}")]
    InvalidWeight(f64),
}

/// Failures reading or writing the persistent store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {key}: {source}")]
    Read {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {key}: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {key}: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store lock poisoned: {0}")]
    Lock(String),
}

/// Errors returned by session controller operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("{operation} is not allowed while in {state}")]
    IllegalTransition {
        operation: &'static str,
        state: String,
    },

    #[error("exercise not found: {0}")]
    UnknownExercise(String),

    #[error("no decision is pending")]
    NoPendingDecision,
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors from dispatching a command through the shared application state
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{0}")]
    Lock(String),
}
