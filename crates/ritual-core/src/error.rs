//! Core error types for ritual-core.
//!
//! The timing engine itself only fails in a couple of well-defined ways
//! (completing a task that is not eligible, completing outside a run).
//! Storage and configuration failures get their own sub-enums so callers
//! can match on them without string inspection.

use std::path::PathBuf;
use thiserror::Error;

use crate::routine::RoutineId;
use crate::task::TaskId;

/// Core error type for ritual-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No task with the given name is eligible for completion
    /// (absent, already completed, or skipped).
    #[error("No pending task named '{name}'")]
    TaskNotFound { name: String },

    /// Operation requires a run that is active or paused.
    #[error("Routine {routine_id} is not in progress")]
    RoutineNotInProgress { routine_id: RoutineId },

    /// Routine lookup failed in storage.
    #[error("Routine {id} not found")]
    RoutineNotFound { id: RoutineId },

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A task with this id already exists in the routine
    #[error("Task id {0} already exists in routine")]
    DuplicateTaskId(TaskId),

    /// No task with this id
    #[error("Task id {0} does not exist in routine")]
    UnknownTaskId(TaskId),

    /// Name must not be blank
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    /// Out of bounds
    #[error("Index {index} out of bounds for {collection} (length: {len})")]
    OutOfBounds {
        collection: String,
        index: usize,
        len: usize,
    },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
