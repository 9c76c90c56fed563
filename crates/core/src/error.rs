//! Error types for recall.
//!
//! This module defines a unified error enum that covers every failure the
//! workspace can surface: knowledge store access, schema violations,
//! configuration, and terminal I/O.

use thiserror::Error;

/// Unified error type for recall.
///
/// All fallible functions return `Result<T, AppError>`.
/// A missing match is not an error: the matcher returns `None` for that.
#[derive(Error, Debug)]
pub enum AppError {
    /// The persisted knowledge store cannot be read or written
    #[error("Knowledge store unavailable: {0}")]
    StoreUnavailable(String),

    /// The persisted knowledge store does not match the expected schema
    #[error("Knowledge store corrupt: {0}")]
    StoreCorrupt(String),

    /// A question/answer pair that would break the store invariants
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal and filesystem I/O outside the store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors for command output and config files
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
