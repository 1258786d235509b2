//! Error types for lifelog-core

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the lifelog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A record failed validation before it reached the store
    #[error("invalid entry: {0}")]
    Validation(String),

    /// A day range whose start falls after its end
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Record not found
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Result type alias for lifelog-core
pub type Result<T> = std::result::Result<T, Error>;
