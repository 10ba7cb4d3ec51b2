//! Error types for keyrace.
//!
//! Keystrokes never produce errors; rejected input is reported through
//! [`crate::engine::InputOutcome`] instead.

use thiserror::Error;

/// Failures while resolving target text for a test.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("invalid word list {name}: {source}")]
    WordList {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("target text is empty")]
    EmptyText,

    #[error("content provider failed: {0}")]
    Provider(String),
}

/// Failures while handing a finished result to a persistence backend.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored timestamp: {0}")]
    Timestamp(String),

    #[error("result receiver disconnected")]
    Disconnected,
}

/// Failures while writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
pub type PersistResult<T> = std::result::Result<T, PersistError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
