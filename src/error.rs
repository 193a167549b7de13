//! Error types for the journal backend

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum JournalError {
    /// Malformed or out-of-range input fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown record id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store connectivity or constraint failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP transport failure talking to the coach API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Coach API returned an unusable response
    #[error("API error: {0}")]
    Api(String),

    /// Bad or missing configuration
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
