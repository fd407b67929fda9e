//! Core error types for flashdeck-core.
//!
//! Every fallible operation in the library reports one of these. The study
//! engine only ever produces [`SessionError`]; the quota policy produces no
//! errors at all (denials are turned into [`CoreError::QuotaDenied`] by the
//! action layer).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for flashdeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Study session errors
    #[error("Study session error: {0}")]
    Session(#[from] SessionError),

    /// AI card generation errors
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A plan-gated action was refused.
    #[error("{reason}")]
    QuotaDenied { reason: String },

    /// No identity could be resolved for the caller.
    #[error("not signed in")]
    Unauthorized,

    /// The entity does not exist or is not owned by the caller.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A saved study session could not be read or written.
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

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors raised by a study session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session was started with zero cards.
    #[error("cannot study an empty deck")]
    EmptyInput,

    /// The current card was requested outside the valid range.
    #[error("card index {index} out of range (length: {len})")]
    OutOfRange { index: usize, len: usize },
}

/// Errors raised by the AI card generator.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The provider returned no message content.
    #[error("Failed to generate flashcards content: Empty response from AI")]
    EmptyResponse,

    /// The content was not the expected JSON shape.
    #[error("AI returned invalid data format: {0}")]
    InvalidFormat(String),

    /// The content parsed but held no usable cards.
    #[error("AI returned no usable cards")]
    NoCards,

    /// Non-success HTTP status from the provider
    #[error("AI provider error (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    /// Transport failure
    #[error("AI request failed: {0}")]
    Network(String),

    /// No API key in the keyring or environment
    #[error("No AI API key configured. Run `flashdeck auth set-api-key` or set OPENAI_API_KEY")]
    MissingApiKey,

    /// The async runtime for the request could not be built
    #[error("Failed to start async runtime: {0}")]
    Runtime(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Out of bounds
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfBounds {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
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

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Network(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_denied_displays_reason_only() {
        let err = CoreError::QuotaDenied {
            reason: "bulk adding is a pro feature".into(),
        };
        assert_eq!(err.to_string(), "bulk adding is a pro feature");
    }

    #[test]
    fn session_error_wraps_into_core() {
        let err: CoreError = SessionError::EmptyInput.into();
        assert!(matches!(err, CoreError::Session(SessionError::EmptyInput)));
    }

    #[test]
    fn no_rows_maps_to_query_failed() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
