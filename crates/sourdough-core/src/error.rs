//! Common error types for storage backends

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur in storage backends
#[derive(Debug, Error)]
pub enum BackendError {
    /// No storage backend has been wired in
    #[error("Database not configured")]
    Unconfigured,

    /// Record not found in the collection
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Payload is not a usable record
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Backend connection string could not be interpreted
    #[error("Invalid backend configuration: {0}")]
    Config(String),

    /// Underlying store failed (I/O, encoding, ...)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackendError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            BackendError::Unconfigured => 500,
            BackendError::NotFound(_) => 404,
            BackendError::InvalidRecord(_) => 400,
            BackendError::Config(_) => 500,
            BackendError::Storage(_) => 500,
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Storage(err.to_string())
    }
}
