//! Error types for gateway client operations

use thiserror::Error;

/// Result type alias for gateway client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during gateway client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL cannot carry path segments (e.g. `mailto:`)
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Request never produced a response (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    TransportFailure(String),

    /// Server returned an error response
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::TransportFailure(err.to_string())
    }
}
