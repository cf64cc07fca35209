//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sourdough_core::{BackendError, Envelope};
use thiserror::Error;

/// API error type that converts to an envelope response
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("{0}")]
    BadRequest(String),
    /// 404 Not Found
    #[error("{0}")]
    NotFound(String),
    /// 500 Internal Server Error
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn record_not_found() -> Self {
        ApiError::NotFound("Record not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %message, "API error");
        } else {
            tracing::debug!(status = status.as_u16(), %message, "API client error");
        }

        (status, Json(Envelope::<()>::failure(message))).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(_) => ApiError::record_not_found(),
            BackendError::InvalidRecord(msg) => ApiError::BadRequest(msg),
            err @ (BackendError::Unconfigured
            | BackendError::Config(_)
            | BackendError::Storage(_)) => ApiError::Internal(err.to_string()),
        }
    }
}
