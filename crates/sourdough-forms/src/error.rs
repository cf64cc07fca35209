//! Error types for form submission

use thiserror::Error;

use crate::contact::FieldErrors;

/// Errors that can occur while submitting a form
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more fields failed validation; nothing was sent
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// A submission from this form is already in flight
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// The provider answered but refused the submission
    #[error("Delivery rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached
    #[error("Network error: {0}")]
    Transport(String),

    /// Provider settings are unusable
    #[error("Invalid provider configuration: {0}")]
    Config(String),
}
