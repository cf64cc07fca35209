//! Form state machine: values, field errors, submit status

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::contact::{ContactField, ContactForm, FieldErrors};
use crate::error::FormError;
use crate::provider::{Delivery, DeliveryProvider};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const FAILURE_MESSAGE: &str = "Failed to send message. Please try again or contact us directly.";

/// What the form shows after the last submit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success(String),
    Error(String),
}

#[derive(Debug, Default)]
struct FormState {
    values: ContactForm,
    errors: FieldErrors,
    status: SubmitStatus,
}

/// Clears the submitting flag when a submit ends, however it ends
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A contact form bound to one delivery provider
#[derive(Debug)]
pub struct FormController {
    delivery: Delivery,
    state: Mutex<FormState>,
    submitting: AtomicBool,
}

impl FormController {
    pub fn new(delivery: Delivery) -> Self {
        Self {
            delivery,
            state: Mutex::new(FormState::default()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn from_provider(provider: &DeliveryProvider) -> Result<Self, FormError> {
        Ok(Self::new(Delivery::new(provider)?))
    }

    pub fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    pub fn values(&self) -> ContactForm {
        self.state.lock().values.clone()
    }

    pub fn status(&self) -> SubmitStatus {
        self.state.lock().status.clone()
    }

    pub fn field_errors(&self) -> FieldErrors {
        self.state.lock().errors.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Update one field. Clears its error and any previous submit outcome.
    pub fn edit(&self, field: ContactField, value: impl Into<String>) {
        let mut state = self.state.lock();
        state.values.set(field, value);
        state.errors.remove(&field);
        state.status = SubmitStatus::Idle;
    }

    /// Validate and deliver the current values.
    ///
    /// Invalid input is recorded as field errors and never sent. On success
    /// the values are reset.
    pub async fn submit(&self) -> Result<(), FormError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(FormError::SubmissionInFlight);
        }
        let _guard = SubmittingGuard(&self.submitting);

        let form = {
            let mut state = self.state.lock();
            if let Err(errors) = state.values.check() {
                tracing::debug!(fields = errors.len(), "Contact form failed validation");
                state.errors = errors.clone();
                state.status = SubmitStatus::Idle;
                return Err(FormError::Validation(errors));
            }
            state.errors.clear();
            state.status = SubmitStatus::Idle;
            state.values.clone()
        };

        let outcome = self.delivery.deliver(&form).await;

        let mut state = self.state.lock();
        match &outcome {
            Ok(()) => {
                tracing::info!(provider = self.delivery.name(), "Contact form delivered");
                state.values = ContactForm::default();
                state.status = SubmitStatus::Success(SUCCESS_MESSAGE.to_string());
            }
            Err(FormError::Transport(message)) => {
                tracing::warn!(provider = self.delivery.name(), error = %message, "Contact form delivery failed");
                state.status = SubmitStatus::Error(format!("Network error: {}", message));
            }
            Err(e) => {
                tracing::warn!(provider = self.delivery.name(), error = %e, "Contact form delivery failed");
                state.status = SubmitStatus::Error(FAILURE_MESSAGE.to_string());
            }
        }
        outcome
    }
}
