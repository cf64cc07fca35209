//! sourdough-forms - Contact form capture
//!
//! Validates contact submissions before anything touches the network, then
//! hands them to exactly one delivery provider chosen at configuration time.
//!
//! ```rust,ignore
//! use sourdough_forms::{ContactField, DeliveryProvider, FormController};
//!
//! let provider: DeliveryProvider = serde_json::from_value(json!({
//!     "provider": "api",
//!     "base_url": "http://localhost:3001/api",
//! }))?;
//! let form = FormController::from_provider(&provider)?;
//! form.edit(ContactField::Name, "Ada");
//! form.submit().await?;
//! ```

mod contact;
mod controller;
mod error;
mod provider;

pub use contact::{ContactField, ContactForm, FieldErrors};
pub use controller::{FormController, SubmitStatus, FAILURE_MESSAGE, SUCCESS_MESSAGE};
pub use error::FormError;
pub use provider::{Delivery, DeliveryProvider};
