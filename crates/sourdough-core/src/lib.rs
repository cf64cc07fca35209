//! sourdough-core - Core record types and storage backends
//!
//! This crate provides the abstractions shared by the gateway server and its
//! clients: the record model, equality filters, the response envelope, and the
//! [`StorageBackend`] trait with its reference implementations.

pub mod backend;
pub mod envelope;
pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod unconfigured;

mod store;

pub use backend::{open_backend, StorageBackend};
pub use envelope::Envelope;
pub use error::{BackendError, BackendResult};
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use record::{Filters, Record, RecordId, ID_FIELD};
pub use unconfigured::UnconfiguredBackend;
