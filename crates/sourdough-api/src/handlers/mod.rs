//! HTTP request handlers for the gateway API
//!
//! These handlers use the StorageBackend trait and are backend-agnostic.

pub mod health;
pub mod records;
