//! Placeholder backend used when no database is configured

use async_trait::async_trait;

use crate::backend::StorageBackend;
use crate::error::{BackendError, BackendResult};
use crate::record::{Filters, Record, RecordId};

/// Backend that rejects every record operation with
/// [`BackendError::Unconfigured`].
///
/// Lets the server start (health checks pass) before a store is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredBackend;

#[async_trait]
impl StorageBackend for UnconfiguredBackend {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn create(&self, _collection: &str, _payload: Record) -> BackendResult<Record> {
        Err(BackendError::Unconfigured)
    }

    async fn list(&self, _collection: &str, _filters: &Filters) -> BackendResult<Vec<Record>> {
        Err(BackendError::Unconfigured)
    }

    async fn get(&self, _collection: &str, _id: &RecordId) -> BackendResult<Option<Record>> {
        Err(BackendError::Unconfigured)
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &RecordId,
        _patch: Record,
    ) -> BackendResult<Record> {
        Err(BackendError::Unconfigured)
    }

    async fn delete(&self, _collection: &str, _id: &RecordId) -> BackendResult<bool> {
        Err(BackendError::Unconfigured)
    }
}
