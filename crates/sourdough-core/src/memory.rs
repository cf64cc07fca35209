//! In-memory storage backend

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::backend::StorageBackend;
use crate::error::{BackendError, BackendResult};
use crate::record::{Filters, Record, RecordId};
use crate::store::Collections;

/// Process-local backend; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: RwLock<Collections>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all collections
    pub fn len(&self) -> usize {
        self.collections.read().record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create(&self, collection: &str, payload: Record) -> BackendResult<Record> {
        Ok(self.collections.write().insert(collection, payload))
    }

    async fn list(&self, collection: &str, filters: &Filters) -> BackendResult<Vec<Record>> {
        Ok(self.collections.read().list(collection, filters))
    }

    async fn get(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Record>> {
        Ok(self.collections.read().get(collection, id))
    }

    async fn update(
        &self,
        collection: &str,
        id: &RecordId,
        patch: Record,
    ) -> BackendResult<Record> {
        self.collections
            .write()
            .update(collection, id, patch)
            .ok_or_else(|| BackendError::NotFound(format!("{}/{}", collection, id)))
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> BackendResult<bool> {
        Ok(self.collections.write().remove(collection, id))
    }
}
