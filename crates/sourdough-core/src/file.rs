//! JSON file storage backend
//!
//! Keeps every collection in memory and writes the whole document back to
//! disk after each mutation (temp file + rename, so readers never observe a
//! partially written file).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::backend::StorageBackend;
use crate::error::{BackendError, BackendResult};
use crate::record::{Filters, Record, RecordId};
use crate::store::Collections;

/// Backend persisted to a single JSON document
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    collections: RwLock<Collections>,
    /// Serializes writers so snapshots land on disk in order
    write_lock: Mutex<()>,
}

impl JsonFileBackend {
    /// Open the document at `path`. A missing file starts an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> BackendResult<Self> {
        let path = path.into();

        let collections = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Collections::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                BackendError::Storage(format!("Failed to parse '{}': {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => {
                return Err(BackendError::Storage(format!(
                    "Failed to read '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::info!(
            path = %path.display(),
            records = collections.record_count(),
            "Opened JSON file backend"
        );

        Ok(Self {
            path,
            collections: RwLock::new(collections),
            write_lock: Mutex::new(()),
        })
    }

    /// Apply `change` to a copy of the collections, write the copy, then
    /// swap it in. Readers never see a change that did not reach disk.
    ///
    /// `change` returning `None` means nothing changed; nothing is written.
    async fn commit<R>(
        &self,
        change: impl FnOnce(&mut Collections) -> Option<R>,
    ) -> BackendResult<Option<R>> {
        let _guard = self.write_lock.lock().await;

        let mut next = self.collections.read().clone();
        let Some(outcome) = change(&mut next) else {
            return Ok(None);
        };

        write_snapshot(&self.path, &next).await?;
        *self.collections.write() = next;
        Ok(Some(outcome))
    }
}

/// Write a snapshot next to `path` and rename it into place
async fn write_snapshot(path: &Path, collections: &Collections) -> BackendResult<()> {
    let bytes = serde_json::to_vec_pretty(collections)?;

    let tmp = path.with_extension("json.tmp");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;

    tracing::trace!(path = %path.display(), "Persisted collections");
    Ok(())
}

#[async_trait]
impl StorageBackend for JsonFileBackend {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn create(&self, collection: &str, payload: Record) -> BackendResult<Record> {
        let created = self
            .commit(|c| Some(c.insert(collection, payload)))
            .await?;
        created.ok_or_else(|| BackendError::Storage("Record was not stored".to_string()))
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
        self.commit(|c| c.update(collection, id, patch))
            .await?
            .ok_or_else(|| BackendError::NotFound(format!("{}/{}", collection, id)))
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> BackendResult<bool> {
        let removed = self
            .commit(|c| c.remove(collection, id).then_some(()))
            .await?;
        Ok(removed.is_some())
    }

    async fn close(&self) -> BackendResult<()> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.collections.read().clone();
        write_snapshot(&self.path, &snapshot).await
    }
}
