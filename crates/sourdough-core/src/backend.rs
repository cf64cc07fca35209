//! StorageBackend trait - the core abstraction for gateway storage

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::{BackendError, BackendResult};
use crate::file::JsonFileBackend;
use crate::memory::MemoryBackend;
use crate::record::{Filters, Record, RecordId};
use crate::unconfigured::UnconfiguredBackend;

/// Storage backend the gateway delegates every record operation to.
///
/// Implementations must be safe to share between concurrently running
/// request handlers; they synchronize internally.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Insert a record and return it with its assigned identifier
    async fn create(&self, collection: &str, payload: Record) -> BackendResult<Record>;

    /// Records of a collection matching every filter
    async fn list(&self, collection: &str, filters: &Filters) -> BackendResult<Vec<Record>>;

    /// A single record, or `None` when absent
    async fn get(&self, collection: &str, id: &RecordId) -> BackendResult<Option<Record>>;

    /// Merge `patch` into an existing record.
    ///
    /// Returns [`BackendError::NotFound`] when no record is addressed by `id`.
    async fn update(&self, collection: &str, id: &RecordId, patch: Record)
        -> BackendResult<Record>;

    /// Remove a record; `false` when nothing was addressed by `id`
    async fn delete(&self, collection: &str, id: &RecordId) -> BackendResult<bool>;

    /// Release backend resources. Calling it more than once is harmless.
    async fn close(&self) -> BackendResult<()> {
        Ok(())
    }
}

/// Open the backend named by a connection string.
///
/// - `None` yields an [`UnconfiguredBackend`]
/// - `memory://` yields a [`MemoryBackend`]
/// - `file:///path/to/db.json` yields a [`JsonFileBackend`]
pub async fn open_backend(database_url: Option<&str>) -> BackendResult<Arc<dyn StorageBackend>> {
    let Some(raw) = database_url.map(str::trim).filter(|s| !s.is_empty()) else {
        tracing::warn!("DATABASE_URL not set, record operations will fail until a backend is configured");
        return Ok(Arc::new(UnconfiguredBackend));
    };

    let url = Url::parse(raw)
        .map_err(|e| BackendError::Config(format!("Invalid DATABASE_URL '{}': {}", raw, e)))?;

    match url.scheme() {
        "memory" => {
            tracing::info!("Using in-memory backend");
            Ok(Arc::new(MemoryBackend::new()))
        }
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| BackendError::Config(format!("Invalid file path in '{}'", raw)))?;
            let backend = JsonFileBackend::open(path).await?;
            Ok(Arc::new(backend))
        }
        other => Err(BackendError::Config(format!(
            "Unsupported backend scheme '{}'",
            other
        ))),
    }
}
