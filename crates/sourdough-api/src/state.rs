//! Application state for the gateway API

use std::sync::Arc;

use sourdough_core::StorageBackend;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// The storage backend every record route delegates to
    backend: Arc<dyn StorageBackend>,
}

impl AppState {
    /// Create a new AppState around an already opened backend
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Get the storage backend
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }
}
