//! Integration tests for sourdough-client
//!
//! These tests spin up a real gateway server and use the client to interact
//! with it. This keeps the client in sync with the API.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sourdough_api::{create_router, AppState};
use sourdough_client::testing::TestServer;
use sourdough_client::{Filters, RecordId};
use sourdough_core::{
    BackendError, BackendResult, MemoryBackend, Record, StorageBackend, UnconfiguredBackend,
};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    name: String,
    email: String,
    message: String,
}

fn contact(name: &str) -> Contact {
    Contact {
        id: None,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        message: "0123456789".to_string(),
    }
}

async fn memory_server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryBackend::new()));
    TestServer::start(create_router(state))
        .await
        .expect("Failed to start test server")
}

/// Backend whose store is always broken
struct BrokenBackend;

#[async_trait]
impl StorageBackend for BrokenBackend {
    fn name(&self) -> &str {
        "broken"
    }

    async fn create(&self, _collection: &str, _payload: Record) -> BackendResult<Record> {
        Err(BackendError::Storage("disk on fire".to_string()))
    }

    async fn list(&self, _collection: &str, _filters: &Filters) -> BackendResult<Vec<Record>> {
        Err(BackendError::Storage("disk on fire".to_string()))
    }

    async fn get(&self, _collection: &str, _id: &RecordId) -> BackendResult<Option<Record>> {
        Err(BackendError::Storage("disk on fire".to_string()))
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &RecordId,
        _patch: Record,
    ) -> BackendResult<Record> {
        Err(BackendError::Storage("disk on fire".to_string()))
    }

    async fn delete(&self, _collection: &str, _id: &RecordId) -> BackendResult<bool> {
        Err(BackendError::Storage("disk on fire".to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = memory_server().await;
    let health = server.client.health().await.unwrap();
    assert!(health.is_ok());
    assert_eq!(health.message, "Sourdough server is running");
}

#[tokio::test]
async fn test_typed_create_and_get() {
    let server = memory_server().await;

    let created = server
        .client
        .create::<Contact, _>("contacts", &contact("Ada"))
        .await;
    assert!(created.success, "{:?}", created.error);
    let created = created.data.unwrap();
    let id = created.id.clone().expect("assigned id");

    let fetched = server.client.get_by_id::<Contact>("contacts", id).await;
    assert!(fetched.success);
    assert_eq!(fetched.data.unwrap(), created);
}

#[tokio::test]
async fn test_list_with_filters() {
    let server = memory_server().await;
    for name in ["Ada", "Grace", "Ada"] {
        let env = server
            .client
            .create::<Contact, _>("contacts", &contact(name))
            .await;
        assert!(env.success);
    }

    let all = server
        .client
        .list::<Contact>("contacts", &Filters::new())
        .await
        .data
        .unwrap();
    let ada = server
        .client
        .list::<Contact>("contacts", &Filters::new().with("name", "Ada"))
        .await
        .data
        .unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(ada.len(), 2);
    assert!(ada.iter().all(|c| all.contains(c)));
}

#[tokio::test]
async fn test_update_and_delete() {
    let server = memory_server().await;
    let created = server
        .client
        .create::<Contact, _>("contacts", &contact("Ada"))
        .await
        .data
        .unwrap();
    let id = created.id.unwrap();

    let patch = json!({"message": "a much longer message"});
    let first = server
        .client
        .update::<Contact, _>("contacts", id.clone(), &patch)
        .await;
    let second = server
        .client
        .update::<Contact, _>("contacts", id.clone(), &patch)
        .await;
    assert!(first.success && second.success);
    assert_eq!(first.data, second.data);

    let deleted = server.client.delete("contacts", id.clone()).await;
    assert!(deleted.success);
    assert_eq!(deleted.message.as_deref(), Some("Record deleted successfully"));

    let again = server.client.delete("contacts", id).await;
    assert!(!again.success);
    assert_eq!(again.error.as_deref(), Some("Record not found"));
}

#[tokio::test]
async fn test_missing_records_are_failures() {
    let server = memory_server().await;

    let env = server.client.get_by_id::<Value>("contacts", "nope").await;
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("Record not found"));

    let env = server
        .client
        .update::<Value, _>("contacts", "nope", &json!({"a": 1}))
        .await;
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("Record not found"));
}

#[tokio::test]
async fn test_unconfigured_backend_is_normalized() {
    let state = AppState::new(Arc::new(UnconfiguredBackend));
    let server = TestServer::start(create_router(state)).await.unwrap();

    let env = server
        .client
        .create::<Value, _>("contacts", &json!({"name": "A"}))
        .await;
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("Database not configured"));
}

#[tokio::test]
async fn test_backend_failures_are_normalized() {
    let state = AppState::new(Arc::new(BrokenBackend));
    let server = TestServer::start(create_router(state)).await.unwrap();

    let env = server
        .client
        .list::<Value>("contacts", &Filters::new())
        .await;
    assert!(!env.success);
    assert_eq!(env.error.as_deref(), Some("Storage error: disk on fire"));
}

#[tokio::test]
async fn test_non_object_body_is_rejected() {
    let server = memory_server().await;
    let env = server
        .client
        .create::<Value, _>("contacts", &json!(["not", "an", "object"]))
        .await;
    assert!(!env.success);
    assert_eq!(
        env.error.as_deref(),
        Some("Request body must be a JSON object")
    );
}

#[tokio::test]
async fn test_server_gone_is_a_transport_failure() {
    let server = memory_server().await;
    let client = server.client.clone();
    server.shutdown().await;

    let env = client.list::<Value>("contacts", &Filters::new()).await;
    assert!(!env.success);
    assert!(env.error.unwrap().starts_with("Network error"));
}
