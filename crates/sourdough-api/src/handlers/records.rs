//! Generic record handlers
//!
//! Supports, for any collection name:
//! - POST /api/{collection} - create a record
//! - GET /api/{collection} - list records (query string = equality filters)
//! - GET /api/{collection}/{id} - read one record
//! - PUT /api/{collection}/{id} - merge fields into a record
//! - DELETE /api/{collection}/{id} - delete a record

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use sourdough_core::{Envelope, Filters, Record, RecordId};

use crate::error::ApiError;
use crate::state::AppState;

/// Collection names are case-insensitive path segments
fn collection_name(raw: &str) -> String {
    raw.to_lowercase()
}

/// Accept only a JSON object as a record body
fn record_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Record, ApiError> {
    let Json(value) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    match value {
        Value::Object(record) => Ok(record),
        _ => Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

/// POST /api/{collection}
/// Create a new record
pub async fn create_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Record>>), ApiError> {
    let collection = collection_name(&collection);
    let record = record_body(payload)?;

    let created = state.backend().create(&collection, record).await?;
    tracing::debug!(
        %collection,
        id = ?RecordId::of(&created),
        "Created record"
    );

    Ok((StatusCode::CREATED, Json(Envelope::ok(created))))
}

/// GET /api/{collection}
/// List records matching the query-string filters
pub async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Vec<Record>>>, ApiError> {
    let collection = collection_name(&collection);
    let filters = Filters::from(query);

    let records = state.backend().list(&collection, &filters).await?;
    tracing::debug!(%collection, filters = filters.len(), count = records.len(), "Listed records");

    Ok(Json(Envelope::ok(records)))
}

/// GET /api/{collection}/{id}
/// Read a single record by ID
pub async fn get_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Envelope<Record>>, ApiError> {
    let collection = collection_name(&collection);
    let id = RecordId::from(id);

    match state.backend().get(&collection, &id).await? {
        Some(record) => Ok(Json(Envelope::ok(record))),
        None => Err(ApiError::record_not_found()),
    }
}

/// PUT /api/{collection}/{id}
/// Merge the body into an existing record
pub async fn update_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<Record>>, ApiError> {
    let collection = collection_name(&collection);
    let id = RecordId::from(id);
    let patch = record_body(payload)?;

    let updated = state.backend().update(&collection, &id, patch).await?;
    tracing::debug!(%collection, %id, "Updated record");

    Ok(Json(Envelope::ok(updated)))
}

/// DELETE /api/{collection}/{id}
/// Delete a record
pub async fn delete_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let collection = collection_name(&collection);
    let id = RecordId::from(id);

    if !state.backend().delete(&collection, &id).await? {
        return Err(ApiError::record_not_found());
    }
    tracing::debug!(%collection, %id, "Deleted record");

    Ok(Json(Envelope::ok_message("Record deleted successfully")))
}
