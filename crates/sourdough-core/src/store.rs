//! In-memory collection store shared by the memory and file backends

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::{Filters, Record, RecordId, ID_FIELD};

/// Collection name -> records in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Collections(BTreeMap<String, Vec<Record>>);

impl Collections {
    /// Insert a record under a freshly generated identifier
    pub fn insert(&mut self, collection: &str, mut payload: Record) -> Record {
        let id = Uuid::new_v4().to_string();
        payload.insert(ID_FIELD.to_string(), id.into());

        self.0
            .entry(collection.to_string())
            .or_default()
            .push(payload.clone());
        payload
    }

    pub fn list(&self, collection: &str, filters: &Filters) -> Vec<Record> {
        self.0
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filters.matches(r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, collection: &str, id: &RecordId) -> Option<Record> {
        self.0
            .get(collection)?
            .iter()
            .find(|r| id.addresses(r))
            .cloned()
    }

    /// Shallow-merge `patch` into the addressed record. The stored id is kept.
    pub fn update(&mut self, collection: &str, id: &RecordId, patch: Record) -> Option<Record> {
        let record = self
            .0
            .get_mut(collection)?
            .iter_mut()
            .find(|r| id.addresses(r))?;

        for (field, value) in patch {
            if field != ID_FIELD {
                record.insert(field, value);
            }
        }
        Some(record.clone())
    }

    pub fn remove(&mut self, collection: &str, id: &RecordId) -> bool {
        let Some(records) = self.0.get_mut(collection) else {
            return false;
        };
        let before = records.len();
        records.retain(|r| !id.addresses(r));
        records.len() != before
    }

    pub fn record_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}
