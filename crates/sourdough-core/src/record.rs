//! Record model: records, identifiers and equality filters

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the identifier field inside a record
pub const ID_FIELD: &str = "id";

/// A record is a flat mapping from field name to JSON value.
///
/// The only field with meaning to this layer is [`ID_FIELD`].
pub type Record = serde_json::Map<String, Value>;

/// Identifier of a record, either numeric or textual.
///
/// Identifiers compare by their decimal/string rendering, so the path segment
/// `"42"` addresses a record stored with `"id": 42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Read the identifier field of a record, if it holds a string or integer
    pub fn of(record: &Record) -> Option<RecordId> {
        match record.get(ID_FIELD)? {
            Value::String(s) => Some(RecordId::Str(s.clone())),
            Value::Number(n) => n.as_i64().map(RecordId::Int),
            _ => None,
        }
    }

    /// Whether a stored `id` value addresses this identifier
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (RecordId::Str(s), Value::String(v)) => s == v,
            (RecordId::Int(i), Value::Number(n)) => n.as_i64() == Some(*i),
            (RecordId::Str(s), Value::Number(n)) => n.to_string() == *s,
            (RecordId::Int(i), Value::String(v)) => v == &i.to_string(),
            _ => false,
        }
    }

    /// Whether this identifier addresses the given record
    pub fn addresses(&self, record: &Record) -> bool {
        record.get(ID_FIELD).is_some_and(|v| self.matches(v))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{}", i),
            RecordId::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Str(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Str(s)
    }
}

impl From<&String> for RecordId {
    fn from(s: &String) -> Self {
        RecordId::Str(s.clone())
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        RecordId::Int(i)
    }
}

/// Equality filters derived from a query string.
///
/// A record matches when every filter field is present and its value renders
/// to the filter string. An empty filter set matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check a record against every filter
    pub fn matches(&self, record: &Record) -> bool {
        self.0.iter().all(|(field, expected)| {
            record
                .get(field)
                .is_some_and(|value| value_matches(value, expected))
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<HashMap<String, String>> for Filters {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

/// Compare a stored JSON value with a query-string value
fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => expected == if *b { "true" } else { "false" },
        Value::Null => expected == "null",
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_record_id_untagged_serde() {
        let id: RecordId = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(id, RecordId::Int(7));
        let id: RecordId = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(id, RecordId::Str("abc".to_string()));
        assert_eq!(serde_json::to_value(RecordId::Int(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_record_id_matches_across_representations() {
        assert!(RecordId::from("42").matches(&json!(42)));
        assert!(RecordId::from(42).matches(&json!("42")));
        assert!(RecordId::from("abc").matches(&json!("abc")));
        assert!(!RecordId::from("abc").matches(&json!("abd")));
        assert!(!RecordId::from("1").matches(&json!(true)));
    }

    #[test]
    fn test_record_id_of() {
        let r = record(json!({"id": "x1", "name": "A"}));
        assert_eq!(RecordId::of(&r), Some(RecordId::from("x1")));
        let r = record(json!({"name": "A"}));
        assert_eq!(RecordId::of(&r), None);
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let filters = Filters::new();
        assert!(filters.matches(&record(json!({}))));
        assert!(filters.matches(&record(json!({"a": 1}))));
    }

    #[test]
    fn test_number_filters_are_exact() {
        let r = record(json!({"n": 9007199254740993_u64, "one": 1}));

        assert!(Filters::new().with("n", "9007199254740993").matches(&r));
        assert!(!Filters::new().with("n", "9007199254740992").matches(&r));
        assert!(Filters::new().with("one", "1").matches(&r));
        assert!(!Filters::new().with("one", "1e0").matches(&r));
        assert!(!Filters::new().with("one", "1.0").matches(&r));
    }

    #[test]
    fn test_filters_compare_rendered_values() {
        let r = record(json!({
            "name": "Ada",
            "age": 36,
            "score": 2.5,
            "active": true,
            "note": null,
            "tags": ["x"]
        }));

        assert!(Filters::new().with("name", "Ada").matches(&r));
        assert!(!Filters::new().with("name", "ada").matches(&r));
        assert!(Filters::new().with("age", "36").matches(&r));
        assert!(!Filters::new().with("age", "36.0").matches(&r));
        assert!(!Filters::new().with("age", "3.6e1").matches(&r));
        assert!(Filters::new().with("score", "2.5").matches(&r));
        assert!(Filters::new().with("active", "true").matches(&r));
        assert!(Filters::new().with("note", "null").matches(&r));
        assert!(!Filters::new().with("tags", "x").matches(&r));
        assert!(!Filters::new().with("missing", "x").matches(&r));
        assert!(!Filters::new()
            .with("name", "Ada")
            .with("age", "37")
            .matches(&r));
    }
}
