//! Identifier and value types.
//!
//! These are thin newtypes over strings and JSON values. They carry no
//! validation of their own; the clients reject empty index names before
//! issuing a request.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Name of a document collection (an index).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexName(String);

impl IndexName {
    /// Create an index name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw index name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IndexName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IndexName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for IndexName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identifier of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a random id.
    pub fn random() -> Self {
        Self::from(Uuid::new_v4())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.to_string())
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Name of a field inside a document's source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Create a field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw field name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Value assigned to a field by an update-by-query script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue(Value);

impl FieldValue {
    /// Wrap a JSON value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// The wrapped JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self(Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self(Value::from(value))
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_from_uuid() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = DocumentId::from(uuid);

        assert_eq!(id.as_str(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(DocumentId::random(), DocumentId::random());
    }

    #[test]
    fn test_index_name_serializes_as_string() {
        let index = IndexName::from("testindex");

        assert_eq!(serde_json::to_string(&index).unwrap(), "\"testindex\"");
        assert!(!index.is_empty());
        assert!(IndexName::new("").is_empty());
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::from("x").as_json(), &Value::from("x"));
        assert_eq!(FieldValue::from(7_i64).as_json(), &Value::from(7_i64));
        assert_eq!(FieldValue::from(true).as_json(), &Value::from(true));
    }
}
