//! Stored documents and search response shapes.
//!
//! Field names follow the engine's wire format (`_index`, `_id`, `_source`,
//! `_scroll_id`). Unknown fields in responses are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document as returned by get-by-id or inside search hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticDocument {
    /// Index the document is stored in.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version, when the engine reports it.
    #[serde(rename = "_version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Mapping type (`_doc` on engines that still report it).
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Stored payload, ordered by key.
    #[serde(rename = "_source", default)]
    pub source: Map<String, Value>,
}

impl ElasticDocument {
    /// Decode the stored payload into a caller type.
    pub fn source_as<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(Value::Object(self.source.clone()))
    }

    /// The stored payload as a JSON object.
    pub fn source_as_json(&self) -> Value {
        Value::Object(self.source.clone())
    }

    /// The whole document, metadata included, as JSON. Absent metadata is
    /// left out, matching the serialized form.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("_index".to_string(), Value::String(self.index.clone()));
        map.insert("_id".to_string(), Value::String(self.id.clone()));
        if let Some(version) = self.version {
            map.insert("_version".to_string(), Value::from(version));
        }
        if let Some(doc_type) = &self.doc_type {
            map.insert("_type".to_string(), Value::String(doc_type.clone()));
        }
        map.insert("_source".to_string(), Value::Object(self.source.clone()));
        Value::Object(map)
    }
}

/// Response body of `_search` and `_search/scroll`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Scroll token for the next page, present when a scroll was requested.
    #[serde(rename = "_scroll_id", default)]
    pub scroll_id: Option<String>,
    /// Matching documents.
    pub hits: SearchHits,
}

impl SearchResponse {
    /// The documents in this response, in engine order.
    pub fn into_documents(self) -> Vec<ElasticDocument> {
        self.hits.hits
    }
}

/// The `hits` section of a search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
    /// Total number of matches, if tracked.
    #[serde(default)]
    pub total: Option<TotalHits>,
    /// The documents of this page.
    #[serde(default)]
    pub hits: Vec<ElasticDocument>,
}

/// Total match count of a search.
///
/// Older engines report a bare number instead of `{"value", "relation"}`;
/// that form decodes as an exact count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TotalHitsRepr")]
pub struct TotalHits {
    /// Number of matches.
    pub value: u64,
    /// Whether `value` is exact or a lower bound.
    pub relation: TotalRelation,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHitsRepr {
    Count(u64),
    Object { value: u64, relation: TotalRelation },
}

impl From<TotalHitsRepr> for TotalHits {
    fn from(repr: TotalHitsRepr) -> Self {
        match repr {
            TotalHitsRepr::Count(value) => Self {
                value,
                relation: TotalRelation::Accurate,
            },
            TotalHitsRepr::Object { value, relation } => Self { value, relation },
        }
    }
}

/// Relation between the reported total and the real match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalRelation {
    /// The total is exact.
    #[serde(rename = "eq")]
    Accurate,
    /// The total is a lower bound.
    #[serde(rename = "gte")]
    LowerBound,
}
