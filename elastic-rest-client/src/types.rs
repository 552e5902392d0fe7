//! Response types for document and index operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Acknowledgement of a single-document write (`index` or `delete`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Index the document lives in.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document id, assigned by the engine when none was given.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version after the write.
    #[serde(rename = "_version", default)]
    pub version: Option<i64>,
    /// Outcome reported by the engine: `created`, `updated`, `deleted`, `not_found`.
    #[serde(default)]
    pub result: String,
}

/// Summary of a `_delete_by_query` or `_update_by_query` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ByQueryResponse {
    /// Milliseconds the engine spent on the call.
    pub took: u64,
    /// Number of documents matched.
    pub total: u64,
    /// Number of documents deleted.
    pub deleted: u64,
    /// Number of documents updated.
    pub updated: u64,
    /// Number of documents skipped because of version conflicts.
    pub version_conflicts: u64,
    /// Per-document failures, as reported.
    pub failures: Vec<Value>,
}

impl ByQueryResponse {
    /// Whether every matched document was processed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.version_conflicts == 0
    }
}

/// Plain `{"acknowledged": true}` response of index administration calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledged {
    /// Whether the engine acknowledged the request.
    #[serde(default)]
    pub acknowledged: bool,
}

/// Result of a successful bulk flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkSummary {
    /// Number of actions sent in the batch.
    pub items: usize,
    /// Milliseconds the engine spent on the batch.
    pub took: u64,
}

/// Cluster identification returned by `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterInfo {
    /// Node name.
    pub name: String,
    /// Cluster name.
    pub cluster_name: String,
    /// Engine version.
    pub version: VersionInfo,
}

/// Version block of [`ClusterInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    /// Version number, e.g. `2.11.0`.
    pub number: String,
    /// Distribution (`opensearch`), absent for Elasticsearch.
    pub distribution: Option<String>,
}

/// Response body of `_count`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CountResponse {
    pub count: Option<u64>,
}

/// Response body of `_bulk`. `errors` and `items` are required; a reply
/// without them is not a bulk result.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BulkResponse {
    #[serde(default)]
    pub took: u64,
    pub errors: bool,
    pub items: Vec<Value>,
}

impl BulkResponse {
    /// Number of items carrying an `error` object under their action key.
    pub fn failed_items(&self) -> usize {
        self.items
            .iter()
            .filter(|item| {
                item.as_object()
                    .map(|actions| actions.values().any(|result| result.get("error").is_some()))
                    .unwrap_or(false)
            })
            .count()
    }
}
