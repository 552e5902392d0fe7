//! Bulk client.
//!
//! A `BulkClient` owns a queue of bulk actions. Each action is rendered to
//! its NDJSON lines when it is queued, and the queue is sent as a single
//! `POST _bulk` request on commit.

use std::mem;
use std::sync::Arc;

use elastic_rest_shared::{DocumentId, IndexName};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::ElasticError;
use crate::interfaces::{HttpRequest, HttpTransport};
use crate::request::{ensure_index, send_checked};
use crate::types::{BulkResponse, BulkSummary};

/// A non-forced commit flushes once more than this many actions are queued.
pub const BULK_FLUSH_THRESHOLD: usize = 10_000;

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum ActionLine<'a> {
    Index(ActionMeta<'a>),
    Update(ActionMeta<'a>),
    Delete(ActionMeta<'a>),
}

#[derive(Serialize)]
struct ActionMeta<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

#[derive(Serialize)]
struct PartialUpdate<'a, T: ?Sized> {
    doc: &'a T,
}

/// Queue of bulk actions flushed as one `_bulk` request.
///
/// # Example
///
/// ```ignore
/// let mut bulk = client.bulk();
/// bulk.add_index(&index, Some(&id), &document).await?;
/// bulk.add_delete(&index, &stale_id).await?;
/// bulk.commit(true).await?;
/// ```
pub struct BulkClient {
    transport: Arc<dyn HttpTransport>,
    actions: Vec<String>,
    auto_commit: bool,
}

impl BulkClient {
    /// Create an empty bulk session with auto-commit disabled.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            actions: Vec::new(),
            auto_commit: false,
        }
    }

    /// When enabled, every queued action is immediately flushed.
    pub fn set_auto_commit(&mut self, auto_commit: bool) {
        self.auto_commit = auto_commit;
    }

    /// Whether auto-commit is enabled.
    pub fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Number of queued actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Queue an index action. Without an id the engine assigns one.
    pub async fn add_index<T>(
        &mut self,
        index: &IndexName,
        id: Option<&DocumentId>,
        document: &T,
    ) -> Result<(), ElasticError>
    where
        T: Serialize + ?Sized,
    {
        ensure_index(index)?;
        let header = ActionLine::Index(ActionMeta {
            index: index.as_str(),
            id: id.map(DocumentId::as_str),
        });
        let action = render(&header, Some(document))?;
        self.enqueue(action).await
    }

    /// Queue a partial update of an existing document.
    pub async fn add_update<T>(
        &mut self,
        index: &IndexName,
        id: &DocumentId,
        partial: &T,
    ) -> Result<(), ElasticError>
    where
        T: Serialize + ?Sized,
    {
        ensure_index(index)?;
        let header = ActionLine::Update(ActionMeta {
            index: index.as_str(),
            id: Some(id.as_str()),
        });
        let action = render(&header, Some(&PartialUpdate { doc: partial }))?;
        self.enqueue(action).await
    }

    /// Queue a delete.
    pub async fn add_delete(&mut self, index: &IndexName, id: &DocumentId) -> Result<(), ElasticError> {
        ensure_index(index)?;
        let header = ActionLine::Delete(ActionMeta {
            index: index.as_str(),
            id: Some(id.as_str()),
        });
        let action = render::<()>(&header, None)?;
        self.enqueue(action).await
    }

    async fn enqueue(&mut self, action: String) -> Result<(), ElasticError> {
        self.actions.push(action);
        if self.auto_commit {
            self.commit(true).await?;
        }
        Ok(())
    }

    /// Flush the queue as one `_bulk` request.
    ///
    /// The queue is sent when `force` is set or when it holds more than
    /// [`BULK_FLUSH_THRESHOLD`] actions. Once sent it is cleared, whatever
    /// the outcome.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(summary))` - If a batch was sent and every item succeeded
    /// * `Ok(None)` - If nothing was sent
    /// * `Err(ElasticError::Bulk)` - If the engine reported failed items
    #[instrument(skip(self), fields(queued = self.actions.len()))]
    pub async fn commit(&mut self, force: bool) -> Result<Option<BulkSummary>, ElasticError> {
        if self.actions.is_empty() {
            return Ok(None);
        }
        if !force && self.actions.len() <= BULK_FLUSH_THRESHOLD {
            debug!("Below flush threshold, keeping queue");
            return Ok(None);
        }

        let actions = mem::take(&mut self.actions);
        let total = actions.len();
        let request = HttpRequest::post("_bulk").with_ndjson(actions.concat());

        let response: BulkResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        if response.errors {
            let failed = response.failed_items();
            error!(failed = failed, total = total, "Bulk request reported failed items");
            return Err(ElasticError::bulk(failed, total));
        }

        info!(items = total, took_ms = response.took, "Bulk request completed");
        Ok(Some(BulkSummary {
            items: total,
            took: response.took,
        }))
    }
}

impl Drop for BulkClient {
    fn drop(&mut self) {
        if !self.actions.is_empty() {
            warn!(discarded = self.actions.len(), "Bulk session dropped with uncommitted actions");
        }
    }
}

/// Render a header line and optional payload line, each newline-terminated.
fn render<T>(header: &ActionLine<'_>, payload: Option<&T>) -> Result<String, ElasticError>
where
    T: Serialize + ?Sized,
{
    let mut action = serde_json::to_string(header).map_err(|e| ElasticError::encode(e.to_string()))?;
    action.push('\n');
    if let Some(payload) = payload {
        let line = serde_json::to_string(payload).map_err(|e| ElasticError::encode(e.to_string()))?;
        action.push_str(&line);
        action.push('\n');
    }
    Ok(action)
}
