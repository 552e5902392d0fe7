//! Single-request document operations.
//!
//! Every method here is one HTTP round trip: build the request, send it,
//! check the status and decode the body. Nothing is cached or retried.

use std::sync::Arc;

use elastic_rest_shared::{
    DocumentId, ElasticDocument, FieldName, FieldValue, IndexName, SearchResponse,
    StringSearchQuery, UpdateByStringQuery,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::errors::ElasticError;
use crate::interfaces::{HttpRequest, HttpTransport};
use crate::request::{document_path, ensure_index, index_path, send, send_checked};
use crate::types::{ByQueryResponse, CountResponse, WriteResponse};

/// Result cap used by [`DocumentClient::search`].
pub const DEFAULT_SEARCH_SIZE: usize = 1000;

/// Client for document CRUD, search, count and by-query operations.
#[derive(Clone)]
pub struct DocumentClient {
    transport: Arc<dyn HttpTransport>,
}

impl DocumentClient {
    /// Create a document client over the given transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Store `document` under `id`, replacing any previous version.
    #[instrument(skip(self, document), fields(index = %index, id = %id))]
    pub async fn index<T>(
        &self,
        index: &IndexName,
        id: &DocumentId,
        document: &T,
    ) -> Result<WriteResponse, ElasticError>
    where
        T: Serialize + ?Sized,
    {
        ensure_index(index)?;
        let request = HttpRequest::put(document_path(index, id)).with_json(document)?;

        let response: WriteResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        debug!(result = %response.result, version = ?response.version, "Document indexed");
        Ok(response)
    }

    /// Store `document` under an id chosen by the engine.
    #[instrument(skip(self, document), fields(index = %index))]
    pub async fn index_auto_id<T>(
        &self,
        index: &IndexName,
        document: &T,
    ) -> Result<WriteResponse, ElasticError>
    where
        T: Serialize + ?Sized,
    {
        ensure_index(index)?;
        let request = HttpRequest::post(index_path(index, "_doc")).with_json(document)?;

        let response: WriteResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        debug!(id = %response.id, "Document indexed with generated id");
        Ok(response)
    }

    /// Fetch a document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(document))` - If the document exists
    /// * `Ok(None)` - If the engine answered 404
    /// * `Err(ElasticError)` - On any other failure
    #[instrument(skip(self), fields(index = %index, id = %id))]
    pub async fn get(
        &self,
        index: &IndexName,
        id: &DocumentId,
    ) -> Result<Option<ElasticDocument>, ElasticError> {
        ensure_index(index)?;
        let response = send(self.transport.as_ref(), HttpRequest::get(document_path(index, id))).await?;

        if response.is_not_found() {
            debug!("Document not found");
            return Ok(None);
        }

        let document: ElasticDocument = response.error_for_status()?.json()?;
        Ok(Some(document))
    }

    /// Delete a document by id.
    #[instrument(skip(self), fields(index = %index, id = %id))]
    pub async fn delete(
        &self,
        index: &IndexName,
        id: &DocumentId,
    ) -> Result<WriteResponse, ElasticError> {
        ensure_index(index)?;
        let request = HttpRequest::delete(document_path(index, id));

        let response: WriteResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        debug!(result = %response.result, "Document deleted");
        Ok(response)
    }

    /// Search with the default result cap of [`DEFAULT_SEARCH_SIZE`].
    pub async fn search(
        &self,
        index: &IndexName,
        query: &StringSearchQuery,
    ) -> Result<Vec<ElasticDocument>, ElasticError> {
        self.search_with_size(index, query, DEFAULT_SEARCH_SIZE).await
    }

    /// Search returning at most `size` documents.
    #[instrument(skip(self, query), fields(index = %index, query = %query.expression()))]
    pub async fn search_with_size(
        &self,
        index: &IndexName,
        query: &StringSearchQuery,
        size: usize,
    ) -> Result<Vec<ElasticDocument>, ElasticError> {
        ensure_index(index)?;
        let request = HttpRequest::post(index_path(index, "_search"))
            .with_query("size", size)
            .with_json(query)?;

        let response: SearchResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;
        let documents = response.into_documents();

        debug!(hits = documents.len(), "Search completed");
        Ok(documents)
    }

    /// Count the documents matching `query`.
    #[instrument(skip(self, query), fields(index = %index, query = %query.expression()))]
    pub async fn count(
        &self,
        index: &IndexName,
        query: &StringSearchQuery,
    ) -> Result<u64, ElasticError> {
        ensure_index(index)?;
        let request = HttpRequest::post(index_path(index, "_count")).with_json(query)?;

        let response: CountResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        response
            .count
            .ok_or_else(|| ElasticError::decode("count response has no `count` field"))
    }

    /// Delete every document matching `query`.
    #[instrument(skip(self, query), fields(index = %index, query = %query.expression()))]
    pub async fn delete_by_query(
        &self,
        index: &IndexName,
        query: &StringSearchQuery,
    ) -> Result<ByQueryResponse, ElasticError> {
        ensure_index(index)?;
        let request = HttpRequest::post(index_path(index, "_delete_by_query")).with_json(query)?;

        let response: ByQueryResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        info!(deleted = response.deleted, total = response.total, "Delete by query completed");
        Ok(response)
    }

    /// Set `field` to `value` on every document matching `query`.
    ///
    /// The field name and value are passed as script parameters; the script
    /// source is fixed.
    #[instrument(skip(self, query, value), fields(index = %index, query = %query.expression(), field = %field))]
    pub async fn update_by_query(
        &self,
        index: &IndexName,
        query: &StringSearchQuery,
        field: &FieldName,
        value: &FieldValue,
    ) -> Result<ByQueryResponse, ElasticError> {
        ensure_index(index)?;
        let body = UpdateByStringQuery::new(query, field, value);
        let request = HttpRequest::post(index_path(index, "_update_by_query")).with_json(&body)?;

        let response: ByQueryResponse = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        info!(updated = response.updated, total = response.total, "Update by query completed");
        Ok(response)
    }
}
