//! Elastic REST client implementation.
//!
//! This module provides the main entry point. Application code builds one
//! `ElasticRestClient` from a [`ClientConfig`] and obtains the document,
//! index, bulk and scroll clients from it. All of them share one transport.

use std::sync::Arc;

use elastic_rest_shared::{IndexName, StringSearchQuery};
use tracing::{info, instrument};

use crate::bulk::BulkClient;
use crate::config::ClientConfig;
use crate::document::DocumentClient;
use crate::errors::ElasticError;
use crate::index::IndexClient;
use crate::interfaces::{HttpRequest, HttpTransport};
use crate::opensearch::OpenSearchTransport;
use crate::request::send_checked;
use crate::scroll::ScrollSearch;
use crate::types::ClusterInfo;

/// The main client for talking to an Elasticsearch-compatible engine.
///
/// # Example
///
/// ```ignore
/// use elastic_rest_client::{ClientConfig, ElasticRestClient};
/// use elastic_rest_shared::{DocumentId, IndexName};
///
/// let client = ElasticRestClient::new(&ClientConfig::from_env()?)?;
/// let index = IndexName::new("testindex");
///
/// client.document().index(&index, &DocumentId::new("1"), &json!({"string": "value"})).await?;
/// let document = client.document().get(&index, &DocumentId::new("1")).await?;
/// ```
#[derive(Clone)]
pub struct ElasticRestClient {
    transport: Arc<dyn HttpTransport>,
    documents: DocumentClient,
    indices: IndexClient,
}

impl ElasticRestClient {
    /// Create a client backed by the `opensearch` transport.
    ///
    /// # Returns
    ///
    /// * `Ok(ElasticRestClient)` - A new client instance
    /// * `Err(ElasticError)` - If the configuration is invalid
    pub fn new(config: &ClientConfig) -> Result<Self, ElasticError> {
        config.validate()?;
        let transport = OpenSearchTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client over any transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            documents: DocumentClient::new(transport.clone()),
            indices: IndexClient::new(transport.clone()),
            transport,
        }
    }

    /// Document operations.
    pub fn document(&self) -> &DocumentClient {
        &self.documents
    }

    /// Index administration.
    pub fn index(&self) -> &IndexClient {
        &self.indices
    }

    /// Start a new bulk session with an empty queue.
    pub fn bulk(&self) -> BulkClient {
        BulkClient::new(self.transport.clone())
    }

    /// Start a scroll session over every document matching `query`.
    ///
    /// No request is sent until the first `advance`.
    pub fn scroll_search(
        &self,
        index: IndexName,
        query: StringSearchQuery,
        page_size: usize,
    ) -> Result<ScrollSearch, ElasticError> {
        ScrollSearch::new(self.transport.clone(), index, query, page_size)
    }

    /// Check connectivity and return the cluster identification.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<ClusterInfo, ElasticError> {
        let info: ClusterInfo = send_checked(self.transport.as_ref(), HttpRequest::get(""))
            .await?
            .json()?;

        info!(
            cluster = %info.cluster_name,
            version = %info.version.number,
            "Connected to cluster"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TransportError;
    use crate::testing::{FakeScrollEngine, MockTransport};
    use elastic_rest_shared::DocumentId;
    use serde_json::json;

    #[tokio::test]
    async fn test_ping() {
        let mock = Arc::new(MockTransport::new().with_json(
            200,
            json!({"name": "node-1", "cluster_name": "docker-cluster", "version": {"number": "7.10.2"}}),
        ));
        let client = ElasticRestClient::with_transport(mock.clone());

        let info = client.ping().await.unwrap();

        assert_eq!(info.cluster_name, "docker-cluster");
        assert_eq!(mock.requests().await[0].path, "");
    }

    #[tokio::test]
    async fn test_ping_unreachable() {
        let mock = Arc::new(MockTransport::new().with_error(TransportError::connection("refused")));
        let client = ElasticRestClient::with_transport(mock);

        let err = client.ping().await.unwrap_err();

        assert!(matches!(err, ElasticError::Transport(TransportError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_sub_clients_share_transport() {
        let mock = Arc::new(
            MockTransport::new()
                .with_json(200, json!({"acknowledged": true}))
                .with_json(404, json!({"found": false}))
                .with_json(200, json!({"took": 1, "errors": false, "items": []})),
        );
        let client = ElasticRestClient::with_transport(mock.clone());
        let index = IndexName::new("testindex");

        client.index().create(&index).await.unwrap();
        let missing = client.document().get(&index, &DocumentId::new("x")).await.unwrap();
        let mut bulk = client.bulk();
        bulk.add_delete(&index, &DocumentId::new("x")).await.unwrap();
        bulk.commit(true).await.unwrap();

        assert!(missing.is_none());
        assert_eq!(mock.request_count().await, 3);
    }

    #[tokio::test]
    async fn test_scroll_search_from_facade() {
        let engine = Arc::new(FakeScrollEngine::with_documents("testindex", 4));
        let client = ElasticRestClient::with_transport(engine);

        let mut scroll = client
            .scroll_search(IndexName::new("testindex"), StringSearchQuery::new("*"), 3)
            .unwrap();

        assert!(scroll.advance().await.unwrap());
        assert_eq!(scroll.current_page().len(), 3);
        assert!(client
            .scroll_search(IndexName::new("testindex"), StringSearchQuery::new("*"), 0)
            .is_err());
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let result = ElasticRestClient::new(&ClientConfig::new("localhost:9200"));

        assert!(result.is_err());
    }
}
