//! Index administration: create, delete, exists and refresh.

use std::sync::Arc;

use elastic_rest_shared::IndexName;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::errors::ElasticError;
use crate::interfaces::{HttpRequest, HttpTransport};
use crate::request::{ensure_index, index_path, send, send_checked};
use crate::types::Acknowledged;

/// Settings sent with [`IndexClient::create_with_settings`].
///
/// Serializes to `{"settings": {...}, "mappings": {...}}`, leaving out
/// anything that was not set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexSettings {
    settings: ShardSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    mappings: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct ShardSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    number_of_shards: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    number_of_replicas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_interval: Option<String>,
}

impl IndexSettings {
    /// Empty settings; the engine defaults apply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of primary shards.
    pub fn shards(mut self, shards: u32) -> Self {
        self.settings.number_of_shards = Some(shards);
        self
    }

    /// Set the number of replicas.
    pub fn replicas(mut self, replicas: u32) -> Self {
        self.settings.number_of_replicas = Some(replicas);
        self
    }

    /// Set the refresh interval, e.g. `1s` or `-1`.
    pub fn refresh_interval(mut self, interval: impl Into<String>) -> Self {
        self.settings.refresh_interval = Some(interval.into());
        self
    }

    /// Set the mappings object, e.g. `{"properties": {...}}`.
    pub fn mappings(mut self, mappings: Value) -> Self {
        self.mappings = Some(mappings);
        self
    }
}

/// Client for index-level operations.
#[derive(Clone)]
pub struct IndexClient {
    transport: Arc<dyn HttpTransport>,
}

impl IndexClient {
    /// Create an index client over the given transport.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Create an index with engine defaults.
    #[instrument(skip(self), fields(index = %index))]
    pub async fn create(&self, index: &IndexName) -> Result<Acknowledged, ElasticError> {
        ensure_index(index)?;
        let response: Acknowledged =
            send_checked(self.transport.as_ref(), HttpRequest::put(index.as_str()))
                .await?
                .json()?;

        info!(acknowledged = response.acknowledged, "Index created");
        Ok(response)
    }

    /// Create an index with explicit settings and mappings.
    #[instrument(skip(self, settings), fields(index = %index))]
    pub async fn create_with_settings(
        &self,
        index: &IndexName,
        settings: &IndexSettings,
    ) -> Result<Acknowledged, ElasticError> {
        ensure_index(index)?;
        let request = HttpRequest::put(index.as_str()).with_json(settings)?;

        let response: Acknowledged = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;

        info!(acknowledged = response.acknowledged, "Index created with settings");
        Ok(response)
    }

    /// Delete an index and all of its documents.
    #[instrument(skip(self), fields(index = %index))]
    pub async fn delete(&self, index: &IndexName) -> Result<Acknowledged, ElasticError> {
        ensure_index(index)?;
        let response: Acknowledged =
            send_checked(self.transport.as_ref(), HttpRequest::delete(index.as_str()))
                .await?
                .json()?;

        info!(acknowledged = response.acknowledged, "Index deleted");
        Ok(response)
    }

    /// Whether the index exists.
    #[instrument(skip(self), fields(index = %index))]
    pub async fn exists(&self, index: &IndexName) -> Result<bool, ElasticError> {
        ensure_index(index)?;
        let response = send(self.transport.as_ref(), HttpRequest::head(index.as_str())).await?;

        if response.is_not_found() {
            debug!("Index does not exist");
            return Ok(false);
        }
        response.error_for_status()?;
        Ok(true)
    }

    /// Make recent writes to the index visible to search.
    #[instrument(skip(self), fields(index = %index))]
    pub async fn refresh(&self, index: &IndexName) -> Result<(), ElasticError> {
        ensure_index(index)?;
        send_checked(
            self.transport.as_ref(),
            HttpRequest::post(index_path(index, "_refresh")),
        )
        .await?;

        debug!("Index refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::HttpMethod;
    use crate::testing::MockTransport;
    use serde_json::json;

    fn client(mock: MockTransport) -> (IndexClient, Arc<MockTransport>) {
        let mock = Arc::new(mock);
        (IndexClient::new(mock.clone()), mock)
    }

    #[test]
    fn test_settings_shape() {
        let settings = IndexSettings::new()
            .shards(1)
            .replicas(0)
            .mappings(json!({"properties": {"string": {"type": "keyword"}}}));

        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({
                "settings": {"number_of_shards": 1, "number_of_replicas": 0},
                "mappings": {"properties": {"string": {"type": "keyword"}}}
            })
        );
        assert_eq!(
            serde_json::to_value(IndexSettings::new()).unwrap(),
            json!({"settings": {}})
        );
    }

    #[tokio::test]
    async fn test_create_without_body() {
        let (client, mock) = client(MockTransport::new().with_json(
            200,
            json!({"acknowledged": true, "shards_acknowledged": true, "index": "testindex"}),
        ));

        let ack = client.create(&IndexName::new("testindex")).await.unwrap();

        assert!(ack.acknowledged);
        let requests = mock.requests().await;
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert_eq!(requests[0].path, "testindex");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_create_with_settings() {
        let (client, mock) =
            client(MockTransport::new().with_json(200, json!({"acknowledged": true})));

        client
            .create_with_settings(&IndexName::new("testindex"), &IndexSettings::new().shards(2))
            .await
            .unwrap();

        let body = mock.requests().await[0].json_body().unwrap();
        assert_eq!(body["settings"]["number_of_shards"], json!(2));
    }

    #[tokio::test]
    async fn test_create_existing_index_fails() {
        let (client, _mock) = client(MockTransport::new().with_json(
            400,
            json!({"error": {"type": "resource_already_exists_exception", "reason": "index [testindex] already exists"}}),
        ));

        let err = client.create(&IndexName::new("testindex")).await.unwrap_err();

        assert_eq!(err.status_code(), Some(400));
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_exists() {
        let (client, mock) = client(
            MockTransport::new()
                .with_raw(200, "")
                .with_raw(404, "")
                .with_raw(500, ""),
        );
        let index = IndexName::new("testindex");

        assert!(client.exists(&index).await.unwrap());
        assert!(!client.exists(&index).await.unwrap());
        assert!(client.exists(&index).await.is_err());
        assert_eq!(mock.requests().await[0].method, HttpMethod::Head);
    }

    #[tokio::test]
    async fn test_refresh_and_delete() {
        let (client, mock) = client(
            MockTransport::new()
                .with_json(200, json!({"_shards": {"total": 2, "successful": 1, "failed": 0}}))
                .with_json(200, json!({"acknowledged": true})),
        );
        let index = IndexName::new("testindex");

        client.refresh(&index).await.unwrap();
        let ack = client.delete(&index).await.unwrap();

        assert!(ack.acknowledged);
        let requests = mock.requests().await;
        assert_eq!(requests[0].path, "testindex/_refresh");
        assert_eq!(requests[1].method, HttpMethod::Delete);
    }
}
