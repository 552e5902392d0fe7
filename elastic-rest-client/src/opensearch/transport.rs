//! OpenSearch transport implementation.
//!
//! This module provides the concrete implementation of `HttpTransport`
//! on top of the `opensearch` crate's HTTP transport.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::{
        headers::{HeaderMap, HeaderValue, CONTENT_TYPE},
        transport::{SingleNodeConnectionPool, TransportBuilder},
        Method,
    },
    OpenSearch,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::errors::TransportError;
use crate::interfaces::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// `HttpTransport` backed by a single-node `opensearch` connection.
///
/// # Example
///
/// ```ignore
/// use elastic_rest_client::{ClientConfig, opensearch::OpenSearchTransport};
///
/// let config = ClientConfig::new("http://localhost:9200").with_basic_auth("user", "pass");
/// let transport = OpenSearchTransport::new(&config)?;
/// ```
pub struct OpenSearchTransport {
    client: OpenSearch,
    config: ClientConfig,
}

impl OpenSearchTransport {
    /// Create a transport for the configured engine URL.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchTransport)` - A new transport instance
    /// * `Err(TransportError)` - If the URL is invalid or the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let parsed_url =
            Url::parse(&config.url).map_err(|e| TransportError::invalid_url(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(config.request_timeout);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.auth(Credentials::Basic(username.clone(), password.clone()));
        }

        let transport = builder
            .build()
            .map_err(|e| TransportError::connection(e.to_string()))?;

        info!(
            url = %config.url,
            authenticated = config.username.is_some(),
            timeout_secs = config.request_timeout.as_secs(),
            "Created OpenSearch transport"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            config: config.clone(),
        })
    }

    /// The configuration this transport was created from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::Get,
            HttpMethod::Put => Method::Put,
            HttpMethod::Post => Method::Post,
            HttpMethod::Delete => Method::Delete,
            HttpMethod::Head => Method::Head,
        }
    }
}

#[async_trait]
impl HttpTransport for OpenSearchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut headers = HeaderMap::new();
        if request.body.is_some() {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(request.content_type.as_str()),
            );
        }

        let query = if request.query.is_empty() {
            None
        } else {
            Some(request.query.as_slice())
        };

        let path = format!("/{}", request.path.trim_start_matches('/'));

        debug!(request = %request, "Sending request");

        let response = self
            .client
            .send(
                Self::method(request.method),
                &path,
                headers,
                query,
                request.body.clone(),
                None,
            )
            .await
            .map_err(|e| {
                warn!(request = %request, error = %e, "Request failed");
                if e.is_timeout() {
                    TransportError::timeout(e.to_string())
                } else {
                    TransportError::connection(e.to_string())
                }
            })?;

        let status = response.status_code().as_u16();
        let body = if request.method == HttpMethod::Head {
            String::new()
        } else {
            response
                .text()
                .await
                .map_err(|e| TransportError::body(e.to_string()))?
        };

        debug!(request = %request, status = status, "Received response");

        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let config = ClientConfig::new("not a url");

        let result = OpenSearchTransport::new(&config);

        assert!(matches!(result, Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_new_keeps_config() {
        let config = ClientConfig::new("http://localhost:9200").with_basic_auth("user", "pass");

        let transport = OpenSearchTransport::new(&config).unwrap();

        assert_eq!(transport.config().url, "http://localhost:9200");
        assert_eq!(transport.config().username.as_deref(), Some("user"));
    }

    #[test]
    fn test_method_mapping() {
        assert!(matches!(OpenSearchTransport::method(HttpMethod::Get), Method::Get));
        assert!(matches!(OpenSearchTransport::method(HttpMethod::Head), Method::Head));
        assert!(matches!(OpenSearchTransport::method(HttpMethod::Delete), Method::Delete));
    }
}
