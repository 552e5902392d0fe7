//! HTTP transport trait definition.
//!
//! This module defines the request/response pair exchanged with the search
//! engine and the abstract transport that carries it, allowing the clients to
//! run against the `opensearch` transport in production and against scripted
//! fakes in tests.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{ElasticError, TransportError};

/// HTTP verbs used by the clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// HEAD
    Head,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        };
        f.write_str(name)
    }
}

/// Content type of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// A single JSON document.
    Json,
    /// Newline-delimited JSON, used by `_bulk`.
    NdJson,
}

impl ContentType {
    /// The MIME type sent in the `Content-Type` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::NdJson => "application/x-ndjson",
        }
    }
}

/// A request to the search engine, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path relative to the base URL, e.g. `testindex/_search`.
    pub path: String,
    /// Query string parameters, in order.
    pub query: Vec<(String, String)>,
    /// Serialized body, if any.
    pub body: Option<String>,
    /// Content type of `body`.
    pub content_type: ContentType,
}

impl HttpRequest {
    /// Create a request without body or query parameters.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            content_type: ContentType::Json,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Create a PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Create a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Create a HEAD request.
    pub fn head(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Head, path)
    }

    /// Append a query string parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ElasticError> {
        let json = serde_json::to_string(body).map_err(|e| ElasticError::encode(e.to_string()))?;
        self.body = Some(json);
        self.content_type = ContentType::Json;
        Ok(self)
    }

    /// Use an already rendered newline-delimited JSON body.
    pub fn with_ndjson(mut self, body: String) -> Self {
        self.body = Some(body);
        self.content_type = ContentType::NdJson;
        self
    }

    /// Look up a query string parameter.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The body parsed back into JSON, if it is a single JSON document.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        match self.content_type {
            ContentType::Json => self
                .body
                .as_deref()
                .and_then(|body| serde_json::from_str(body).ok()),
            ContentType::NdJson => None,
        }
    }
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            write!(f, "{separator}{key}={value}")?;
        }
        Ok(())
    }
}

/// Status and body of an engine response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (empty for HEAD requests).
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is 404.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Turn a non-success status into [`ElasticError::Status`].
    pub fn error_for_status(self) -> Result<Self, ElasticError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ElasticError::status(self.status, &self.body))
        }
    }

    /// Decode the body into `T`, ignoring unknown fields.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ElasticError> {
        if self.body.trim().is_empty() {
            return Err(ElasticError::decode("empty response body"));
        }
        serde_json::from_str(&self.body).map_err(|e| ElasticError::decode(e.to_string()))
    }
}

/// Abstract interface for sending requests to the search engine.
///
/// Implementations resolve the request path against their base URL, attach
/// authentication and the content type, and return whatever status the
/// engine answered with. Only failures to obtain a response are errors.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one transport is shared by every
/// client and session created from an [`ElasticRestClient`](crate::ElasticRestClient).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the engine's response.
    ///
    /// # Returns
    ///
    /// * `Ok(HttpResponse)` - Any response, including non-success statuses
    /// * `Err(TransportError)` - If no response could be obtained
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
