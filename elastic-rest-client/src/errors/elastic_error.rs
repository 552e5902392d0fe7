//! Client error types.
//!
//! This module defines the error returned by every client operation. Callers
//! branch on the variant (or on [`ElasticError::is_transport`] /
//! [`ElasticError::is_decode`]) instead of inspecting status codes.

use serde_json::Value;
use thiserror::Error;

use super::TransportError;

/// Errors that can occur during client operations.
#[derive(Debug, Clone, Error)]
pub enum ElasticError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The engine answered with a non-success status.
    #[error("Request failed with status {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error reason reported by the engine, or the raw body.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A request payload could not be serialized.
    #[error("Encode error: {0}")]
    Encode(String),

    /// One or more items of a bulk batch failed.
    #[error("Bulk operation failed: {failed} of {total} items reported errors")]
    Bulk {
        /// Number of items that reported an error.
        failed: usize,
        /// Number of items in the batch.
        total: usize,
    },

    /// Input rejected before any request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ElasticError {
    /// Create a status error from a response status and body.
    ///
    /// The reason is taken from `error.reason` when the body is an engine
    /// error document, otherwise the raw body is kept.
    pub fn status(status: u16, body: &str) -> Self {
        let reason = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| match &value["error"] {
                Value::Object(error) => error
                    .get("reason")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                Value::String(reason) => Some(reason.clone()),
                _ => None,
            })
            .unwrap_or_else(|| body.to_string());

        Self::Status { status, reason }
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an encode error.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Create a bulk error.
    pub fn bulk(failed: usize, total: usize) -> Self {
        Self::Bulk { failed, total }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures of the HTTP exchange itself: no response, or a
    /// non-success status.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// True when a response arrived but could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// The HTTP status, for status errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason_from_error_document() {
        let body = r#"{"error":{"type":"search_context_missing_exception","reason":"No search context found for id [62]"},"status":404}"#;

        let err = ElasticError::status(404, body);

        assert!(err.is_transport());
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(
            err.to_string(),
            "Request failed with status 404: No search context found for id [62]"
        );
    }

    #[test]
    fn test_status_reason_falls_back_to_body() {
        let err = ElasticError::status(502, "Bad Gateway");

        match err {
            ElasticError::Status { status, reason } => {
                assert_eq!(status, 502);
                assert_eq!(reason, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_kinds() {
        assert!(ElasticError::from(TransportError::connection("refused")).is_transport());
        assert!(ElasticError::decode("bad").is_decode());
        assert!(!ElasticError::decode("bad").is_transport());
        assert!(!ElasticError::bulk(1, 3).is_transport());
        assert_eq!(
            ElasticError::bulk(1, 3).to_string(),
            "Bulk operation failed: 1 of 3 items reported errors"
        );
    }
}
