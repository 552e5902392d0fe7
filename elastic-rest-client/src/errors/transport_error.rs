//! Transport error types.
//!
//! This module defines the errors an [`HttpTransport`](crate::interfaces::HttpTransport)
//! can report. A response with a non-success status is not a transport error;
//! status handling belongs to the clients.

use thiserror::Error;

/// Errors raised while moving a request to the engine and reading its reply.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The connection could not be established or was interrupted.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The configured base URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    BodyError(String),
}

impl TransportError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an invalid URL error.
    pub fn invalid_url(msg: impl Into<String>) -> Self {
        Self::InvalidUrl(msg.into())
    }

    /// Create a body read error.
    pub fn body(msg: impl Into<String>) -> Self {
        Self::BodyError(msg.into())
    }
}
