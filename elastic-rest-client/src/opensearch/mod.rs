//! OpenSearch implementation of the HTTP transport.
//!
//! This module provides a concrete implementation of `HttpTransport`
//! using the `opensearch` crate as the HTTP layer.

mod transport;

pub use transport::OpenSearchTransport;
