//! # Elastic REST Client
//!
//! This crate wraps the REST API of Elasticsearch-compatible search engines
//! with typed clients: document CRUD and queries, bulk sessions, scroll-based
//! cursor search and index administration. Requests go through the
//! `HttpTransport` trait, implemented for production by the `opensearch`
//! crate's transport.

pub mod bulk;
pub mod client;
pub mod config;
pub mod document;
pub mod errors;
pub mod index;
pub mod interfaces;
pub mod opensearch;
pub mod scroll;
pub mod types;

mod request;
#[cfg(test)]
mod testing;

pub use bulk::{BulkClient, BULK_FLUSH_THRESHOLD};
pub use client::ElasticRestClient;
pub use config::ClientConfig;
pub use document::{DocumentClient, DEFAULT_SEARCH_SIZE};
pub use errors::{ElasticError, TransportError};
pub use index::{IndexClient, IndexSettings};
pub use interfaces::{HttpRequest, HttpResponse, HttpTransport};
pub use opensearch::OpenSearchTransport;
pub use scroll::{ScrollPhase, ScrollSearch, SCROLL_KEEP_ALIVE};
pub use types::{Acknowledged, BulkSummary, ByQueryResponse, ClusterInfo, WriteResponse};
