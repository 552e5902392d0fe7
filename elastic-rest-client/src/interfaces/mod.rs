//! Interface definitions for the elastic-rest client.
//!
//! This module defines the abstract `HttpTransport` trait that the clients
//! are written against, allowing for dependency injection of the transport.

mod http_transport;

pub use http_transport::{ContentType, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
