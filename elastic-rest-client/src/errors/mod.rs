//! Error types for the elastic-rest client.

mod elastic_error;
mod transport_error;

pub use elastic_error::ElasticError;
pub use transport_error::TransportError;
