//! Helpers shared by the clients: input checks, URL paths and the
//! send-then-check-status step.

use elastic_rest_shared::{DocumentId, IndexName};
use tracing::warn;

use crate::errors::ElasticError;
use crate::interfaces::{HttpRequest, HttpResponse, HttpTransport};

/// Reject an empty index name before any request is built.
pub(crate) fn ensure_index(index: &IndexName) -> Result<(), ElasticError> {
    if index.as_str().trim().is_empty() {
        return Err(ElasticError::validation("index name must not be empty"));
    }
    Ok(())
}

/// `<index>/<endpoint>`, e.g. `testindex/_search`. Index names are passed
/// through so that patterns like `logs-*` keep working.
pub(crate) fn index_path(index: &IndexName, endpoint: &str) -> String {
    format!("{}/{}", index.as_str(), endpoint)
}

/// `<index>/_doc/<id>` with the id percent-encoded.
pub(crate) fn document_path(index: &IndexName, id: &DocumentId) -> String {
    format!("{}/_doc/{}", index.as_str(), urlencoding::encode(id.as_str()))
}

/// Send a request and return the raw response, whatever its status.
pub(crate) async fn send(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<HttpResponse, ElasticError> {
    Ok(transport.send(request).await?)
}

/// Send a request and turn a non-success status into an error.
pub(crate) async fn send_checked(
    transport: &dyn HttpTransport,
    request: HttpRequest,
) -> Result<HttpResponse, ElasticError> {
    let description = request.to_string();
    let response = send(transport, request).await?;
    if !response.is_success() {
        warn!(request = %description, status = response.status, body = %response.body, "Request rejected");
    }
    response.error_for_status()
}
