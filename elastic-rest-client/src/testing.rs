//! Test doubles for the `HttpTransport` seam.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::errors::TransportError;
use crate::interfaces::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

/// Transport that answers with scripted responses, in order, and records
/// every request it receives.
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response with the given status and JSON body.
    pub(crate) fn with_json(mut self, status: u16, body: Value) -> Self {
        self.responses
            .get_mut()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    /// Queue a response with a raw body.
    pub(crate) fn with_raw(mut self, status: u16, body: &str) -> Self {
        self.responses
            .get_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub(crate) fn with_error(mut self, error: TransportError) -> Self {
        self.responses.get_mut().push_back(Err(error));
        self
    }

    pub(crate) async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    pub(crate) async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().await.push(request);
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::connection("no scripted response left")))
    }
}

const SCROLL_ID: &str = "scroll-ctx-1";

/// In-memory engine serving scroll searches over a fixed set of documents.
///
/// The page size is taken from the `size` parameter of the initial search;
/// continuations must present the token handed out by the initial search.
pub(crate) struct FakeScrollEngine {
    index: String,
    documents: Vec<Value>,
    page_size: AtomicUsize,
    cursor: AtomicUsize,
    fail_next: AtomicBool,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeScrollEngine {
    /// Engine holding `count` documents `{"n": i}` with ids `doc-<i>`.
    pub(crate) fn with_documents(index: &str, count: usize) -> Self {
        let documents = (0..count)
            .map(|i| {
                json!({
                    "_index": index,
                    "_id": format!("doc-{}", i),
                    "_version": 1,
                    "_source": { "n": i }
                })
            })
            .collect();

        Self {
            index: index.to_string(),
            documents,
            page_size: AtomicUsize::new(0),
            cursor: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make the next request fail with a connection error.
    pub(crate) fn fail_next_request(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    fn page(&self) -> HttpResponse {
        let size = self.page_size.load(Ordering::SeqCst);
        let start = self.cursor.load(Ordering::SeqCst).min(self.documents.len());
        let end = (start + size).min(self.documents.len());
        self.cursor.store(end, Ordering::SeqCst);

        let body = json!({
            "_scroll_id": SCROLL_ID,
            "took": 1,
            "timed_out": false,
            "hits": {
                "total": { "value": self.documents.len(), "relation": "eq" },
                "hits": self.documents[start..end].to_vec()
            }
        });
        HttpResponse::new(200, body.to_string())
    }
}

#[async_trait]
impl HttpTransport for FakeScrollEngine {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().await.push(request.clone());

        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TransportError::connection("connection reset"));
        }

        let search_path = format!("{}/_search", self.index);
        match (request.method, request.path.as_str()) {
            (HttpMethod::Post, path) if path == search_path => {
                let size = request
                    .query_param("size")
                    .and_then(|size| size.parse().ok())
                    .unwrap_or(10);
                self.page_size.store(size, Ordering::SeqCst);
                self.cursor.store(0, Ordering::SeqCst);
                Ok(self.page())
            }
            (HttpMethod::Post, "_search/scroll") => {
                let token = request
                    .json_body()
                    .and_then(|body| body["scroll_id"].as_str().map(str::to_string));
                if token.as_deref() == Some(SCROLL_ID) {
                    Ok(self.page())
                } else {
                    let body = json!({
                        "error": { "type": "search_context_missing_exception", "reason": "No search context found" },
                        "status": 404
                    });
                    Ok(HttpResponse::new(404, body.to_string()))
                }
            }
            (HttpMethod::Delete, "_search/scroll") => Ok(HttpResponse::new(
                200,
                json!({ "succeeded": true, "num_freed": 1 }).to_string(),
            )),
            _ => Ok(HttpResponse::new(400, r#"{"error":"unsupported request"}"#)),
        }
    }
}
