//! Scroll-based cursor search.
//!
//! A [`ScrollSearch`] walks every document matching a query one page at a
//! time. The first fetch opens a scroll context on the engine; each later
//! fetch presents the token returned by the previous one. A fetch that
//! returns no documents marks the end of the results.
//!
//! ```text
//! NotStarted --advance--> Paging --advance (empty page)--> Exhausted
//!                           ^  |
//!                           +--+ advance (non-empty page)
//! ```
//!
//! A failed fetch leaves the session exactly as it was, so the caller may
//! retry it.

use std::sync::Arc;

use elastic_rest_shared::{ElasticDocument, IndexName, SearchResponse, StringSearchQuery, TotalHits};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::errors::ElasticError;
use crate::interfaces::{HttpRequest, HttpTransport};
use crate::request::{ensure_index, index_path, send, send_checked};

/// How long the engine keeps a scroll context alive between fetches.
pub const SCROLL_KEEP_ALIVE: &str = "1m";

const SCROLL_PATH: &str = "_search/scroll";

/// Where a scroll session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// No page fetched yet.
    NotStarted,
    /// The last fetch returned documents.
    Paging,
    /// The last fetch returned no documents.
    Exhausted,
}

#[derive(Serialize)]
struct ScrollContinuation<'a> {
    scroll: &'a str,
    scroll_id: &'a str,
}

#[derive(Serialize)]
struct ClearScroll<'a> {
    scroll_id: Vec<&'a str>,
}

/// Paginated iteration over every document matching a query.
///
/// # Example
///
/// ```ignore
/// let mut scroll = client.scroll_search(IndexName::new("testindex"), query, 500)?;
/// while scroll.advance().await? {
///     for document in scroll.current_page() {
///         println!("{}", document.id);
///     }
/// }
/// scroll.clear().await?;
/// ```
pub struct ScrollSearch {
    transport: Arc<dyn HttpTransport>,
    index: IndexName,
    query: StringSearchQuery,
    page_size: usize,
    scroll_id: Option<String>,
    page: Vec<ElasticDocument>,
    total_hits: Option<TotalHits>,
    phase: ScrollPhase,
}

impl ScrollSearch {
    /// Create a session. No request is sent until [`advance`](Self::advance).
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is empty or `page_size` is zero.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        index: IndexName,
        query: StringSearchQuery,
        page_size: usize,
    ) -> Result<Self, ElasticError> {
        ensure_index(&index)?;
        if page_size == 0 {
            return Err(ElasticError::validation("page size must be at least 1"));
        }

        Ok(Self {
            transport,
            index,
            query,
            page_size,
            scroll_id: None,
            page: Vec::new(),
            total_hits: None,
            phase: ScrollPhase::NotStarted,
        })
    }

    /// Fetch the next page.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A non-empty page is available from [`current_page`](Self::current_page)
    /// * `Ok(false)` - The page was empty; all results have been seen
    /// * `Err(ElasticError)` - The fetch failed and the session is unchanged
    #[instrument(skip(self), fields(index = %self.index, phase = ?self.phase))]
    pub async fn advance(&mut self) -> Result<bool, ElasticError> {
        let request = match &self.scroll_id {
            None => HttpRequest::post(index_path(&self.index, "_search"))
                .with_query("scroll", SCROLL_KEEP_ALIVE)
                .with_query("size", self.page_size)
                .with_json(&self.query)?,
            Some(scroll_id) => HttpRequest::post(SCROLL_PATH).with_json(&ScrollContinuation {
                scroll: SCROLL_KEEP_ALIVE,
                scroll_id,
            })?,
        };

        let SearchResponse { scroll_id, hits } = send_checked(self.transport.as_ref(), request)
            .await?
            .json()?;
        let scroll_id =
            scroll_id.ok_or_else(|| ElasticError::decode("scroll response has no `_scroll_id`"))?;

        self.scroll_id = Some(scroll_id);
        self.total_hits = hits.total;
        self.page = hits.hits;
        self.phase = if self.page.is_empty() {
            ScrollPhase::Exhausted
        } else {
            ScrollPhase::Paging
        };

        debug!(documents = self.page.len(), "Fetched scroll page");
        Ok(!self.page.is_empty())
    }

    /// Documents of the last successful fetch. Empty before the first fetch
    /// and after the results are exhausted.
    pub fn current_page(&self) -> &[ElasticDocument] {
        &self.page
    }

    /// Total match count reported with the last page.
    pub fn total_hits(&self) -> Option<TotalHits> {
        self.total_hits
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    /// Token that the next fetch will present.
    pub fn scroll_id(&self) -> Option<&str> {
        self.scroll_id.as_deref()
    }

    /// Page size requested from the engine.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index being searched.
    pub fn index(&self) -> &IndexName {
        &self.index
    }

    /// Release the scroll context on the engine.
    ///
    /// Sends nothing when no page was ever fetched. A context that already
    /// expired is not an error.
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn clear(self) -> Result<(), ElasticError> {
        let Some(scroll_id) = self.scroll_id.as_deref() else {
            return Ok(());
        };

        let request = HttpRequest::delete(SCROLL_PATH).with_json(&ClearScroll {
            scroll_id: vec![scroll_id],
        })?;
        let response = send(self.transport.as_ref(), request).await?;

        if response.is_not_found() {
            debug!("Scroll context already released");
            return Ok(());
        }
        response.error_for_status()?;

        debug!("Scroll context cleared");
        Ok(())
    }
}
