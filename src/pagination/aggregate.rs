//! Fetch-all helpers over a [`PageSource`]

use super::types::{PageRequest, PageSource, PaginationState, MAX_PAGE_SIZE};
use crate::error::Result;
use crate::types::JsonValue;
use tracing::debug;

/// Sequential page walker
///
/// Any page error aborts the walk and the partially accumulated records are
/// dropped.
#[derive(Debug)]
pub struct Paginator<'a, S: PageSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: PageSource + ?Sized> Paginator<'a, S> {
    /// Create a paginator over the given source
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch every record the endpoint has, 200 per page
    pub async fn fetch_all(&self, request: PageRequest) -> Result<Vec<JsonValue>> {
        let request = request.with_per_page(MAX_PAGE_SIZE);
        self.walk(request, PaginationState::unbounded()).await
    }

    /// Fetch at most `limit` records
    ///
    /// The page size shrinks to `limit` when it is below 200. A zero limit
    /// returns immediately without touching the network.
    pub async fn fetch_all_with_limit(
        &self,
        request: PageRequest,
        limit: usize,
    ) -> Result<Vec<JsonValue>> {
        let request = request.with_per_page(limit);
        self.walk(request, PaginationState::bounded(limit)).await
    }

    async fn walk(
        &self,
        mut request: PageRequest,
        mut state: PaginationState,
    ) -> Result<Vec<JsonValue>> {
        if state.is_full() {
            return Ok(state.into_records());
        }

        loop {
            request.page = state.page;
            let page = self.source.fetch_page(&request).await?;

            debug!(
                "Fetched {} page {}: {} records, has_more={}",
                request.endpoint,
                request.page,
                page.len(),
                page.has_more()
            );

            if !state.absorb(page) {
                break;
            }
        }

        debug!(
            "Collected {} records from {}",
            state.records.len(),
            request.endpoint
        );
        Ok(state.into_records())
    }
}
