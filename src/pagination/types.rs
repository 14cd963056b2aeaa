//! Pagination types and traits
//!
//! Defines the single-page fetch capability and the per-call aggregation state.

use crate::error::Result;
use crate::types::{JsonObject, JsonValue, Method, QueryParams};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Largest page size Zoho accepts for `per_page`
pub const MAX_PAGE_SIZE: usize = 200;

/// One page worth of request parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// HTTP method
    pub method: Method,
    /// Endpoint path relative to the API root, e.g. `/items`
    pub endpoint: String,
    /// Name of the array field holding the records
    pub records_field: String,
    /// Filter, sort and search parameters
    pub query: QueryParams,
    /// 1-based page number
    pub page: u32,
    /// Page size, never above [`MAX_PAGE_SIZE`]
    pub per_page: usize,
}

impl PageRequest {
    /// Create a GET request for the first page of an endpoint
    pub fn new(endpoint: impl Into<String>, records_field: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            endpoint: endpoint.into(),
            records_field: records_field.into(),
            query: QueryParams::new(),
            page: 1,
            per_page: MAX_PAGE_SIZE,
        }
    }

    /// Override the HTTP method
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Replace the base query
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Add a single query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set the page size, clamped to [`MAX_PAGE_SIZE`]
    #[must_use]
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.min(MAX_PAGE_SIZE);
        self
    }

    /// Query including the `page` and `per_page` parameters
    pub fn paged_query(&self) -> QueryParams {
        let mut query = self.query.clone();
        query.insert("page".to_string(), self.page.to_string());
        query.insert("per_page".to_string(), self.per_page.to_string());
        query
    }
}

/// Pagination metadata returned by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageContext {
    /// Page number that was served
    pub page: Option<u32>,
    /// Page size that was served
    pub per_page: Option<u32>,
    /// Whether another page exists
    pub has_more_page: bool,
    /// Filter the server applied
    pub applied_filter: Option<String>,
    /// Column the server sorted by
    pub sort_column: Option<String>,
    /// Sort direction, `A` or `D`
    pub sort_order: Option<String>,
}

/// A decoded page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records under the requested field, `None` when the field is missing or not an array
    pub records: Option<Vec<JsonValue>>,
    /// Pagination metadata, when the server sent any
    pub page_context: Option<PageContext>,
}

impl Page {
    /// Build a page from a decoded response body
    pub fn from_body(mut body: JsonObject, records_field: &str) -> Self {
        let records = match body.remove(records_field) {
            Some(JsonValue::Array(records)) => Some(records),
            _ => None,
        };
        let page_context = body
            .remove("page_context")
            .and_then(|ctx| serde_json::from_value(ctx).ok());

        Self {
            records,
            page_context,
        }
    }

    /// Whether the server reported another page
    pub fn has_more(&self) -> bool {
        self.page_context
            .as_ref()
            .is_some_and(|ctx| ctx.has_more_page)
    }

    /// Number of records on the page
    pub fn len(&self) -> usize {
        self.records.as_ref().map_or(0, Vec::len)
    }

    /// Whether the page carried no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Single-page fetch capability
///
/// Implementations add `organization_id` and translate provider failures into
/// [`crate::Error`]; the paginator never retries.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page described by `request`
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page>;
}

/// Aggregation state for one paginated walk
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Records accumulated so far, in server order
    pub records: Vec<JsonValue>,
    /// Next page to request
    pub page: u32,
    /// Cap on accumulated records
    pub limit: Option<usize>,
}

impl PaginationState {
    /// State for a walk that runs until the server is exhausted
    pub fn unbounded() -> Self {
        Self {
            records: Vec::new(),
            page: 1,
            limit: None,
        }
    }

    /// State for a walk capped at `limit` records
    pub fn bounded(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            page: 1,
            limit: Some(limit),
        }
    }

    /// Records still accepted before the cap is hit
    pub fn remaining(&self) -> Option<usize> {
        self.limit
            .map(|limit| limit.saturating_sub(self.records.len()))
    }

    /// Whether the cap has been reached
    pub fn is_full(&self) -> bool {
        self.remaining() == Some(0)
    }

    /// Fold a fetched page into the state, returning whether to fetch another
    pub fn absorb(&mut self, page: Page) -> bool {
        self.page += 1;
        let has_more = page.has_more();

        let Some(records) = page.records else {
            return false;
        };

        match self.remaining() {
            Some(remaining) => self.records.extend(records.into_iter().take(remaining)),
            None => self.records.extend(records),
        }

        has_more && !self.is_full()
    }

    /// Consume the state, returning the accumulated records
    pub fn into_records(self) -> Vec<JsonValue> {
        self.records
    }
}
