//! Pagination module
//!
//! Walks Zoho's page-numbered list endpoints.
//!
//! # Overview
//!
//! Every list endpoint answers with the records under a named array field and a
//! `page_context` whose `has_more_page` flag says whether another page exists.
//! [`Paginator`] drives a [`PageSource`] one page at a time, strictly
//! sequentially, either until the server runs out of pages or until a caller
//! supplied limit is reached.

mod aggregate;
mod types;

pub use aggregate::Paginator;
pub use types::{Page, PageContext, PageRequest, PageSource, PaginationState, MAX_PAGE_SIZE};
