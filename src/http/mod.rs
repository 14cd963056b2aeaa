//! HTTP transport
//!
//! Reqwest client with optional retries, backoff and a per-minute token
//! bucket. Zoho-specific envelope handling lives in [`crate::api`].

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, RetryPolicy,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
