//! Zoho timestamp comparison

use chrono::{DateTime, FixedOffset};
use std::cmp::Ordering;

/// Format of `created_time` / `last_modified_time`, e.g. `2024-01-15T10:30:00+0530`
pub const ZOHO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Parse a Zoho timestamp
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, ZOHO_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

/// Whether `candidate` is strictly later than `watermark`
///
/// Falls back to plain string ordering when either side does not parse.
pub fn is_newer(candidate: &str, watermark: &str) -> bool {
    compare(candidate, watermark) == Ordering::Greater
}

fn compare(a: &str, b: &str) -> Ordering {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => a.cmp(b),
    }
}
