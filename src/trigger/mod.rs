//! Polling triggers
//!
//! Detects newly created or updated records by polling the newest page of a
//! list endpoint and comparing each record's time field against a persisted
//! watermark.
//!
//! # Overview
//!
//! A trigger instance starts uninitialized. Its first successful poll only
//! records the newest timestamp (the baseline) and emits nothing. Every later
//! poll emits the records strictly newer than the watermark read at the start
//! of that poll. Fetch failures never escape [`Poller::poll`]; they are logged
//! and reported through [`PollOutcome::Failed`] and [`PollStats`].

mod poller;
mod timestamp;
mod types;

pub use poller::Poller;
pub use timestamp::{is_newer, parse_timestamp, ZOHO_TIMESTAMP_FORMAT};
pub use types::{PollOptions, PollOutcome, PollStats, TriggerEvent, DEFAULT_POLL_LIMIT};

#[cfg(test)]
mod tests;
