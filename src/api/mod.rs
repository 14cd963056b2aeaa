//! Zoho Inventory API client
//!
//! Wraps the HTTP transport with the parts every Inventory call shares: the
//! `/inventory/v1` root, the mandatory `organization_id` parameter and the
//! `{code, message}` response envelope.

mod client;
mod types;

pub use client::ZohoClient;
pub use types::{ApiResponse, ConnectionStatus};
