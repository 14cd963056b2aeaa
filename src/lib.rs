#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Zoho Inventory connector
//!
//! Typed client for the Zoho Inventory v1 REST API: every resource operation,
//! list pagination, and watermark-based polling triggers for new and updated
//! records.
//!
//! ## Features
//!
//! - **Resource operations**: twelve resources, from items and sales orders
//!   to composite items and organization settings
//! - **Pagination**: walk every page of a list endpoint, or stop at a limit
//! - **Polling triggers**: emit only records newer than a persisted watermark
//! - **Auth**: static access token or OAuth2 refresh token with caching
//! - **Transport**: per-minute rate limiting and optional retries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zoho_inventory::{execute, ConnectorConfig, Operation, OperationRequest, Resource, ZohoClient};
//!
//! #[tokio::main]
//! async fn main() -> zoho_inventory::Result<()> {
//!     let config = ConnectorConfig::from_file("zoho.yaml")?;
//!     let client = ZohoClient::new(&config)?;
//!
//!     let request = OperationRequest::new(Resource::Item, Operation::GetAll);
//!     let items = execute(&client, &request).await?;
//!     println!("{items}");
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │   resources::execute         │   trigger::Poller            │
//! │   plan → call / page walk    │   newest page vs watermark   │
//! └──────────────┬───────────────┴───────────────┬──────────────┘
//!                │                               │
//! ┌──────────────┴───────────┐     ┌─────────────┴──────────────┐
//! │ pagination::Paginator    │     │ state::StateManager        │
//! └──────────────┬───────────┘     └────────────────────────────┘
//!                │
//! ┌──────────────┴──────────────────────────────────────────────┐
//! │ api::ZohoClient  (organization_id, envelope decoding)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │ http::HttpClient (auth, rate limit, retry)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod pagination;
pub mod resources;
pub mod state;
pub mod trigger;
pub mod types;

pub use api::{ApiResponse, ConnectionStatus, ZohoClient};
pub use config::{ConnectorConfig, Region};
pub use pagination::{PageRequest, Paginator};
pub use resources::{execute, Operation, OperationRequest, Resource};
pub use error::{Error, Result};
pub use state::StateManager;
pub use trigger::{PollOptions, PollOutcome, Poller, TriggerEvent};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
