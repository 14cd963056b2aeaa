//! `zoho-inventory` command line
//!
//! Thin layer over the library: parse flags, load config and state, run one
//! command, print JSON to stdout.
//!
//! # Commands
//!
//! - `check` - Verify credentials and organization
//! - `resources` - List resources and their operations
//! - `events` - List trigger events
//! - `execute` - Run one resource operation
//! - `poll` - Run one trigger poll cycle

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
