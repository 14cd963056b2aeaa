//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zoho Inventory connector CLI
#[derive(Parser, Debug)]
#[command(name = "zoho-inventory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON, takes precedence over --config
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file holding trigger watermarks (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// List resources and the operations each supports
    Resources,

    /// List trigger events
    Events,

    /// Execute one operation
    Execute {
        /// Resource name, e.g. salesOrder
        #[arg(short, long)]
        resource: String,

        /// Operation name, e.g. getAll
        #[arg(short, long)]
        operation: String,

        /// Record ID
        #[arg(long)]
        id: Option<String>,

        /// Payload fields as a JSON object
        #[arg(long)]
        fields_json: Option<String>,

        /// Fetch every page (getAll)
        #[arg(long)]
        return_all: bool,

        /// Maximum records (getAll)
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Predefined filter, e.g. Status.Active
        #[arg(long)]
        filter_by: Option<String>,

        /// Free text search
        #[arg(long)]
        search_text: Option<String>,

        /// Column to sort by
        #[arg(long)]
        sort_column: Option<String>,

        /// Sort direction (A or D)
        #[arg(long)]
        sort_order: Option<String>,

        /// Only records modified after this time
        #[arg(long)]
        last_modified_time: Option<String>,
    },

    /// Run one poll cycle for a trigger event
    Poll {
        /// Event name, e.g. salesOrderCreated
        #[arg(short, long)]
        event: String,

        /// Maximum records per cycle (0 = default)
        #[arg(long, default_value = "50")]
        limit: usize,

        /// Key the watermark is stored under (defaults to the event name)
        #[arg(long)]
        trigger_id: Option<String>,

        /// Forget the stored watermark first, so this cycle takes a new baseline
        #[arg(long)]
        reset: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}

#[cfg(test)]
mod commands_tests {
    use super::*;

    #[test]
    fn test_parse_execute() {
        let cli = Cli::try_parse_from([
            "zoho-inventory",
            "-C",
            "config.yaml",
            "execute",
            "--resource",
            "item",
            "--operation",
            "getAll",
            "--return-all",
            "--filter-by",
            "Status.Active",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("config.yaml")));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Execute {
                resource,
                operation,
                return_all,
                limit,
                filter_by,
                ..
            } => {
                assert_eq!(resource, "item");
                assert_eq!(operation, "getAll");
                assert!(return_all);
                assert_eq!(limit, 50);
                assert_eq!(filter_by.as_deref(), Some("Status.Active"));
            }
            other => panic!("Expected execute, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_poll_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "zoho-inventory",
            "poll",
            "--event",
            "invoiceUpdated",
            "--trigger-id",
            "nightly",
            "-s",
            "state.json",
            "--format",
            "pretty",
        ])
        .unwrap();

        assert_eq!(cli.state, Some(PathBuf::from("state.json")));
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Poll {
                event,
                limit,
                trigger_id,
                reset,
            } => {
                assert_eq!(event, "invoiceUpdated");
                assert_eq!(limit, 50);
                assert_eq!(trigger_id.as_deref(), Some("nightly"));
                assert!(!reset);
            }
            other => panic!("Expected poll, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_poll_reset() {
        let cli =
            Cli::try_parse_from(["zoho-inventory", "poll", "--event", "itemCreated", "--reset"])
                .unwrap();
        assert!(matches!(cli.command, Commands::Poll { reset: true, .. }));
    }

    #[test]
    fn test_execute_requires_resource() {
        assert!(Cli::try_parse_from(["zoho-inventory", "execute", "--operation", "get"]).is_err());
    }
}
