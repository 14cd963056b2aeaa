//! CLI runner - executes commands

use crate::api::ZohoClient;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::resources::{execute, ListFilters, ListOptions, Operation, OperationRequest, Resource};
use crate::state::StateManager;
use crate::trigger::{PollOptions, PollOutcome, Poller, TriggerEvent};
use crate::types::{non_blank, JsonObject};
use serde_json::{json, Value};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Resources => {
                self.resources();
                Ok(())
            }
            Commands::Events => {
                self.events();
                Ok(())
            }
            Commands::Execute {
                resource,
                operation,
                id,
                fields_json,
                return_all,
                limit,
                filter_by,
                search_text,
                sort_column,
                sort_order,
                last_modified_time,
            } => {
                let resource = resource.parse::<Resource>()?;
                let operation = operation.parse::<Operation>()?;
                let mut request = OperationRequest::new(resource, operation);
                request.id = non_blank(id.clone());
                request.fields = parse_fields(fields_json.as_deref())?;
                request.list = ListOptions {
                    return_all: *return_all,
                    limit: *limit,
                    filters: ListFilters {
                        filter_by: filter_by.clone(),
                        search_text: search_text.clone(),
                        sort_column: sort_column.clone(),
                        sort_order: sort_order.clone(),
                        last_modified_time: last_modified_time.clone(),
                    },
                };
                self.execute(&request).await
            }
            Commands::Poll {
                event,
                limit,
                trigger_id,
                reset,
            } => {
                let event = event.parse::<TriggerEvent>()?;
                self.poll(event, *limit, trigger_id.as_deref(), *reset)
                    .await
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<ConnectorConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return ConnectorConfig::from_json(json_str);
        }

        if let Some(path) = &self.cli.config {
            return ConnectorConfig::from_file(path);
        }

        Err(Error::config("No configuration given (use -C <file> or --config-json)"))
    }

    /// Load trigger state
    fn load_state(&self) -> Result<StateManager> {
        match &self.cli.state {
            Some(path) => StateManager::from_file(path),
            None => Ok(StateManager::in_memory()),
        }
    }

    fn client(&self) -> Result<ZohoClient> {
        ZohoClient::new(&self.load_config()?)
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let client = self.client()?;
        info!(
            "Checking connection to organization {}",
            client.organization_id()
        );

        let status = client.check().await;
        self.output_message(&serde_json::to_value(&status)?);
        Ok(())
    }

    /// List resources with their operations
    fn resources(&self) {
        let resources: Vec<Value> = Resource::ALL
            .into_iter()
            .map(|resource| {
                json!({
                    "resource": resource.as_str(),
                    "endpoint": resource.endpoint(),
                    "operations": resource
                        .operations()
                        .iter()
                        .map(|op| op.as_str())
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        self.output_message(&Value::Array(resources));
    }

    /// List trigger events
    fn events(&self) {
        let events: Vec<Value> = TriggerEvent::ALL
            .into_iter()
            .map(|event| {
                json!({
                    "event": event.as_str(),
                    "endpoint": event.endpoint(),
                    "recordsField": event.records_field(),
                    "timeField": event.time_field(),
                })
            })
            .collect();

        self.output_message(&Value::Array(events));
    }

    /// Execute one operation
    async fn execute(&self, request: &OperationRequest) -> Result<()> {
        let client = self.client()?;
        let result = execute(&client, request).await?;
        self.output_message(&result);
        Ok(())
    }

    /// Run one poll cycle
    async fn poll(
        &self,
        event: TriggerEvent,
        limit: usize,
        trigger_id: Option<&str>,
        reset: bool,
    ) -> Result<()> {
        let client = self.client()?;
        let state = self.load_state()?;
        if state.is_in_memory() {
            warn!("No state file given; the watermark will not survive this run");
        }

        let mut poller =
            Poller::new(&client, state, event).with_options(PollOptions::with_limit(limit));
        if let Some(id) = trigger_id {
            poller = poller.with_trigger_id(id);
        }
        if reset {
            poller.reset().await?;
        }

        match poller.poll_cycle().await {
            PollOutcome::Emitted(records) => {
                info!("{} emitted {} records", event, records.len());
                self.output_message(&Value::Array(records));
                Ok(())
            }
            PollOutcome::Failed { message } => Err(Error::Other(message)),
            PollOutcome::Baseline { .. } | PollOutcome::NoNewRecords | PollOutcome::Empty => {
                Ok(())
            }
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Parse `--fields-json`, an empty object when absent
fn parse_fields(raw: Option<&str>) -> Result<JsonObject> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Ok(JsonObject::new());
    };

    match serde_json::from_str(raw) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(Error::invalid_param("fields-json", "expected a JSON object")),
        Err(e) => Err(Error::invalid_param("fields-json", e.to_string())),
    }
}
