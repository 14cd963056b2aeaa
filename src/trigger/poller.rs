//! Watermark poller

use super::timestamp::is_newer;
use super::types::{PollOptions, PollOutcome, PollStats, TriggerEvent};
use crate::error::Result;
use crate::pagination::{PageRequest, PageSource};
use crate::state::StateManager;
use crate::types::JsonValue;
use tracing::{debug, error, info};

/// Polls one trigger instance
///
/// Watermarks are stored under the trigger ID, which defaults to the event
/// name. Instances watching the same event need distinct IDs.
#[derive(Debug)]
pub struct Poller<'a, S: PageSource + ?Sized> {
    source: &'a S,
    state: StateManager,
    event: TriggerEvent,
    trigger_id: String,
    options: PollOptions,
    stats: PollStats,
}

impl<'a, S: PageSource + ?Sized> Poller<'a, S> {
    /// Create a poller for an event with default options
    pub fn new(source: &'a S, state: StateManager, event: TriggerEvent) -> Self {
        Self {
            source,
            state,
            event,
            trigger_id: event.as_str().to_string(),
            options: PollOptions::default(),
            stats: PollStats::new(),
        }
    }

    /// Store the watermark under a custom ID
    #[must_use]
    pub fn with_trigger_id(mut self, trigger_id: impl Into<String>) -> Self {
        self.trigger_id = trigger_id.into();
        self
    }

    /// Override the poll options
    #[must_use]
    pub fn with_options(mut self, options: PollOptions) -> Self {
        self.options = options;
        self
    }

    /// Event being watched
    pub fn event(&self) -> TriggerEvent {
        self.event
    }

    /// Key the watermark is stored under
    pub fn trigger_id(&self) -> &str {
        &self.trigger_id
    }

    /// Counters for the cycles run so far
    pub fn stats(&self) -> &PollStats {
        &self.stats
    }

    /// Request for the newest page, sorted by the event's time field
    pub fn request(&self, watermark: Option<&str>) -> PageRequest {
        let time_field = self.event.time_field();
        let mut request = PageRequest::new(self.event.endpoint(), self.event.records_field())
            .with_per_page(self.options.effective_limit())
            .param("sort_column", time_field)
            .param("sort_order", "D");

        if let Some(watermark) = watermark {
            request = request.param("last_modified_time", watermark);
        }

        request
    }

    /// Drop the stored watermark so the next cycle takes a fresh baseline
    pub async fn reset(&self) -> Result<()> {
        info!("Resetting watermark for trigger {}", self.trigger_id);
        self.state.clear_trigger(&self.trigger_id).await
    }

    /// Run one cycle and return the records to emit
    pub async fn poll(&mut self) -> Option<Vec<JsonValue>> {
        self.poll_cycle().await.into_records()
    }

    /// Run one cycle and report what happened
    pub async fn poll_cycle(&mut self) -> PollOutcome {
        let outcome = self.run_cycle().await;
        debug!(
            "Poll {} ({}): {}",
            self.trigger_id,
            self.event,
            outcome.label()
        );
        self.stats.record(&outcome);
        outcome
    }

    async fn run_cycle(&self) -> PollOutcome {
        let previous = self.state.get_watermark(&self.trigger_id).await;
        let request = self.request(previous.as_deref());

        let page = match self.source.fetch_page(&request).await {
            Ok(page) => page,
            Err(e) => {
                error!("Zoho Inventory trigger {} failed: {}", self.event, e);
                return PollOutcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        let records = page.records.unwrap_or_default();
        if records.is_empty() {
            return PollOutcome::Empty;
        }

        let time_field = self.event.time_field();
        let newest = records
            .first()
            .and_then(|record| record_time(record, time_field))
            .map(str::to_string);

        if let Some(ref newest) = newest {
            if let Err(e) = self
                .state
                .set_watermark(&self.trigger_id, newest.clone())
                .await
            {
                error!(
                    "Failed to persist watermark for trigger {}: {}",
                    self.trigger_id, e
                );
                return PollOutcome::Failed {
                    message: e.to_string(),
                };
            }
        }

        let Some(previous) = previous else {
            info!(
                "Trigger {} baselined at {}",
                self.trigger_id,
                newest.as_deref().unwrap_or("<no timestamp>")
            );
            return PollOutcome::Baseline { watermark: newest };
        };

        let limit = self.options.effective_limit();
        let fresh: Vec<JsonValue> = records
            .into_iter()
            .filter(|record| {
                record_time(record, time_field).is_some_and(|time| is_newer(time, &previous))
            })
            .take(limit)
            .collect();

        if fresh.is_empty() {
            PollOutcome::NoNewRecords
        } else {
            info!(
                "Trigger {} emitted {} records",
                self.trigger_id,
                fresh.len()
            );
            PollOutcome::Emitted(fresh)
        }
    }
}

/// Non-empty string value of the time field
fn record_time<'r>(record: &'r JsonValue, time_field: &str) -> Option<&'r str> {
    record
        .get(time_field)
        .and_then(JsonValue::as_str)
        .filter(|time| !time.is_empty())
}
