//! Tests for the polling trigger

use super::*;
use crate::error::{Error, Result};
use crate::pagination::{Page, PageContext, PageRequest, PageSource};
use crate::state::StateManager;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Mutex;
use test_case::test_case;

/// Returns the same response on every call and records requests
struct FixedSource {
    response: Mutex<Option<Result<Page>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl FixedSource {
    fn records(records: Vec<Value>) -> Self {
        Self::with(Ok(Page {
            records: Some(records),
            page_context: Some(PageContext::default()),
        }))
    }

    fn failing(err: Error) -> Self {
        Self::with(Err(err))
    }

    fn with(response: Result<Page>) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn set_records(&self, records: Vec<Value>) {
        *self.response.lock().unwrap() = Some(Ok(Page {
            records: Some(records),
            page_context: None,
        }));
    }

    fn last_request(&self) -> PageRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageSource for FixedSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        self.requests.lock().unwrap().push(request.clone());
        match self.response.lock().unwrap().as_ref() {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(e)) => Err(Error::Other(e.to_string())),
            None => Ok(Page::default()),
        }
    }
}

fn created(id: u32, time: &str) -> Value {
    json!({"item_id": id.to_string(), "created_time": time})
}

fn ids(records: &[Value]) -> Vec<&str> {
    records
        .iter()
        .filter_map(|r| r["item_id"].as_str())
        .collect()
}

async fn armed_state(trigger_id: &str, watermark: &str) -> StateManager {
    let state = StateManager::in_memory();
    state
        .set_watermark(trigger_id, watermark.to_string())
        .await
        .unwrap();
    state
}

// ============================================================================
// TriggerEvent Tests
// ============================================================================

#[test_case(TriggerEvent::ItemCreated, "/items", "items", "created_time")]
#[test_case(TriggerEvent::ItemUpdated, "/items", "items", "last_modified_time")]
#[test_case(TriggerEvent::SalesOrderUpdated, "/salesorders", "salesorders", "last_modified_time")]
#[test_case(TriggerEvent::PurchaseOrderCreated, "/purchaseorders", "purchaseorders", "created_time")]
#[test_case(TriggerEvent::InvoiceUpdated, "/invoices", "invoices", "last_modified_time")]
#[test_case(TriggerEvent::ContactCreated, "/contacts", "contacts", "created_time")]
#[test_case(TriggerEvent::PackageCreated, "/packages", "packages", "created_time")]
#[test_case(TriggerEvent::ShipmentCreated, "/shipmentorders", "shipmentorders", "created_time")]
#[test_case(TriggerEvent::StockAdjustmentCreated, "/inventoryadjustments", "inventory_adjustments", "created_time")]
#[test_case(TriggerEvent::TransferOrderCreated, "/transferorders", "transfer_orders", "created_time")]
fn test_event_resolution(event: TriggerEvent, endpoint: &str, field: &str, time_field: &str) {
    assert_eq!(event.endpoint(), endpoint);
    assert_eq!(event.records_field(), field);
    assert_eq!(event.time_field(), time_field);
}

#[test]
fn test_event_names_roundtrip() {
    for event in TriggerEvent::ALL {
        assert_eq!(event.as_str().parse::<TriggerEvent>().unwrap(), event);
        assert_eq!(
            serde_json::to_value(event).unwrap(),
            Value::String(event.as_str().to_string())
        );
    }
}

#[test]
fn test_unknown_event() {
    let err = "orderShipped".parse::<TriggerEvent>().unwrap_err();
    assert!(matches!(err, Error::UnknownEvent { event } if event == "orderShipped"));
}

#[test_case(0, 50 ; "zero selects default")]
#[test_case(10, 10 ; "explicit limit")]
#[test_case(500, 500 ; "large limit kept")]
fn test_effective_limit(limit: usize, expected: usize) {
    assert_eq!(PollOptions::with_limit(limit).effective_limit(), expected);
}

// ============================================================================
// Request Tests
// ============================================================================

#[test]
fn test_request_without_watermark() {
    let source = FixedSource::records(vec![]);
    let poller = Poller::new(&source, StateManager::in_memory(), TriggerEvent::InvoiceUpdated);

    let request = poller.request(None);
    assert_eq!(request.endpoint, "/invoices");
    assert_eq!(request.records_field, "invoices");
    assert_eq!(request.per_page, 50);
    assert_eq!(request.page, 1);
    assert_eq!(
        request.query.get("sort_column").map(String::as_str),
        Some("last_modified_time")
    );
    assert_eq!(request.query.get("sort_order").map(String::as_str), Some("D"));
    assert!(!request.query.contains_key("last_modified_time"));
}

#[test]
fn test_request_with_watermark_and_large_limit() {
    let source = FixedSource::records(vec![]);
    let poller = Poller::new(&source, StateManager::in_memory(), TriggerEvent::ItemCreated)
        .with_options(PollOptions::with_limit(1000));

    let request = poller.request(Some("2024-01-01T00:00:00+0000"));
    assert_eq!(request.per_page, 200);
    assert_eq!(
        request.query.get("last_modified_time").map(String::as_str),
        Some("2024-01-01T00:00:00+0000")
    );
}

// ============================================================================
// Poll Cycle Tests
// ============================================================================

#[tokio::test]
async fn test_first_poll_records_baseline() {
    let source = FixedSource::records(vec![
        created(3, "2024-01-03T00:00:00+0000"),
        created(2, "2024-01-02T00:00:00+0000"),
        created(1, "2024-01-01T00:00:00+0000"),
    ]);
    let state = StateManager::in_memory();
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    let outcome = poller.poll_cycle().await;

    assert_eq!(
        outcome,
        PollOutcome::Baseline {
            watermark: Some("2024-01-03T00:00:00+0000".to_string())
        }
    );
    assert_eq!(
        state.get_watermark("itemCreated").await.as_deref(),
        Some("2024-01-03T00:00:00+0000")
    );
    assert!(!source.last_request().query.contains_key("last_modified_time"));
}

#[tokio::test]
async fn test_armed_poll_emits_strictly_newer_records() {
    let source = FixedSource::records(vec![
        created(5, "2024-01-05T00:00:00+0000"),
        created(4, "2024-01-04T00:00:00+0000"),
        created(3, "2024-01-03T00:00:00+0000"),
        created(2, "2024-01-02T00:00:00+0000"),
    ]);
    let state = armed_state("itemCreated", "2024-01-03T00:00:00+0000").await;
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    let records = poller.poll().await.unwrap();

    assert_eq!(ids(&records), vec!["5", "4"]);
    assert_eq!(
        state.get_watermark("itemCreated").await.as_deref(),
        Some("2024-01-05T00:00:00+0000")
    );
    assert_eq!(
        source
            .last_request()
            .query
            .get("last_modified_time")
            .map(String::as_str),
        Some("2024-01-03T00:00:00+0000")
    );
}

#[tokio::test]
async fn test_armed_poll_truncates_to_limit() {
    let source = FixedSource::records(vec![
        created(4, "2024-01-04T00:00:00+0000"),
        created(3, "2024-01-03T00:00:00+0000"),
        created(2, "2024-01-02T00:00:00+0000"),
    ]);
    let state = armed_state("itemCreated", "2024-01-01T00:00:00+0000").await;
    let mut poller = Poller::new(&source, state, TriggerEvent::ItemCreated)
        .with_options(PollOptions::with_limit(2));

    let records = poller.poll().await.unwrap();
    assert_eq!(ids(&records), vec!["4", "3"]);
    assert_eq!(source.last_request().per_page, 2);
}

#[tokio::test]
async fn test_armed_poll_with_nothing_new() {
    let source = FixedSource::records(vec![created(1, "2024-01-01T00:00:00+0000")]);
    let state = armed_state("itemCreated", "2024-01-01T00:00:00+0000").await;
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    assert_eq!(poller.poll_cycle().await, PollOutcome::NoNewRecords);
    assert_eq!(
        state.get_watermark("itemCreated").await.as_deref(),
        Some("2024-01-01T00:00:00+0000")
    );
}

#[tokio::test]
async fn test_failed_fetch_is_suppressed() {
    let source = FixedSource::failing(Error::api(57, "You are not authorized"));
    let state = armed_state("itemCreated", "2024-01-01T00:00:00+0000").await;
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    assert!(poller.poll().await.is_none());
    assert_eq!(
        state.get_watermark("itemCreated").await.as_deref(),
        Some("2024-01-01T00:00:00+0000")
    );
    assert_eq!(poller.stats().failures, 1);
    assert!(poller
        .stats()
        .last_error
        .as_deref()
        .unwrap()
        .contains("You are not authorized"));
}

#[tokio::test]
async fn test_empty_page_leaves_watermark() {
    let source = FixedSource::with(Ok(Page::default()));
    let state = armed_state("packageCreated", "2024-01-01T00:00:00+0000").await;
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::PackageCreated);

    assert_eq!(poller.poll_cycle().await, PollOutcome::Empty);
    assert_eq!(
        state.get_watermark("packageCreated").await.as_deref(),
        Some("2024-01-01T00:00:00+0000")
    );
}

#[tokio::test]
async fn test_empty_first_poll_stays_uninitialized() {
    let source = FixedSource::records(vec![]);
    let state = StateManager::in_memory();
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    assert_eq!(poller.poll_cycle().await, PollOutcome::Empty);
    assert!(state.get_watermark("itemCreated").await.is_none());
}

#[tokio::test]
async fn test_baseline_without_time_field() {
    let source = FixedSource::records(vec![json!({"item_id": "1"})]);
    let state = StateManager::in_memory();
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    assert_eq!(
        poller.poll_cycle().await,
        PollOutcome::Baseline { watermark: None }
    );
    assert!(state.get_watermark("itemCreated").await.is_none());
}

#[tokio::test]
async fn test_baseline_then_emit_sequence() {
    let source = FixedSource::records(vec![
        created(2, "2024-01-02T00:00:00+0000"),
        created(1, "2024-01-01T00:00:00+0000"),
    ]);
    let state = StateManager::in_memory();
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated)
        .with_trigger_id("workflow-7");

    assert!(poller.poll().await.is_none());
    assert_eq!(
        state.get_watermark("workflow-7").await.as_deref(),
        Some("2024-01-02T00:00:00+0000")
    );

    source.set_records(vec![
        created(3, "2024-01-03T00:00:00+0000"),
        created(2, "2024-01-02T00:00:00+0000"),
    ]);
    let records = poller.poll().await.unwrap();
    assert_eq!(ids(&records), vec!["3"]);

    assert!(poller.poll().await.is_none());

    let stats = poller.stats();
    assert_eq!(stats.cycles, 3);
    assert_eq!(stats.baselines, 1);
    assert_eq!(stats.records_emitted, 1);
    assert_eq!(stats.idle_cycles, 1);
    assert_eq!(stats.failures, 0);
    assert_eq!(source.calls(), 3);
}

#[tokio::test]
async fn test_update_event_compares_modified_time() {
    let source = FixedSource::records(vec![
        json!({"contact_id": "9", "created_time": "2023-01-01T00:00:00+0000", "last_modified_time": "2024-06-02T10:00:00+0000"}),
        json!({"contact_id": "8", "created_time": "2024-06-01T12:00:00+0000", "last_modified_time": "2024-06-01T12:00:00+0000"}),
    ]);
    let state = armed_state("contactUpdated", "2024-06-01T12:00:00+0000").await;
    let mut poller = Poller::new(&source, state, TriggerEvent::ContactUpdated);

    let records = poller.poll().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["contact_id"], "9");
}

#[tokio::test]
async fn test_watermark_persists_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let source = FixedSource::records(vec![created(1, "2024-02-02T02:02:02+0000")]);

    let mut poller = Poller::new(
        &source,
        StateManager::from_file(&path).unwrap(),
        TriggerEvent::ItemCreated,
    );
    poller.poll().await;

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.get_watermark("itemCreated").await.as_deref(),
        Some("2024-02-02T02:02:02+0000")
    );
}

#[tokio::test]
async fn test_unsaved_watermark_replays_records() {
    let dir = tempfile::tempdir().unwrap();
    let state_dir = dir.path().join("state");
    std::fs::create_dir(&state_dir).unwrap();
    let state = StateManager::from_file(state_dir.join("state.json")).unwrap();
    state
        .set_watermark("itemCreated", "2024-01-01T00:00:00+0000".to_string())
        .await
        .unwrap();

    let source = FixedSource::records(vec![
        created(3, "2024-01-03T00:00:00+0000"),
        created(2, "2024-01-02T00:00:00+0000"),
    ]);
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated);

    std::fs::remove_dir_all(&state_dir).unwrap();
    assert!(matches!(
        poller.poll_cycle().await,
        PollOutcome::Failed { .. }
    ));
    assert_eq!(
        state.get_watermark("itemCreated").await.as_deref(),
        Some("2024-01-01T00:00:00+0000")
    );

    std::fs::create_dir(&state_dir).unwrap();
    let records = poller.poll().await.unwrap();
    assert_eq!(ids(&records), vec!["3", "2"]);
    assert_eq!(
        state.get_watermark("itemCreated").await.as_deref(),
        Some("2024-01-03T00:00:00+0000")
    );
}

#[tokio::test]
async fn test_reset_forces_new_baseline() {
    let source = FixedSource::records(vec![created(2, "2024-01-02T00:00:00+0000")]);
    let state = armed_state("nightly", "2024-01-01T00:00:00+0000").await;
    let mut poller = Poller::new(&source, state.clone(), TriggerEvent::ItemCreated)
        .with_trigger_id("nightly");

    poller.reset().await.unwrap();
    assert!(state.get_watermark("nightly").await.is_none());

    assert_eq!(
        poller.poll_cycle().await,
        PollOutcome::Baseline {
            watermark: Some("2024-01-02T00:00:00+0000".to_string())
        }
    );
}
