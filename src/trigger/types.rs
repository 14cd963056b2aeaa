//! Trigger events and poll bookkeeping

use crate::error::Error;
use crate::types::JsonValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Records fetched per poll when no limit is configured
pub const DEFAULT_POLL_LIMIT: usize = 50;

/// Record changes a trigger can watch for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerEvent {
    /// New item
    ItemCreated,
    /// Modified item
    ItemUpdated,
    /// New sales order
    SalesOrderCreated,
    /// Modified sales order
    SalesOrderUpdated,
    /// New purchase order
    PurchaseOrderCreated,
    /// Modified purchase order
    PurchaseOrderUpdated,
    /// New invoice
    InvoiceCreated,
    /// Modified invoice
    InvoiceUpdated,
    /// New contact
    ContactCreated,
    /// Modified contact
    ContactUpdated,
    /// New package
    PackageCreated,
    /// New shipment
    ShipmentCreated,
    /// New inventory adjustment
    StockAdjustmentCreated,
    /// New transfer order
    TransferOrderCreated,
}

impl TriggerEvent {
    /// Every event, in display order
    pub const ALL: [TriggerEvent; 14] = [
        TriggerEvent::ItemCreated,
        TriggerEvent::ItemUpdated,
        TriggerEvent::SalesOrderCreated,
        TriggerEvent::SalesOrderUpdated,
        TriggerEvent::PurchaseOrderCreated,
        TriggerEvent::PurchaseOrderUpdated,
        TriggerEvent::InvoiceCreated,
        TriggerEvent::InvoiceUpdated,
        TriggerEvent::ContactCreated,
        TriggerEvent::ContactUpdated,
        TriggerEvent::PackageCreated,
        TriggerEvent::ShipmentCreated,
        TriggerEvent::StockAdjustmentCreated,
        TriggerEvent::TransferOrderCreated,
    ];

    /// Wire name, also the default trigger ID
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerEvent::ItemCreated => "itemCreated",
            TriggerEvent::ItemUpdated => "itemUpdated",
            TriggerEvent::SalesOrderCreated => "salesOrderCreated",
            TriggerEvent::SalesOrderUpdated => "salesOrderUpdated",
            TriggerEvent::PurchaseOrderCreated => "purchaseOrderCreated",
            TriggerEvent::PurchaseOrderUpdated => "purchaseOrderUpdated",
            TriggerEvent::InvoiceCreated => "invoiceCreated",
            TriggerEvent::InvoiceUpdated => "invoiceUpdated",
            TriggerEvent::ContactCreated => "contactCreated",
            TriggerEvent::ContactUpdated => "contactUpdated",
            TriggerEvent::PackageCreated => "packageCreated",
            TriggerEvent::ShipmentCreated => "shipmentCreated",
            TriggerEvent::StockAdjustmentCreated => "stockAdjustmentCreated",
            TriggerEvent::TransferOrderCreated => "transferOrderCreated",
        }
    }

    /// List endpoint polled for this event
    pub fn endpoint(self) -> &'static str {
        match self {
            TriggerEvent::ItemCreated | TriggerEvent::ItemUpdated => "/items",
            TriggerEvent::SalesOrderCreated | TriggerEvent::SalesOrderUpdated => "/salesorders",
            TriggerEvent::PurchaseOrderCreated | TriggerEvent::PurchaseOrderUpdated => {
                "/purchaseorders"
            }
            TriggerEvent::InvoiceCreated | TriggerEvent::InvoiceUpdated => "/invoices",
            TriggerEvent::ContactCreated | TriggerEvent::ContactUpdated => "/contacts",
            TriggerEvent::PackageCreated => "/packages",
            TriggerEvent::ShipmentCreated => "/shipmentorders",
            TriggerEvent::StockAdjustmentCreated => "/inventoryadjustments",
            TriggerEvent::TransferOrderCreated => "/transferorders",
        }
    }

    /// Response field holding the records
    pub fn records_field(self) -> &'static str {
        match self {
            TriggerEvent::ItemCreated | TriggerEvent::ItemUpdated => "items",
            TriggerEvent::SalesOrderCreated | TriggerEvent::SalesOrderUpdated => "salesorders",
            TriggerEvent::PurchaseOrderCreated | TriggerEvent::PurchaseOrderUpdated => {
                "purchaseorders"
            }
            TriggerEvent::InvoiceCreated | TriggerEvent::InvoiceUpdated => "invoices",
            TriggerEvent::ContactCreated | TriggerEvent::ContactUpdated => "contacts",
            TriggerEvent::PackageCreated => "packages",
            TriggerEvent::ShipmentCreated => "shipmentorders",
            TriggerEvent::StockAdjustmentCreated => "inventory_adjustments",
            TriggerEvent::TransferOrderCreated => "transfer_orders",
        }
    }

    /// Whether this event watches modifications rather than creations
    pub fn is_update(self) -> bool {
        matches!(
            self,
            TriggerEvent::ItemUpdated
                | TriggerEvent::SalesOrderUpdated
                | TriggerEvent::PurchaseOrderUpdated
                | TriggerEvent::InvoiceUpdated
                | TriggerEvent::ContactUpdated
        )
    }

    /// Record field compared against the watermark
    pub fn time_field(self) -> &'static str {
        if self.is_update() {
            "last_modified_time"
        } else {
            "created_time"
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriggerEvent::ALL
            .into_iter()
            .find(|event| event.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownEvent {
                event: s.to_string(),
            })
    }
}

/// Options for one trigger instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollOptions {
    /// Maximum records emitted per poll; 0 selects the default
    pub limit: usize,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_POLL_LIMIT,
        }
    }
}

impl PollOptions {
    /// Options with the given limit
    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    /// Limit actually applied
    pub fn effective_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_POLL_LIMIT
        } else {
            self.limit
        }
    }
}

/// What a single poll cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// First successful poll; the watermark was recorded and nothing emitted
    Baseline {
        /// Watermark recorded, `None` when the newest record had no time field
        watermark: Option<String>,
    },
    /// Records newer than the previous watermark
    Emitted(Vec<JsonValue>),
    /// Records came back but none were newer than the watermark
    NoNewRecords,
    /// The server returned no records
    Empty,
    /// The fetch or the watermark write failed
    Failed {
        /// Error description
        message: String,
    },
}

impl PollOutcome {
    /// Records to hand downstream, `None` when the cycle produced nothing
    pub fn into_records(self) -> Option<Vec<JsonValue>> {
        match self {
            PollOutcome::Emitted(records) => Some(records),
            _ => None,
        }
    }

    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            PollOutcome::Baseline { .. } => "baseline",
            PollOutcome::Emitted(_) => "emitted",
            PollOutcome::NoNewRecords => "no_new_records",
            PollOutcome::Empty => "empty",
            PollOutcome::Failed { .. } => "failed",
        }
    }
}

/// Counters across the cycles of one poller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    /// Cycles run
    pub cycles: usize,
    /// Cycles that recorded a baseline
    pub baselines: usize,
    /// Records emitted in total
    pub records_emitted: usize,
    /// Cycles that emitted nothing (empty page or nothing new)
    pub idle_cycles: usize,
    /// Cycles that failed
    pub failures: usize,
    /// Most recent failure message
    pub last_error: Option<String>,
}

impl PollStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one cycle
    pub fn record(&mut self, outcome: &PollOutcome) {
        self.cycles += 1;
        match outcome {
            PollOutcome::Baseline { .. } => self.baselines += 1,
            PollOutcome::Emitted(records) => self.records_emitted += records.len(),
            PollOutcome::NoNewRecords | PollOutcome::Empty => self.idle_cycles += 1,
            PollOutcome::Failed { message } => {
                self.failures += 1;
                self.last_error = Some(message.clone());
            }
        }
    }
}
