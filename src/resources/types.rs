//! Resource catalogue and operation requests

use super::shaping::ListFilters;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

/// Records returned by `getAll` when neither a limit nor `return_all` is given
pub const DEFAULT_LIST_LIMIT: usize = 50;

// ============================================================================
// Resources
// ============================================================================

/// Inventory entities exposed by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    /// Catalogue items
    Item,
    /// Sales orders
    SalesOrder,
    /// Purchase orders
    PurchaseOrder,
    /// Invoices
    Invoice,
    /// Customers and vendors
    Contact,
    /// Packages packed against sales orders
    Package,
    /// Shipment orders
    Shipment,
    /// Warehouses
    Warehouse,
    /// Transfers between warehouses
    TransferOrder,
    /// Inventory adjustments
    StockAdjustment,
    /// Assemblies of other items
    CompositeItem,
    /// Organization settings
    Organization,
}

impl Resource {
    /// Every resource, in display order
    pub const ALL: [Resource; 12] = [
        Resource::Item,
        Resource::SalesOrder,
        Resource::PurchaseOrder,
        Resource::Invoice,
        Resource::Contact,
        Resource::Package,
        Resource::Shipment,
        Resource::Warehouse,
        Resource::TransferOrder,
        Resource::StockAdjustment,
        Resource::CompositeItem,
        Resource::Organization,
    ];

    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Item => "item",
            Resource::SalesOrder => "salesOrder",
            Resource::PurchaseOrder => "purchaseOrder",
            Resource::Invoice => "invoice",
            Resource::Contact => "contact",
            Resource::Package => "package",
            Resource::Shipment => "shipment",
            Resource::Warehouse => "warehouse",
            Resource::TransferOrder => "transferOrder",
            Resource::StockAdjustment => "stockAdjustment",
            Resource::CompositeItem => "compositeItem",
            Resource::Organization => "organization",
        }
    }

    /// Collection endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Resource::Item => "/items",
            Resource::SalesOrder => "/salesorders",
            Resource::PurchaseOrder => "/purchaseorders",
            Resource::Invoice => "/invoices",
            Resource::Contact => "/contacts",
            Resource::Package => "/packages",
            Resource::Shipment => "/shipmentorders",
            Resource::Warehouse => "/settings/warehouses",
            Resource::TransferOrder => "/transferorders",
            Resource::StockAdjustment => "/inventoryadjustments",
            Resource::CompositeItem => "/compositeitems",
            Resource::Organization => "/organizations",
        }
    }

    /// Response key for a single record
    pub fn singular_key(self) -> &'static str {
        match self {
            Resource::Item => "item",
            Resource::SalesOrder => "salesorder",
            Resource::PurchaseOrder => "purchaseorder",
            Resource::Invoice => "invoice",
            Resource::Contact => "contact",
            Resource::Package => "package",
            Resource::Shipment => "shipmentorder",
            Resource::Warehouse => "warehouse",
            Resource::TransferOrder => "transfer_order",
            Resource::StockAdjustment => "inventory_adjustment",
            Resource::CompositeItem => "composite_item",
            Resource::Organization => "organization",
        }
    }

    /// Response key for a list of records
    pub fn list_key(self) -> &'static str {
        match self {
            Resource::Item => "items",
            Resource::SalesOrder => "salesorders",
            Resource::PurchaseOrder => "purchaseorders",
            Resource::Invoice => "invoices",
            Resource::Contact => "contacts",
            Resource::Package => "packages",
            Resource::Shipment => "shipmentorders",
            Resource::Warehouse => "warehouses",
            Resource::TransferOrder => "transfer_orders",
            Resource::StockAdjustment => "inventory_adjustments",
            Resource::CompositeItem => "composite_items",
            Resource::Organization => "organizations",
        }
    }

    /// Operations the resource supports
    pub fn operations(self) -> &'static [Operation] {
        use Operation::*;
        match self {
            Resource::Item => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkActive,
                MarkInactive,
                GetInventory,
                UpdateInventory,
            ],
            Resource::SalesOrder => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                Confirm,
                Void,
                ConvertToInvoice,
                AddComment,
                GetComments,
            ],
            Resource::PurchaseOrder => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkAsOpen,
                MarkAsBilled,
                Cancel,
                AddComment,
                GetComments,
                ConvertToBill,
            ],
            Resource::Invoice => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkAsSent,
                MarkAsVoid,
                SendEmail,
                RecordPayment,
                GetPayments,
                ApplyCredits,
            ],
            Resource::Contact => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkActive,
                MarkInactive,
                GetStatements,
                SendStatement,
                GetAddresses,
                AddAddress,
            ],
            Resource::Package => &[Get, GetAll, Create, Update, Delete, GetShipments],
            Resource::Shipment => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkAsDelivered,
                GetTracking,
            ],
            Resource::Warehouse => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkActive,
                MarkInactive,
                GetStock,
            ],
            Resource::TransferOrder => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                MarkAsReceived,
                GetHistory,
            ],
            Resource::StockAdjustment => &[Get, GetAll, Create, Delete],
            Resource::CompositeItem => &[
                Get,
                GetAll,
                Create,
                Update,
                Delete,
                GetComponents,
                Bundle,
                Unbundle,
            ],
            Resource::Organization => &[
                GetOrganization,
                UpdateOrganization,
                GetCurrencies,
                GetTaxes,
                CreateTax,
                GetPaymentTerms,
                GetCustomFields,
                GetPreferences,
            ],
        }
    }

    /// Whether `operation` is available on this resource
    pub fn supports(self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// Fields that must be set for `create`
    pub fn create_requirements(self) -> &'static [&'static str] {
        match self {
            Resource::Item | Resource::CompositeItem => &["name"],
            Resource::SalesOrder | Resource::Invoice => &["customer_id"],
            Resource::PurchaseOrder => &["vendor_id"],
            Resource::Contact => &["contact_name", "contact_type"],
            Resource::Package => &["salesorder_id"],
            Resource::Shipment => &["salesorder_id", "package_ids"],
            Resource::Warehouse => &["warehouse_name"],
            Resource::TransferOrder => &["from_warehouse_id", "to_warehouse_id"],
            Resource::StockAdjustment => &["adjustment_type", "date", "reason"],
            Resource::Organization => &[],
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_param("resource", format!("unknown resource '{s}'")))
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Every operation name across the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum Operation {
    Get,
    GetAll,
    Create,
    Update,
    Delete,
    #[serde(alias = "markAsActive")]
    MarkActive,
    #[serde(alias = "markAsInactive")]
    MarkInactive,
    GetInventory,
    UpdateInventory,
    Confirm,
    Void,
    ConvertToInvoice,
    AddComment,
    GetComments,
    MarkAsOpen,
    MarkAsBilled,
    Cancel,
    ConvertToBill,
    MarkAsSent,
    MarkAsVoid,
    SendEmail,
    RecordPayment,
    GetPayments,
    ApplyCredits,
    GetStatements,
    SendStatement,
    GetAddresses,
    AddAddress,
    GetShipments,
    MarkAsDelivered,
    GetTracking,
    GetStock,
    MarkAsReceived,
    GetHistory,
    GetComponents,
    Bundle,
    Unbundle,
    GetOrganization,
    UpdateOrganization,
    GetCurrencies,
    GetTaxes,
    CreateTax,
    GetPaymentTerms,
    GetCustomFields,
    GetPreferences,
}

impl Operation {
    /// Wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::GetAll => "getAll",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::MarkActive => "markActive",
            Operation::MarkInactive => "markInactive",
            Operation::GetInventory => "getInventory",
            Operation::UpdateInventory => "updateInventory",
            Operation::Confirm => "confirm",
            Operation::Void => "void",
            Operation::ConvertToInvoice => "convertToInvoice",
            Operation::AddComment => "addComment",
            Operation::GetComments => "getComments",
            Operation::MarkAsOpen => "markAsOpen",
            Operation::MarkAsBilled => "markAsBilled",
            Operation::Cancel => "cancel",
            Operation::ConvertToBill => "convertToBill",
            Operation::MarkAsSent => "markAsSent",
            Operation::MarkAsVoid => "markAsVoid",
            Operation::SendEmail => "sendEmail",
            Operation::RecordPayment => "recordPayment",
            Operation::GetPayments => "getPayments",
            Operation::ApplyCredits => "applyCredits",
            Operation::GetStatements => "getStatements",
            Operation::SendStatement => "sendStatement",
            Operation::GetAddresses => "getAddresses",
            Operation::AddAddress => "addAddress",
            Operation::GetShipments => "getShipments",
            Operation::MarkAsDelivered => "markAsDelivered",
            Operation::GetTracking => "getTracking",
            Operation::GetStock => "getStock",
            Operation::MarkAsReceived => "markAsReceived",
            Operation::GetHistory => "getHistory",
            Operation::GetComponents => "getComponents",
            Operation::Bundle => "bundle",
            Operation::Unbundle => "unbundle",
            Operation::GetOrganization => "getOrganization",
            Operation::UpdateOrganization => "updateOrganization",
            Operation::GetCurrencies => "getCurrencies",
            Operation::GetTaxes => "getTaxes",
            Operation::CreateTax => "createTax",
            Operation::GetPaymentTerms => "getPaymentTerms",
            Operation::GetCustomFields => "getCustomFields",
            Operation::GetPreferences => "getPreferences",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_value(JsonValue::String(s.to_string()))
            .map_err(|_| Error::invalid_param("operation", format!("unknown operation '{s}'")))
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Paging options for `getAll`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Walk every page
    pub return_all: bool,
    /// Cap when `return_all` is false
    pub limit: usize,
    /// Filter, search and sort options
    pub filters: ListFilters,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            return_all: false,
            limit: DEFAULT_LIST_LIMIT,
            filters: ListFilters::default(),
        }
    }
}

/// A fully bound operation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRequest {
    /// Target resource
    pub resource: Resource,
    /// Operation to perform
    pub operation: Operation,
    /// Record ID for per-record operations
    #[serde(default)]
    pub id: Option<String>,
    /// Payload fields, required parameters included
    #[serde(default)]
    pub fields: JsonObject,
    /// Options for `getAll`
    #[serde(default)]
    pub list: ListOptions,
}

impl OperationRequest {
    /// Create a request with no ID or fields
    pub fn new(resource: Resource, operation: Operation) -> Self {
        Self {
            resource,
            operation,
            id: None,
            fields: JsonObject::new(),
            list: ListOptions::default(),
        }
    }

    /// Set the record ID
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Replace the payload fields
    #[must_use]
    pub fn with_fields(mut self, fields: JsonObject) -> Self {
        self.fields = fields;
        self
    }

    /// Set one payload field
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Replace the list options
    #[must_use]
    pub fn with_list(mut self, list: ListOptions) -> Self {
        self.list = list;
        self
    }

    /// Record ID, or a missing-parameter error
    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::missing_param("id"))
    }

    /// Record ID escaped for use as one path segment
    pub fn path_id(&self) -> Result<String> {
        let id = self.require_id()?;
        // form encoding writes spaces as '+' and escapes a literal '+'
        let encoded: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
        Ok(encoded.replace('+', "%20"))
    }

    /// Fail when any of `names` is absent, null or an empty string
    pub fn require_fields(&self, names: &[&str]) -> Result<()> {
        for name in names {
            let present = match self.fields.get(*name) {
                None | Some(JsonValue::Null) => false,
                Some(JsonValue::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(Error::missing_param(*name));
            }
        }
        Ok(())
    }
}
