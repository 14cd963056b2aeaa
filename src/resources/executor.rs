//! Operation planning and execution
//!
//! [`plan`] validates a request and turns it into the exact HTTP call (or
//! page walk) it needs without touching the network. [`execute`] runs the
//! plan against a [`ZohoClient`].

use super::shaping::{
    adjustment_line_items, email_fields, mapped_items, package_line_items, prepare_address,
    prepare_line_items, shape_addresses, split_ids, transfer_line_items,
};
use super::types::{Operation, OperationRequest, Resource};
use crate::api::{ApiResponse, ZohoClient};
use crate::error::{Error, Result};
use crate::pagination::{PageRequest, Paginator};
use crate::types::{JsonObject, JsonValue, Method, QueryParams};
use serde_json::json;
use tracing::{debug, info};

/// How the useful part of a response is picked out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// The value under a top-level key, or the whole body when it is missing
    Key(&'static str),
    /// `{"success": true}` regardless of the body
    Success,
    /// The whole body
    Whole,
    /// An array nested one level down, empty when missing
    Nested(&'static str, &'static str),
}

impl ResponseShape {
    /// Apply the shape to a decoded response
    pub fn extract(self, response: ApiResponse) -> JsonValue {
        match self {
            ResponseShape::Key(key) => response.simplify(key),
            ResponseShape::Success => json!({ "success": true }),
            ResponseShape::Whole => response.into_value(),
            ResponseShape::Nested(outer, inner) => response
                .get(outer)
                .and_then(|value| value.get(inner))
                .filter(|value| !value.is_null())
                .cloned()
                .unwrap_or_else(|| JsonValue::Array(Vec::new())),
        }
    }
}

/// A single API call
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    /// HTTP method
    pub method: Method,
    /// Endpoint relative to the API root
    pub endpoint: String,
    /// Payload; folded into the query for GET
    pub body: JsonObject,
    /// Extra query parameters
    pub query: QueryParams,
    /// What to return from the response
    pub response: ResponseShape,
}

impl Call {
    fn new(method: Method, endpoint: impl Into<String>, response: ResponseShape) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: JsonObject::new(),
            query: QueryParams::new(),
            response,
        }
    }

    fn get(endpoint: impl Into<String>, key: &'static str) -> Self {
        Self::new(Method::GET, endpoint, ResponseShape::Key(key))
    }

    fn post(endpoint: impl Into<String>, response: ResponseShape) -> Self {
        Self::new(Method::POST, endpoint, response)
    }

    fn with_body(mut self, body: JsonObject) -> Self {
        self.body = body;
        self
    }
}

/// What an operation does on the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Walk a list endpoint, optionally capped
    List {
        /// First page request with filters applied
        request: PageRequest,
        /// `None` walks every page
        limit: Option<usize>,
    },
    /// One request
    Call(Call),
}

/// Validate a request and work out the call it needs
pub fn plan(request: &OperationRequest) -> Result<Plan> {
    let resource = request.resource;
    let operation = request.operation;

    if !resource.supports(operation) {
        return Err(Error::unsupported(resource.as_str(), operation.as_str()));
    }

    let base = resource.endpoint();
    let fields = &request.fields;

    let call = match operation {
        Operation::GetAll => {
            let page = PageRequest::new(base, resource.list_key())
                .with_query(request.list.filters.to_query());
            let limit = (!request.list.return_all).then_some(request.list.limit);
            return Ok(Plan::List {
                request: page,
                limit,
            });
        }
        Operation::Get => Call::get(
            format!("{base}/{}", request.path_id()?),
            resource.singular_key(),
        ),
        Operation::Create => {
            request.require_fields(resource.create_requirements())?;
            Call::post(base, ResponseShape::Key(resource.singular_key()))
                .with_body(payload(resource, fields, true))
        }
        Operation::Update => Call::new(
            Method::PUT,
            format!("{base}/{}", request.path_id()?),
            ResponseShape::Key(resource.singular_key()),
        )
        .with_body(payload(resource, fields, false)),
        Operation::Delete => Call::new(
            Method::DELETE,
            format!("{base}/{}", request.path_id()?),
            ResponseShape::Success,
        ),

        Operation::MarkActive => status_call(request, "active")?,
        Operation::MarkInactive => status_call(request, "inactive")?,
        Operation::Confirm => status_call(request, "status/confirmed")?,
        Operation::Void | Operation::MarkAsVoid => status_call(request, "status/void")?,
        Operation::MarkAsOpen => status_call(request, "status/open")?,
        Operation::MarkAsBilled => status_call(request, "status/billed")?,
        Operation::Cancel => status_call(request, "status/cancelled")?,
        Operation::MarkAsSent => status_call(request, "status/sent")?,
        Operation::MarkAsDelivered => status_call(request, "status/delivered")?,
        Operation::MarkAsReceived => status_call(request, "receive")?,

        Operation::GetInventory => sub_get(request, "inventory", "inventory")?,
        Operation::GetComments => sub_get(request, "comments", "comments")?,
        Operation::GetPayments => sub_get(request, "payments", "payments")?,
        Operation::GetStatements => sub_get(request, "statements", "statements")?,
        Operation::GetAddresses => sub_get(request, "addresses", "addresses")?,
        Operation::GetShipments => sub_get(request, "shipments", "shipments")?,
        Operation::GetTracking => sub_get(request, "tracking", "tracking")?,
        Operation::GetStock => sub_get(request, "stock", "items")?,
        Operation::GetHistory => sub_get(request, "history", "history")?,

        Operation::UpdateInventory => {
            let id = request.path_id()?;
            request.require_fields(&["warehouse_id", "quantity_available"])?;
            let warehouse = json!({
                "warehouse_id": field(fields, "warehouse_id"),
                "quantity_available": field(fields, "quantity_available"),
            });
            Call::new(
                Method::PUT,
                format!("{base}/{id}/inventory"),
                ResponseShape::Key("item"),
            )
            .with_body(object([("warehouses", json!([warehouse]))]))
        }
        Operation::ConvertToInvoice => {
            let id = request.require_id()?;
            Call::post("/invoices/fromsalesorder", ResponseShape::Key("invoice"))
                .with_body(object([("salesorder_id", json!(id))]))
        }
        Operation::ConvertToBill => {
            let id = request.require_id()?;
            Call::post("/bills/frompurchaseorder", ResponseShape::Key("bill"))
                .with_body(object([("purchaseorder_id", json!(id))]))
        }
        Operation::AddComment => {
            let id = request.path_id()?;
            request.require_fields(&["description"])?;
            Call::post(format!("{base}/{id}/comments"), ResponseShape::Key("comment"))
                .with_body(object([("description", field(fields, "description"))]))
        }
        Operation::SendEmail => {
            let id = request.path_id()?;
            Call::post(format!("{base}/{id}/email"), ResponseShape::Success)
                .with_body(email_fields(fields))
        }
        Operation::SendStatement => {
            let id = request.path_id()?;
            Call::post(format!("{base}/{id}/statements/email"), ResponseShape::Success)
                .with_body(email_fields(fields))
        }
        Operation::RecordPayment => {
            let id = request.path_id()?;
            request.require_fields(&["amount", "date"])?;
            Call::post(format!("{base}/{id}/payments"), ResponseShape::Key("payment"))
                .with_body(fields.clone())
        }
        Operation::ApplyCredits => {
            let id = request.path_id()?;
            request.require_fields(&["amount"])?;
            Call::post(format!("{base}/{id}/credits"), ResponseShape::Whole)
                .with_body(object([("amount", field(fields, "amount"))]))
        }
        Operation::AddAddress => {
            let id = request.path_id()?;
            Call::post(format!("{base}/{id}/addresses"), ResponseShape::Key("address"))
                .with_body(prepare_address(fields))
        }
        Operation::GetComponents => Call::new(
            Method::GET,
            format!("{base}/{}", request.path_id()?),
            ResponseShape::Nested("composite_item", "mapped_items"),
        ),
        Operation::Bundle => assembly_call(request, "bundle", "quantity_to_bundle")?,
        Operation::Unbundle => assembly_call(request, "unbundle", "quantity_to_unbundle")?,

        Operation::GetOrganization => Call::get("/organizations", "organizations"),
        Operation::UpdateOrganization => {
            let mut body = fields.clone();
            shape_addresses(&mut body, &["address"]);
            Call::new(Method::PUT, "/organizations", ResponseShape::Key("organization"))
                .with_body(body)
        }
        Operation::GetCurrencies => Call::get("/settings/currencies", "currencies"),
        Operation::GetTaxes => Call::get("/settings/taxes", "taxes"),
        Operation::CreateTax => {
            request.require_fields(&["tax_name", "tax_percentage", "tax_type"])?;
            Call::post("/settings/taxes", ResponseShape::Key("tax")).with_body(fields.clone())
        }
        Operation::GetPaymentTerms => Call::get("/settings/paymentterms", "payment_terms"),
        Operation::GetCustomFields => {
            request.require_fields(&["entity"])?;
            let mut call = Call::get("/settings/customfields", "customfields");
            call.query
                .insert("entity".to_string(), scalar_string(&field(fields, "entity")));
            call
        }
        Operation::GetPreferences => Call::get("/settings/preferences", "preferences"),
    };

    Ok(Plan::Call(call))
}

/// Run an operation and return its simplified result
pub async fn execute(client: &ZohoClient, request: &OperationRequest) -> Result<JsonValue> {
    info!("Executing {}.{}", request.resource, request.operation);

    match plan(request)? {
        Plan::List { request, limit } => {
            let paginator = Paginator::new(client);
            let records = match limit {
                Some(limit) => paginator.fetch_all_with_limit(request, limit).await?,
                None => paginator.fetch_all(request).await?,
            };
            debug!("Listed {} records", records.len());
            Ok(JsonValue::Array(records))
        }
        Plan::Call(call) => {
            let response = client
                .request(call.method, &call.endpoint, &call.body, &call.query)
                .await?;
            Ok(call.response.extract(response))
        }
    }
}

/// POST with no body to `/{id}/<suffix>`
fn status_call(request: &OperationRequest, suffix: &str) -> Result<Call> {
    let id = request.path_id()?;
    Ok(Call::post(
        format!("{}/{id}/{suffix}", request.resource.endpoint()),
        ResponseShape::Success,
    ))
}

/// GET `/{id}/<suffix>` returning the value under `key`
fn sub_get(request: &OperationRequest, suffix: &str, key: &'static str) -> Result<Call> {
    let id = request.path_id()?;
    Ok(Call::get(
        format!("{}/{id}/{suffix}", request.resource.endpoint()),
        key,
    ))
}

fn assembly_call(request: &OperationRequest, action: &str, quantity: &str) -> Result<Call> {
    let id = request.path_id()?;
    request.require_fields(&[quantity, "warehouse_id"])?;
    Ok(Call::post(
        format!("{}/{id}/{action}", request.resource.endpoint()),
        ResponseShape::Key("composite_item"),
    )
    .with_body(request.fields.clone()))
}

/// Create/update payload with line items and addresses reshaped
///
/// On create the line item array is always sent, empty when none were given.
fn payload(resource: Resource, fields: &JsonObject, create: bool) -> JsonObject {
    let mut body = fields.clone();

    if let Some(key) = items_key(resource) {
        let shaped = match body.get(key) {
            Some(JsonValue::Array(items)) => Some(shape_items(resource, items)),
            _ if create => Some(Vec::new()),
            _ => None,
        };
        if let Some(shaped) = shaped {
            body.insert(key.to_string(), JsonValue::Array(shaped));
        }
    }

    shape_addresses(&mut body, address_keys(resource));

    if resource == Resource::Shipment {
        if let Some(JsonValue::String(ids)) = body.get("package_ids") {
            let ids = split_ids(ids);
            body.insert("package_ids".to_string(), json!(ids));
        }
    }

    body
}

fn items_key(resource: Resource) -> Option<&'static str> {
    match resource {
        Resource::SalesOrder
        | Resource::PurchaseOrder
        | Resource::Invoice
        | Resource::Package
        | Resource::TransferOrder
        | Resource::StockAdjustment => Some("line_items"),
        Resource::CompositeItem => Some("mapped_items"),
        _ => None,
    }
}

fn shape_items(resource: Resource, items: &[JsonValue]) -> Vec<JsonValue> {
    match resource {
        Resource::Package => package_line_items(items),
        Resource::TransferOrder => transfer_line_items(items),
        Resource::StockAdjustment => adjustment_line_items(items),
        Resource::CompositeItem => mapped_items(items),
        _ => prepare_line_items(items),
    }
}

fn address_keys(resource: Resource) -> &'static [&'static str] {
    match resource {
        Resource::Contact => &["billing_address", "shipping_address"],
        Resource::SalesOrder => &["shipping_address"],
        Resource::PurchaseOrder => &["delivery_address"],
        Resource::Organization => &["address"],
        _ => &[],
    }
}

fn object<const N: usize>(entries: [(&str, JsonValue); N]) -> JsonObject {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn field(fields: &JsonObject, key: &str) -> JsonValue {
    fields.get(key).cloned().unwrap_or(JsonValue::Null)
}

fn scalar_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
