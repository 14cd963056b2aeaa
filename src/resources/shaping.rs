//! Request payload shaping
//!
//! Zoho rejects unknown keys inside line items and addresses, so payloads
//! are rebuilt from an allow-list before they are sent.

use crate::types::{JsonObject, JsonValue, QueryParams};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Address keys Zoho accepts
pub const ADDRESS_FIELDS: [&str; 9] = [
    "address",
    "street2",
    "city",
    "state",
    "zip",
    "country",
    "phone",
    "fax",
    "attention",
];

/// Keys accepted by the statement and invoice email endpoints
pub const EMAIL_FIELDS: [&str; 4] = ["to_mail_ids", "cc_mail_ids", "subject", "body"];

/// Whether a value counts as set: not null, false, zero or an empty string
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Coerce a value to a JSON number
///
/// Numeric strings are parsed, booleans become 0/1 and null or blank becomes
/// 0. Anything else is not a number and maps to null.
pub fn to_number(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Number(_) => value.clone(),
        JsonValue::Null => JsonValue::from(0),
        JsonValue::Bool(b) => JsonValue::from(u8::from(*b)),
        JsonValue::String(s) => parse_number(s.trim()),
        JsonValue::Array(_) | JsonValue::Object(_) => JsonValue::Null,
    }
}

fn parse_number(s: &str) -> JsonValue {
    if s.is_empty() {
        return JsonValue::from(0);
    }
    if let Ok(i) = s.parse::<i64>() {
        return JsonValue::from(i);
    }
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(JsonValue::Null, JsonValue::Number)
}

fn copy_truthy(source: &JsonObject, target: &mut JsonObject, key: &str) {
    if let Some(value) = source.get(key).filter(|v| is_truthy(v)) {
        target.insert(key.to_string(), value.clone());
    }
}

fn copy_number(source: &JsonObject, target: &mut JsonObject, key: &str) {
    if let Some(value) = source.get(key) {
        target.insert(key.to_string(), to_number(value));
    }
}

fn copy_raw(source: &JsonObject, target: &mut JsonObject, key: &str) {
    target.insert(
        key.to_string(),
        source.get(key).cloned().unwrap_or(JsonValue::Null),
    );
}

fn map_objects(items: &[JsonValue], f: impl Fn(&JsonObject) -> JsonObject) -> Vec<JsonValue> {
    let empty = JsonObject::new();
    items
        .iter()
        .map(|item| JsonValue::Object(f(item.as_object().unwrap_or(&empty))))
        .collect()
}

/// Line items for sales orders, purchase orders and invoices
pub fn prepare_line_items(items: &[JsonValue]) -> Vec<JsonValue> {
    map_objects(items, |item| {
        let mut line = JsonObject::new();
        copy_truthy(item, &mut line, "item_id");
        copy_truthy(item, &mut line, "name");
        copy_truthy(item, &mut line, "description");
        copy_number(item, &mut line, "quantity");
        copy_number(item, &mut line, "rate");
        copy_truthy(item, &mut line, "unit");
        copy_truthy(item, &mut line, "tax_id");
        copy_number(item, &mut line, "discount");
        line
    })
}

/// Line items for packages
pub fn package_line_items(items: &[JsonValue]) -> Vec<JsonValue> {
    map_objects(items, |item| {
        let mut line = JsonObject::new();
        copy_raw(item, &mut line, "so_line_item_id");
        line.insert(
            "quantity".to_string(),
            to_number(item.get("quantity").unwrap_or(&JsonValue::Null)),
        );
        line
    })
}

/// Line items for transfer orders
pub fn transfer_line_items(items: &[JsonValue]) -> Vec<JsonValue> {
    map_objects(items, |item| {
        let mut line = JsonObject::new();
        copy_raw(item, &mut line, "item_id");
        line.insert(
            "quantity_transfer".to_string(),
            to_number(item.get("quantity_transfer").unwrap_or(&JsonValue::Null)),
        );
        line
    })
}

/// Line items for inventory adjustments
pub fn adjustment_line_items(items: &[JsonValue]) -> Vec<JsonValue> {
    map_objects(items, |item| {
        let mut line = JsonObject::new();
        copy_raw(item, &mut line, "item_id");
        line.insert(
            "quantity_adjusted".to_string(),
            to_number(item.get("quantity_adjusted").unwrap_or(&JsonValue::Null)),
        );
        copy_truthy(item, &mut line, "warehouse_id");
        if let Some(value) = item.get("adjusted_value").filter(|v| is_truthy(v)) {
            line.insert("adjusted_value".to_string(), to_number(value));
        }
        line
    })
}

/// Component rows for composite items
pub fn mapped_items(items: &[JsonValue]) -> Vec<JsonValue> {
    map_objects(items, |item| {
        let mut line = JsonObject::new();
        copy_raw(item, &mut line, "item_id");
        line.insert(
            "quantity".to_string(),
            to_number(item.get("quantity").unwrap_or(&JsonValue::Null)),
        );
        copy_truthy(item, &mut line, "warehouse_id");
        line
    })
}

/// Keep only the set address keys
pub fn prepare_address(address: &JsonObject) -> JsonObject {
    let mut prepared = JsonObject::new();
    for field in ADDRESS_FIELDS {
        copy_truthy(address, &mut prepared, field);
    }
    prepared
}

/// Reshape the nested address objects found in `fields`
pub fn shape_addresses(fields: &mut JsonObject, keys: &[&str]) {
    for key in keys {
        if let Some(JsonValue::Object(address)) = fields.get(*key) {
            let prepared = prepare_address(address);
            fields.insert((*key).to_string(), JsonValue::Object(prepared));
        }
    }
}

/// Keep only the set email keys
pub fn email_fields(fields: &JsonObject) -> JsonObject {
    let mut body = JsonObject::new();
    for field in EMAIL_FIELDS {
        copy_truthy(fields, &mut body, field);
    }
    body
}

/// Split a comma separated ID list
pub fn split_ids(ids: &str) -> Vec<String> {
    ids.split(',').map(|id| id.trim().to_string()).collect()
}

/// Filter, search and sort options for list operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFilters {
    /// Predefined filter, e.g. `Status.Active`
    pub filter_by: Option<String>,
    /// Free text search
    pub search_text: Option<String>,
    /// Column to sort by
    pub sort_column: Option<String>,
    /// `A` or `D`
    pub sort_order: Option<String>,
    /// Only records modified after this time
    pub last_modified_time: Option<String>,
}

impl ListFilters {
    /// Query parameters for the filters that are set
    pub fn to_query(&self) -> QueryParams {
        [
            ("filter_by", &self.filter_by),
            ("search_text", &self.search_text),
            ("sort_column", &self.sort_column),
            ("sort_order", &self.sort_order),
            ("last_modified_time", &self.last_modified_time),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.to_string()))
        })
        .collect()
    }
}
