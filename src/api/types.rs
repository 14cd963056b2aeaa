//! Response envelope types

use crate::error::{describe_api_code, Error, Result};
use crate::pagination::{Page, PageContext};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Decoded response envelope
///
/// Every Inventory response is a JSON object with a numeric `code` (zero on
/// success), a `message`, and the payload under a resource-specific key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    body: JsonObject,
}

impl ApiResponse {
    /// Wrap a decoded body
    pub fn new(body: JsonObject) -> Self {
        Self { body }
    }

    /// Decode a raw response body
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice(bytes)? {
            JsonValue::Object(body) => Ok(Self::new(body)),
            other => Err(Error::decode(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Envelope code, `None` when the server omitted it
    pub fn code(&self) -> Option<i64> {
        self.body.get("code").and_then(JsonValue::as_i64)
    }

    /// Envelope message
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(JsonValue::as_str)
    }

    /// Turn a non-zero envelope code into an error
    pub fn error_for_code(self) -> Result<Self> {
        match self.provider_error() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Error described by a non-zero envelope code
    ///
    /// An absent message falls back to the documented meaning of the code.
    pub fn provider_error(&self) -> Option<Error> {
        let code = self.code().filter(|code| *code != 0)?;
        let message = self
            .message()
            .or_else(|| describe_api_code(code))
            .unwrap_or("Unknown Zoho API error");
        Some(Error::api(code, message))
    }

    /// Pagination metadata, if present
    pub fn page_context(&self) -> Option<PageContext> {
        self.body
            .get("page_context")
            .and_then(|ctx| serde_json::from_value(ctx.clone()).ok())
    }

    /// Borrow a top-level field
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.body.get(key)
    }

    /// The value under `key` when present and non-null, otherwise the whole body
    pub fn simplify(self, key: &str) -> JsonValue {
        let Self { mut body } = self;
        match body.remove(key) {
            Some(value) if !value.is_null() => value,
            Some(value) => {
                body.insert(key.to_string(), value);
                JsonValue::Object(body)
            }
            None => JsonValue::Object(body),
        }
    }

    /// Split the records under `records_field` out of the body
    pub fn into_page(self, records_field: &str) -> Page {
        Page::from_body(self.body, records_field)
    }

    /// The whole body as a JSON value
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.body)
    }
}

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the organization could be reached
    pub success: bool,
    /// Human-readable detail
    pub message: String,
}

impl ConnectionStatus {
    /// Successful check
    pub fn succeeded() -> Self {
        Self {
            success: true,
            message: "Connection successful".to_string(),
        }
    }

    /// Failed check
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
