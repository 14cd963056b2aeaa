//! Shared aliases and small value types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Any JSON value
pub type JsonValue = serde_json::Value;

/// A JSON object, as sent in request bodies and returned as records
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Query parameters, ordered so request URLs are deterministic
pub type QueryParams = BTreeMap<String, String>;

/// HTTP methods the Inventory API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Read
    #[default]
    GET,
    /// Create or act
    POST,
    /// Update
    PUT,
    /// Remove
    DELETE,
}

impl Method {
    /// Upper-case method name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
        }
    }

    /// Whether parameters travel in the query string rather than a body
    pub fn is_read(self) -> bool {
        self == Self::GET
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => Self::GET,
            Method::POST => Self::POST,
            Method::PUT => Self::PUT,
            Method::DELETE => Self::DELETE,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Growth of the delay between transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Same delay every time
    Constant,
    /// Delay grows by the initial delay each retry
    Linear,
    /// Delay doubles each retry
    #[default]
    Exponential,
}

/// Drop strings that are empty or only whitespace
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
