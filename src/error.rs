//! Crate error type
//!
//! Failures fall into three groups: the caller's input (config, parameters,
//! operation names), the road to Zoho (transport, auth, status codes) and
//! Zoho itself rejecting a call through its `{code, message}` envelope.
//! [`Error::is_provider_error`] tells the last two apart from the first.

use thiserror::Error;

/// Errors returned by every fallible API in the crate
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    // Input
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Operation '{operation}' is not supported for resource '{resource}'")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Unknown trigger event: {event}")]
    UnknownEvent { event: String },

    // Transport and auth
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    #[error("Token refresh failed: {message}")]
    TokenRefresh { message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // Zoho
    #[error("Zoho Inventory API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // Local
    #[error("State error: {message}")]
    State { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Free-form configuration problem
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Required config field absent or blank
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Config field present but unusable
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Authorization could not be attached
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Error status with the response body
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Non-zero envelope `code` with its `message`
    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Response body was not the expected JSON
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Resource does not offer the operation
    pub fn unsupported(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Operation parameter absent or blank
    pub fn missing_param(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Operation parameter present but malformed
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Watermark store failure
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Whether the transport may send the same request again
    ///
    /// Envelope errors are never retried, whatever their code.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            Self::RateLimited { .. } | Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Whether the failure happened on the way to or inside Zoho
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Api { .. }
                | Self::Decode { .. }
                | Self::Http(_)
                | Self::HttpStatus { .. }
                | Self::RateLimited { .. }
                | Self::Timeout { .. }
                | Self::Auth { .. }
                | Self::TokenRefresh { .. }
        )
    }
}

/// Meaning of the envelope codes Zoho documents
pub fn describe_api_code(code: i64) -> Option<&'static str> {
    let meaning = match code {
        0 => "Success",
        1 => "Internal error",
        2 => "Bad request",
        14 => "Invalid value",
        36 => "Resource not found",
        44 => "Rate limit exceeded",
        57 => "Authentication failed",
        _ => return None,
    };
    Some(meaning)
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Error::config("bad region") => "Configuration error: bad region"; "config")]
    #[test_case(Error::missing_field("organization_id") => "Missing required config field: organization_id"; "missing field")]
    #[test_case(Error::api(36, "Item does not exist") => "Zoho Inventory API error 36: Item does not exist"; "api")]
    #[test_case(Error::unsupported("warehouse", "confirm") => "Operation 'confirm' is not supported for resource 'warehouse'"; "unsupported")]
    #[test_case(Error::missing_param("id") => "Missing required parameter: id"; "missing param")]
    fn display(err: Error) -> String {
        err.to_string()
    }

    #[test]
    fn retryable_errors() {
        assert!(Error::RateLimited {
            retry_after_seconds: 60
        }
        .is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());
        assert!(Error::http_status(501, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::api(36, "missing").is_retryable());
        assert!(!Error::api(44, "slow down").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn provider_errors_exclude_caller_mistakes() {
        assert!(Error::api(2, "bad").is_provider_error());
        assert!(Error::http_status(500, "").is_provider_error());
        assert!(!Error::missing_param("item_id").is_provider_error());
        assert!(!Error::state("broken").is_provider_error());
    }

    #[test]
    fn documented_codes_are_described() {
        assert_eq!(describe_api_code(0), Some("Success"));
        assert_eq!(describe_api_code(57), Some("Authentication failed"));
        assert_eq!(describe_api_code(9999), None);
    }
}
