//! Connector configuration
//!
//! This module contains the configuration structures used to point the
//! connector at a Zoho organization: data-center region, credentials and
//! HTTP transport settings. Configuration is loaded from YAML or JSON.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Zoho Inventory API version segment
pub const API_VERSION: &str = "v1";

// ============================================================================
// Region
// ============================================================================

/// Zoho data center hosting the organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// United States (zoho.com)
    #[default]
    US,
    /// Europe (zoho.eu)
    EU,
    /// India (zoho.in)
    IN,
    /// Australia (zoho.com.au)
    AU,
    /// Canada (zohocloud.ca)
    CA,
}

impl Region {
    /// All supported regions
    pub const ALL: [Region; 5] = [Region::US, Region::EU, Region::IN, Region::AU, Region::CA];

    /// Base URL of the REST API for this region
    pub fn api_url(self) -> &'static str {
        match self {
            Region::US => "https://www.zohoapis.com",
            Region::EU => "https://www.zohoapis.eu",
            Region::IN => "https://www.zohoapis.in",
            Region::AU => "https://www.zohoapis.com.au",
            Region::CA => "https://www.zohoapis.ca",
        }
    }

    /// Base URL of the accounts (OAuth2) server for this region
    pub fn accounts_url(self) -> &'static str {
        match self {
            Region::US => "https://accounts.zoho.com",
            Region::EU => "https://accounts.zoho.eu",
            Region::IN => "https://accounts.zoho.in",
            Region::AU => "https://accounts.zoho.com.au",
            Region::CA => "https://accounts.zohocloud.ca",
        }
    }

    /// OAuth2 token endpoint for this region
    pub fn token_url(self) -> String {
        format!("{}/oauth/v2/token", self.accounts_url())
    }
}

impl std::str::FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "US" => Ok(Region::US),
            "EU" => Ok(Region::EU),
            "IN" => Ok(Region::IN),
            "AU" => Ok(Region::AU),
            "CA" => Ok(Region::CA),
            other => Err(Error::invalid_config(
                "region",
                format!("unknown region '{other}' (expected US, EU, IN, AU or CA)"),
            )),
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Credentials as written in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsConfig {
    /// A pre-issued access token
    AccessToken {
        /// The OAuth2 access token
        token: String,
    },
    /// Refresh-token grant against the regional accounts server
    Oauth2Refresh {
        /// OAuth2 client ID
        client_id: String,
        /// OAuth2 client secret
        client_secret: String,
        /// Long-lived refresh token
        refresh_token: String,
        /// Override for the token endpoint
        #[serde(default)]
        token_url: Option<String>,
    },
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Transport-level retries for 429/5xx/timeouts (0 = fail fast)
    pub max_retries: u32,
    /// Backoff strategy between retries
    pub backoff: BackoffType,
    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,
    /// Requests per minute allowed by the rate limiter (0 disables it)
    pub requests_per_minute: u32,
    /// Burst size of the rate limiter
    pub burst_size: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 0,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 100,
            max_backoff_ms: 60_000,
            requests_per_minute: 100,
            burst_size: 10,
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Data center region
    #[serde(default)]
    pub region: Region,

    /// Organization scoping every request
    pub organization_id: String,

    /// Credentials
    pub auth: CredentialsConfig,

    /// HTTP transport settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Override for the regional API base URL
    #[serde(default)]
    pub api_base_url: Option<String>,
}

impl ConnectorConfig {
    /// Create a config using a pre-issued access token
    pub fn with_access_token(
        region: Region,
        organization_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            region,
            organization_id: organization_id.into(),
            auth: CredentialsConfig::AccessToken {
                token: token.into(),
            },
            http: HttpSettings::default(),
            api_base_url: None,
        }
    }

    /// Override the API base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Load config from a YAML or JSON file (chosen by extension)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields
    pub fn validate(&self) -> Result<()> {
        if self.organization_id.trim().is_empty() {
            return Err(Error::missing_field("organization_id"));
        }

        match &self.auth {
            CredentialsConfig::AccessToken { token } => {
                if token.trim().is_empty() {
                    return Err(Error::missing_field("auth.token"));
                }
            }
            CredentialsConfig::Oauth2Refresh {
                client_id,
                client_secret,
                refresh_token,
                ..
            } => {
                for (field, value) in [
                    ("auth.client_id", client_id),
                    ("auth.client_secret", client_secret),
                    ("auth.refresh_token", refresh_token),
                ] {
                    if value.trim().is_empty() {
                        return Err(Error::missing_field(field));
                    }
                }
            }
        }

        if let Some(url) = &self.api_base_url {
            url::Url::parse(url)?;
        }

        Ok(())
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.region.api_url())
    }

    /// Root of the Inventory API, e.g. `https://www.zohoapis.eu/inventory/v1`
    pub fn inventory_url(&self) -> String {
        format!(
            "{}/inventory/{API_VERSION}",
            self.base_url().trim_end_matches('/')
        )
    }

    /// Runtime auth configuration
    pub fn auth_config(&self) -> AuthConfig {
        match &self.auth {
            CredentialsConfig::AccessToken { token } => AuthConfig::AccessToken {
                token: token.clone(),
            },
            CredentialsConfig::Oauth2Refresh {
                client_id,
                client_secret,
                refresh_token,
                token_url,
            } => AuthConfig::Oauth2Refresh {
                token_url: token_url
                    .clone()
                    .unwrap_or_else(|| self.region.token_url()),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                refresh_token: refresh_token.clone(),
            },
        }
    }

    /// HTTP client configuration derived from the settings
    pub fn http_client_config(&self) -> HttpClientConfig {
        let settings = &self.http;
        let retry = RetryPolicy {
            max_retries: settings.max_retries,
            backoff_type: settings.backoff,
            initial_backoff: Duration::from_millis(settings.initial_backoff_ms),
            max_backoff: Duration::from_millis(settings.max_backoff_ms),
        };
        let rate_limit = (settings.requests_per_minute > 0).then(|| {
            RateLimiterConfig::new(settings.requests_per_minute, settings.burst_size)
        });

        HttpClientConfig::builder()
            .base_url(self.inventory_url())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .retry(retry)
            .rate_limit(rate_limit)
            .build()
    }
}
