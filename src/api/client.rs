//! Zoho Inventory request helper

use super::types::{ApiResponse, ConnectionStatus};
use crate::config::ConnectorConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, PageRequest, PageSource};
use crate::types::{JsonObject, JsonValue, Method, QueryParams};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Client for the Inventory v1 API of one organization
#[derive(Debug)]
pub struct ZohoClient {
    http: HttpClient,
    organization_id: String,
}

impl ZohoClient {
    /// Build a client from validated connector configuration
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;
        Ok(Self::from_parts(http, config.organization_id.clone()))
    }

    /// Build a client over an existing transport
    ///
    /// The transport's base URL must already point at the `/inventory/v1` root.
    pub fn from_parts(http: HttpClient, organization_id: impl Into<String>) -> Self {
        Self {
            http,
            organization_id: organization_id.into(),
        }
    }

    /// Organization every request is scoped to
    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Issue one API call and decode the envelope
    ///
    /// For GET, a non-empty `body` is folded into the query string. For every
    /// other method it is sent as the JSON body.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: &JsonObject,
        query: &QueryParams,
    ) -> Result<ApiResponse> {
        let mut request = RequestConfig::new()
            .queries(query)
            .query("organization_id", self.organization_id.as_str());

        if !body.is_empty() {
            if method.is_read() {
                for (key, value) in body {
                    request = request.query(key.as_str(), query_value(value));
                }
            } else {
                request = request.json(JsonValue::Object(body.clone()));
            }
        }

        debug!("{} {}", method, endpoint);

        let response = self
            .http
            .request(method.into(), endpoint, request)
            .await
            .map_err(envelope_error)?;

        let bytes = response.bytes().await?;
        ApiResponse::from_slice(&bytes)?.error_for_code()
    }

    /// GET with query parameters only
    pub async fn get(&self, endpoint: &str, query: &QueryParams) -> Result<ApiResponse> {
        self.request(Method::GET, endpoint, &JsonObject::new(), query)
            .await
    }

    /// Verify credentials and organization by listing organizations
    pub async fn check(&self) -> ConnectionStatus {
        match self.get("/organizations", &QueryParams::new()).await {
            Ok(_) => ConnectionStatus::succeeded(),
            Err(e) => {
                warn!("Connection check failed: {}", e);
                ConnectionStatus::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl PageSource for ZohoClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page> {
        let response = self
            .request(
                request.method,
                &request.endpoint,
                &JsonObject::new(),
                &request.paged_query(),
            )
            .await?;
        Ok(response.into_page(&request.records_field))
    }
}

/// Render a JSON value the way it should appear in a query string
fn query_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Surface the provider message when an HTTP error carries a Zoho envelope
fn envelope_error(err: Error) -> Error {
    let Error::HttpStatus { status, body } = err else {
        return err;
    };

    ApiResponse::from_slice(body.as_bytes())
        .ok()
        .and_then(|envelope| envelope.provider_error())
        .unwrap_or(Error::HttpStatus { status, body })
}
