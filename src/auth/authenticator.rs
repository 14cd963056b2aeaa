//! Request signing and access token refresh

use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authorization scheme Zoho expects in front of the access token
pub const TOKEN_SCHEME: &str = "Zoho-oauthtoken";

/// Signs requests with a Zoho access token
///
/// With [`AuthConfig::Oauth2Refresh`] the token is fetched lazily and cached
/// until shortly before it expires. Concurrent callers share one refresh.
pub struct Authenticator {
    config: AuthConfig,
    token: Arc<RwLock<Option<CachedToken>>>,
    http_client: Client,
}

impl Authenticator {
    /// Create an authenticator with its own HTTP client
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator that refreshes through `http_client`
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Add the `Authorization` header
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = match &self.config {
            AuthConfig::None => return Ok(req),
            AuthConfig::AccessToken { token } => token.clone(),
            AuthConfig::Oauth2Refresh { .. } => self.access_token().await?,
        };

        Ok(req.header(
            reqwest::header::AUTHORIZATION,
            format!("{TOKEN_SCHEME} {token}"),
        ))
    }

    /// Drop the cached token so the next request refreshes
    pub async fn clear_cache(&self) {
        *self.token.write().await = None;
    }

    /// Auth configuration in use
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = fresh(self.token.read().await.as_ref()) {
            return Ok(token);
        }

        let mut cached = self.token.write().await;
        // Another task may have refreshed while this one waited for the lock
        if let Some(token) = fresh(cached.as_ref()) {
            return Ok(token);
        }

        let refreshed = self.refresh().await?;
        let token = refreshed.token.clone();
        *cached = Some(refreshed);
        Ok(token)
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let AuthConfig::Oauth2Refresh {
            token_url,
            client_id,
            client_secret,
            refresh_token,
        } = &self.config
        else {
            return Err(Error::auth("Auth type does not support token refresh"));
        };

        debug!("Refreshing Zoho access token via {}", token_url);

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ];
        let response = self.http_client.post(token_url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!(
                    "Refresh token request failed with status {}: {body}",
                    status.as_u16()
                ),
            });
        }

        response.json::<TokenResponse>().await?.into_cached_token()
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.config {
            AuthConfig::None => "none",
            AuthConfig::AccessToken { .. } => "access_token",
            AuthConfig::Oauth2Refresh { .. } => "oauth2_refresh",
        };
        f.debug_struct("Authenticator")
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

fn fresh(token: Option<&CachedToken>) -> Option<String> {
    token
        .filter(|token| !token.is_expired())
        .map(|token| token.token.clone())
}

/// Token endpoint response
///
/// Zoho answers a bad refresh token with HTTP 200 and `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> Result<CachedToken> {
        let Some(access_token) = self.access_token else {
            return Err(Error::TokenRefresh {
                message: self
                    .error
                    .unwrap_or_else(|| "response did not contain an access_token".to_string()),
            });
        };

        Ok(match self.expires_in {
            Some(secs) => CachedToken::expires_in(access_token, secs),
            None => CachedToken::new(access_token, None),
        })
    }
}
