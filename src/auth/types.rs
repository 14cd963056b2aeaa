//! Credentials as the transport sees them
//!
//! Built from [`crate::config::CredentialsConfig`] once the accounts server
//! URL for the configured region is known.

use chrono::{DateTime, Duration, Utc};

/// Tokens are treated as expired this long before Zoho says they are
const EXPIRY_MARGIN_SECS: i64 = 30;

/// How requests are authorized
#[derive(Debug, Clone, Default)]
pub enum AuthConfig {
    /// Send no `Authorization` header, only useful against mock servers
    #[default]
    None,

    /// Pre-issued access token, used until it stops working
    AccessToken {
        /// Access token
        token: String,
    },

    /// Refresh-token grant against the Zoho accounts server
    Oauth2Refresh {
        /// Accounts server token endpoint
        token_url: String,
        /// OAuth client ID
        client_id: String,
        /// OAuth client secret
        client_secret: String,
        /// Long-lived refresh token
        refresh_token: String,
    },
}

/// Access token obtained from a refresh
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// Access token value
    pub token: String,
    /// Expiry reported by the accounts server, `None` if it gave none
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Token with an explicit expiry
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Token valid for `seconds` from now, as given by `expires_in`
    pub fn expires_in(token: String, seconds: i64) -> Self {
        Self::new(token, Some(Utc::now() + Duration::seconds(seconds)))
    }

    /// Whether the token is expired or about to be
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= expires_at
        })
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;
    use test_case::test_case;

    #[test_case(3600 => false; "fresh")]
    #[test_case(10 => true; "inside margin")]
    #[test_case(-100 => true; "past")]
    fn expiry(seconds: i64) -> bool {
        CachedToken::expires_in("1000.token".to_string(), seconds).is_expired()
    }

    #[test]
    fn token_without_expiry_never_expires() {
        assert!(!CachedToken::new("1000.token".to_string(), None).is_expired());
    }

    #[test]
    fn default_sends_no_credentials() {
        assert!(matches!(AuthConfig::default(), AuthConfig::None));
    }
}
