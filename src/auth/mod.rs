//! Request authorization
//!
//! Supports: pre-issued access tokens and the OAuth2 refresh-token grant
//! against the regional Zoho accounts server.
//!
//! Zoho does not accept `Bearer`; every request carries
//! `Authorization: Zoho-oauthtoken <token>`.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, TOKEN_SCHEME};
pub use types::{AuthConfig, CachedToken};
