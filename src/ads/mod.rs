//! # Google Ads Integration Module
//!
//! The authenticated API-access layer of gads-cli: OAuth2 login, transparent
//! token refresh with write-back, and the REST protocol client used by every
//! resource command.
//!
//! ## Architecture
//!
//! ```text
//! CLI commands (accounts, campaigns, keywords, ...)
//!          ↓  search / mutate
//! AdsClient ── developer-token, login-customer-id, pagination, error envelope
//!          ↓  current_token()
//! PersistingTokenSource ── writes new access tokens to the CredentialStore
//!          ↓
//! RefreshTokenSource ── refresh_token grant at the token endpoint
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Interactive authorization-code flow with a local callback
//!   listener, PKCE and a bounded wait.
//! - [`token`] - The [`TokenSupplier`] seam and its two implementations.
//! - [`client`] - [`AdsClient`] with `list_accessible_customers`, `search`
//!   and `mutate`.
//! - [`rows`] - Typed decoding of the opaque rows returned by `search`.
//!
//! ## Usage Patterns
//!
//! ```rust,ignore
//! let store = CredentialStore::new(config::credentials_path());
//! let credentials = store.load().await?;
//! let client = ads::connect(credentials, store, http, oauth)?;
//! let rows = client.search("123-456-7890", "SELECT campaign.id FROM campaign").await?;
//! ```
//!
//! ## Error Types
//!
//! Everything returns [`crate::error::Result`]. Missing refresh or developer
//! tokens are reported by [`connect`] before any request is made.

pub mod auth;
pub mod client;
pub mod rows;
pub mod token;

pub use auth::{AuthorizationFlow, OAuthConfig};
pub use client::{AdsClient, MutateOperation, ResourceKind};
pub use rows::{DecodedRows, decode_rows};
pub use token::{PersistingTokenSource, RefreshTokenSource, TokenSupplier};

use reqwest::Client;

use crate::{
    error::{Error, Result},
    management::CredentialStore,
    types::Credentials,
};

/// Client wired to refresh on demand and persist into the credential file.
pub type Session = AdsClient<PersistingTokenSource<RefreshTokenSource, CredentialStore>>;

/// Builds a [`Session`] from a stored credential record.
///
/// Fails with [`Error::NotAuthenticated`] when there is no refresh token and
/// with [`Error::Configuration`] when the developer token is missing. No
/// network call is made here.
pub fn connect(
    credentials: Credentials,
    store: CredentialStore,
    http: Client,
    oauth: OAuthConfig,
) -> Result<Session> {
    if !credentials.is_authenticated() {
        return Err(Error::NotAuthenticated);
    }
    if credentials.developer_token.is_empty() {
        return Err(Error::Configuration(
            "developer token not set - run: gads-cli auth login".to_string(),
        ));
    }

    let refresh = RefreshTokenSource::new(
        http.clone(),
        oauth,
        credentials.refresh_token.clone(),
        credentials.token(),
    );
    let developer_token = credentials.developer_token.clone();
    let manager = credentials.manager_customer_id.clone();
    let tokens = PersistingTokenSource::new(refresh, store, credentials);

    Ok(AdsClient::new(
        http,
        tokens,
        developer_token,
        Some(manager.as_str()),
    ))
}
