//! Access-token suppliers.
//!
//! [`RefreshTokenSource`] mints access tokens from the long-lived refresh
//! token. [`PersistingTokenSource`] wraps any supplier and writes every newly
//! issued access token back to the credential record, so callers never have to
//! ask for a refresh explicitly.

use std::future::Future;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    ads::auth::{OAuthConfig, oauth_error_message},
    error::{Error, Result},
    management::CredentialSink,
    types::{Credentials, Token, TokenResponse},
};

pub trait TokenSupplier: Send + Sync {
    /// A token that is valid right now.
    fn current_token(&self) -> impl Future<Output = Result<Token>> + Send;
}

/// Refresh-token grant against the identity provider.
pub struct RefreshTokenSource {
    http: Client,
    oauth: OAuthConfig,
    refresh_token: String,
    current: Mutex<Token>,
}

impl RefreshTokenSource {
    pub fn new(
        http: Client,
        oauth: OAuthConfig,
        refresh_token: impl Into<String>,
        initial: Token,
    ) -> Self {
        Self {
            http,
            oauth,
            refresh_token: refresh_token.into(),
            current: Mutex::new(initial),
        }
    }

    async fn refresh(&self) -> Result<Token> {
        if self.refresh_token.is_empty() {
            return Err(Error::NotAuthenticated);
        }

        tracing::debug!(token_url = %self.oauth.token_url, "refreshing access token");
        let response = self
            .http
            .post(&self.oauth.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: format!("token refresh failed: {}", oauth_error_message(&body)),
            });
        }

        let data: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("token response: {}", e)))?;
        if data.access_token.is_empty() {
            return Err(Error::Parse(
                "token response does not contain access_token".to_string(),
            ));
        }

        let token = data.into_token(Utc::now());
        if let Some(expiry) = token.expiry {
            tracing::debug!(expires = %expiry.to_rfc3339(), "access token refreshed");
        }
        Ok(token)
    }
}

impl TokenSupplier for RefreshTokenSource {
    async fn current_token(&self) -> Result<Token> {
        let mut current = self.current.lock().await;
        if current.is_valid() {
            return Ok(current.clone());
        }

        let token = self.refresh().await?;
        *current = token.clone();
        Ok(token)
    }
}

/// Writes newly issued access tokens back through a [`CredentialSink`].
pub struct PersistingTokenSource<S, K> {
    inner: S,
    sink: K,
    credentials: Mutex<Credentials>,
}

impl<S, K> PersistingTokenSource<S, K> {
    pub fn new(inner: S, sink: K, credentials: Credentials) -> Self {
        Self {
            inner,
            sink,
            credentials: Mutex::new(credentials),
        }
    }

    /// Record as last persisted.
    pub async fn credentials(&self) -> Credentials {
        self.credentials.lock().await.clone()
    }
}

impl<S, K> TokenSupplier for PersistingTokenSource<S, K>
where
    S: TokenSupplier,
    K: CredentialSink,
{
    async fn current_token(&self) -> Result<Token> {
        let token = self.inner.current_token().await?;

        let mut credentials = self.credentials.lock().await;
        if token.access_token != credentials.access_token {
            // Only a saved record may advance, so a failed save is retried next call.
            let mut updated = credentials.clone();
            updated.apply_token(&token);
            self.sink.save(&updated).await?;
            *credentials = updated;
            tracing::debug!("refreshed access token persisted");
        }
        Ok(token)
    }
}
