use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};

use crate::{
    api::CallbackState,
    error::{Error, Result},
    management::CredentialStore,
    server::CallbackServer,
    types::{CallbackOutcome, Credentials, Token, TokenResponse},
    utils,
};

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const ADWORDS_SCOPE: &str = "https://www.googleapis.com/auth/adwords";
pub const DEFAULT_CALLBACK_PORT: u16 = 8080;

/// OAuth2 client registration plus the identity provider endpoints.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
}

impl OAuthConfig {
    /// Google endpoints and the AdWords scope.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            scope: ADWORDS_SCOPE.to_string(),
        }
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(&credentials.client_id, &credentials.client_secret)
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

/// Everything needed to redeem a captured authorization code.
#[derive(Debug, Clone)]
pub struct AuthorizationCode {
    pub code: String,
    pub code_verifier: String,
    pub redirect_uri: String,
}

/// Interactive authorization-code login.
///
/// Binds a local listener, presents the consent URL, waits (bounded) for the
/// redirect, exchanges the code and merges the resulting tokens into the
/// credential record. The listener is released on every exit path.
pub struct AuthorizationFlow {
    oauth: OAuthConfig,
    http: Client,
    port: u16,
    timeout: Duration,
}

impl AuthorizationFlow {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

    pub fn new(oauth: OAuthConfig, http: Client) -> Self {
        Self {
            oauth,
            http,
            port: DEFAULT_CALLBACK_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Consent URL for the given redirect target.
    pub fn authorization_url(
        &self,
        redirect_uri: &str,
        state: &str,
        code_challenge: &str,
    ) -> Result<String> {
        let mut url = Url::parse(&self.oauth.auth_url).map_err(|e| {
            Error::Configuration(format!(
                "invalid authorization url {}: {}",
                self.oauth.auth_url, e
            ))
        })?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.oauth.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.oauth.scope)
            .append_pair("state", state)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "S256");
        Ok(url.into())
    }

    /// Runs the browser half of the flow and returns the captured code.
    ///
    /// `present` receives the consent URL once the listener is up; the CLI
    /// opens a browser with it.
    pub async fn authorize<F>(&self, present: F) -> Result<AuthorizationCode>
    where
        F: FnOnce(&str),
    {
        let state = utils::generate_state();
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);

        let (callback_state, rx) = CallbackState::new(&state);
        let server = CallbackServer::start(self.port, callback_state).await?;
        let redirect_uri = format!("http://localhost:{}", server.port());

        let url = match self.authorization_url(&redirect_uri, &state, &code_challenge) {
            Ok(url) => url,
            Err(e) => {
                server.shutdown().await;
                return Err(e);
            }
        };
        present(&url);

        let outcome = tokio::time::timeout(self.timeout, rx).await;
        server.shutdown().await;

        match outcome {
            Err(_) => Err(Error::AuthorizationTimedOut(self.timeout)),
            Ok(Err(_)) => Err(Error::AuthorizationDenied(
                "callback listener closed".to_string(),
            )),
            Ok(Ok(CallbackOutcome::Denied(reason))) => Err(Error::AuthorizationDenied(reason)),
            Ok(Ok(CallbackOutcome::Code(code))) => Ok(AuthorizationCode {
                code,
                code_verifier,
                redirect_uri,
            }),
        }
    }

    /// Redeems an authorization code at the token endpoint.
    ///
    /// Returns the access token and, when issued, the refresh token.
    pub async fn exchange(&self, code: &AuthorizationCode) -> Result<(Token, Option<String>)> {
        let response = self
            .http
            .post(&self.oauth.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.code.as_str()),
                ("client_id", self.oauth.client_id.as_str()),
                ("client_secret", self.oauth.client_secret.as_str()),
                ("redirect_uri", code.redirect_uri.as_str()),
                ("code_verifier", code.code_verifier.as_str()),
            ])
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Transport)?;
        if !status.is_success() {
            return Err(Error::TokenExchange(format!(
                "{} - {}",
                status.as_u16(),
                oauth_error_message(&body)
            )));
        }

        let data: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("token response: {}", e)))?;
        if data.access_token.is_empty() {
            return Err(Error::TokenExchange(
                "token response does not contain access_token".to_string(),
            ));
        }

        let refresh_token = data.refresh_token.clone().filter(|t| !t.is_empty());
        Ok((data.into_token(Utc::now()), refresh_token))
    }

    /// Full login: authorize, exchange, merge into `base` and persist.
    ///
    /// Identity, developer token and manager account in `base` are kept; an
    /// exchange that returns no refresh token keeps the one already in `base`.
    pub async fn login<F>(
        &self,
        store: &CredentialStore,
        base: Credentials,
        present: F,
    ) -> Result<Credentials>
    where
        F: FnOnce(&str),
    {
        let code = self.authorize(present).await?;
        let (token, refresh_token) = self.exchange(&code).await?;

        let mut credentials = base;
        credentials.apply_token(&token);
        if let Some(refresh_token) = refresh_token {
            credentials.refresh_token = refresh_token;
        }
        if credentials.refresh_token.is_empty() {
            return Err(Error::TokenExchange(
                "no refresh token returned; revoke the app's access and log in again".to_string(),
            ));
        }

        store.save(&credentials).await?;
        tracing::debug!(path = %store.path().display(), "login persisted");
        Ok(credentials)
    }
}

/// Human-readable message from an OAuth2 error body.
///
/// Prefers `error_description`, then `error`, then the raw body.
pub fn oauth_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };
    for key in ["error_description", "error"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            if !msg.is_empty() {
                return msg.to_string();
            }
        }
    }
    body.to_string()
}
