//! Configuration management for the Google Ads CLI.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the per-user configuration directory. Every setting has a default,
//! so a fresh installation works without any `.env` at all.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the configuration directory
//! 3. Application defaults
//!
//! The access layer (`ads`, `management`, `server`) never reads these values
//! itself; the command layer resolves them and hands them to the constructors.

use std::{env, path::PathBuf, time::Duration};

use crate::ads::{
    auth::{ADWORDS_SCOPE, DEFAULT_CALLBACK_PORT, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL},
    client::{DEFAULT_API_BASE_URL, DEFAULT_API_VERSION},
};

pub const APP_DIR: &str = "gads";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Loads environment variables from a `.env` file in the configuration directory.
///
/// The file lives at:
/// - Linux: `~/.config/gads/.env`
/// - macOS: `~/Library/Application Support/gads/.env`
/// - Windows: `%APPDATA%/gads/.env`
///
/// A missing file is not an error; a present but unreadable one is.
///
/// # Example
///
/// ```
/// use gads_cli::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let path = app_dir().join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Per-user configuration directory of the application.
pub fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Location of the persisted credential record.
///
/// Overridable with `GADS_CREDENTIALS_PATH`, otherwise
/// `<config dir>/gads/credentials.json`.
pub fn credentials_path() -> PathBuf {
    match env::var("GADS_CREDENTIALS_PATH") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => app_dir().join("credentials.json"),
    }
}

/// Base endpoint of the Google Ads REST API, without the version segment.
pub fn api_base_url() -> String {
    string_or("GADS_API_BASE_URL", DEFAULT_API_BASE_URL)
}

/// API version path segment, e.g. `v19`.
pub fn api_version() -> String {
    string_or("GADS_API_VERSION", DEFAULT_API_VERSION)
}

/// Authorization endpoint of the identity provider.
pub fn oauth_auth_url() -> String {
    string_or("GADS_OAUTH_AUTH_URL", GOOGLE_AUTH_URL)
}

/// Token exchange and refresh endpoint of the identity provider.
pub fn oauth_token_url() -> String {
    string_or("GADS_OAUTH_TOKEN_URL", GOOGLE_TOKEN_URL)
}

pub fn oauth_scope() -> String {
    string_or("GADS_OAUTH_SCOPE", ADWORDS_SCOPE)
}

/// Port of the local listener that receives the authorization redirect.
///
/// The redirect URI registered with the OAuth client must be
/// `http://localhost:<port>`, served on both loopback addresses.
pub fn callback_port() -> u16 {
    env::var("GADS_CALLBACK_PORT")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_CALLBACK_PORT)
}

pub fn redirect_uri() -> String {
    format!("http://localhost:{}", callback_port())
}

/// Transport timeout applied to every API and token call.
pub fn http_timeout() -> Duration {
    let secs = env::var("GADS_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn string_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().trim_end_matches('/').to_string(),
        _ => default.to_string(),
    }
}
