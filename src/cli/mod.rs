//! # CLI Module
//!
//! User-facing commands of gads-cli. Every command is a thin presentation
//! layer over the two operations of the access layer, `search` and `mutate`,
//! plus the credential primitives for the `auth` commands.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`auth::login`] - OAuth2 login through the browser, stores credentials
//! - [`auth::status`], [`auth::token`] - Inspect the stored record
//! - [`auth::check`] - Validate credentials with a live call
//! - [`auth::logout`] - Remove the stored record
//!
//! ### Resources
//!
//! - [`accounts::list`] - Accessible customer accounts
//! - [`query::run`] - Raw GAQL, rows printed as JSON
//! - [`campaigns`], [`adgroups`], [`keywords`], [`ads`] - List and change
//!   status of the respective resources
//! - [`insights`] - Performance reports over a date window
//!
//! ### Information
//!
//! - [`info::info`] - Config paths and authentication status
//!
//! ## Output
//!
//! Tables are printed when stdout is a terminal; JSON otherwise or when
//! `--json` / `--pretty` is given. Status and diagnostics go to stderr.
//!
//! ## Usage Patterns
//!
//! ```bash
//! gads-cli auth login --credentials-file ~/Downloads/client_secret.json
//! gads-cli accounts list
//! gads-cli campaigns list --account 123-456-7890
//! gads-cli campaigns pause --account 1234567890 --campaign 111222333
//! gads-cli insights campaigns --account 1234567890 --days 7
//! gads-cli query --account 1234567890 "SELECT campaign.id FROM campaign"
//! ```

pub mod accounts;
pub mod adgroups;
pub mod ads;
pub mod auth;
pub mod campaigns;
pub mod info;
pub mod insights;
pub mod keywords;
pub mod query;

use std::{io::IsTerminal, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tabled::{Table, Tabled};

use crate::{
    Res,
    ads::{DecodedRows, MutateOperation, OAuthConfig, ResourceKind, Session},
    config,
    management::CredentialStore,
    types::Credentials,
    warning,
};

/// How results are rendered.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
    pretty: bool,
}

impl Output {
    pub fn new(json: bool, pretty: bool) -> Self {
        Self {
            json: json || pretty || !std::io::stdout().is_terminal(),
            pretty,
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Res<()> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{}", text);
        Ok(())
    }

    /// JSON of `items`, or a table of `to_row(item)`, or `empty` when there is nothing.
    pub fn render<T, R, F>(&self, items: &[T], empty: &str, to_row: F) -> Res<()>
    where
        T: Serialize,
        R: Tabled,
        F: Fn(&T) -> R,
    {
        if self.json {
            return self.print_json(items);
        }
        if items.is_empty() {
            println!("{}", empty);
            return Ok(());
        }
        let table = Table::new(items.iter().map(to_row));
        println!("{}", table);
        Ok(())
    }
}

/// Status values settable through the resource commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Enabled,
    Paused,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Enabled => "ENABLED",
            Status::Paused => "PAUSED",
        }
    }
}

pub fn credential_store() -> CredentialStore {
    CredentialStore::new(config::credentials_path())
}

pub fn http_client() -> Res<Client> {
    let client = Client::builder()
        .timeout(config::http_timeout())
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// OAuth settings for `credentials`, endpoints taken from the environment.
pub fn oauth_config(credentials: &Credentials) -> OAuthConfig {
    OAuthConfig::from_credentials(credentials)
        .with_auth_url(config::oauth_auth_url())
        .with_token_url(config::oauth_token_url())
        .with_scope(config::oauth_scope())
}

/// Authenticated API client for the stored credentials.
pub async fn session() -> Res<Session> {
    let store = credential_store();
    let credentials = store.load().await?;
    let oauth = oauth_config(&credentials);
    let client = crate::ads::connect(credentials, store, http_client()?, oauth)?
        .with_endpoint(&config::api_base_url(), &config::api_version());
    Ok(client)
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Runs a search behind a spinner.
pub async fn search(client: &Session, account: &str, query: &str) -> Res<Vec<serde_json::Value>> {
    let pb = spinner("Querying Google Ads...");
    let result = client.search(account, query).await;
    pb.finish_and_clear();
    Ok(result?)
}

/// Rejects anything but a numeric id, since ids are interpolated into GAQL.
pub fn require_id<'a>(label: &str, value: &'a str) -> Res<&'a str> {
    let value = value.trim();
    if !is_numeric(value) {
        return Err(format!("invalid {} id: {:?}", label, value).into());
    }
    Ok(value)
}

/// `<parentId>~<childId>` key used by ad group criteria and ad group ads.
pub fn require_compound_id<'a>(label: &str, value: &'a str) -> Res<&'a str> {
    let value = value.trim();
    let valid = value
        .split_once('~')
        .is_some_and(|(parent, child)| is_numeric(parent) && is_numeric(child));
    if !valid {
        return Err(format!("invalid {} id {:?} (format: <adGroupId>~<id>)", label, value).into());
    }
    Ok(value)
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

pub fn report_decode_failures<T>(decoded: &DecodedRows<T>) {
    if !decoded.is_clean() {
        warning!(
            "{} row(s) could not be decoded and were skipped (run with --verbose for details)",
            decoded.failures.len()
        );
    }
}

/// Sets `status` on one resource.
pub async fn set_status(
    kind: ResourceKind,
    account: &str,
    id: &str,
    status: Status,
) -> Res<String> {
    let client = session().await?;
    let resource_name = kind.resource_name(account, id);
    let op = MutateOperation::update(
        json!({ "resourceName": resource_name, "status": status.as_str() }),
        &["status"],
    );
    let results = client.mutate(kind, account, &[op]).await?;
    Ok(results.into_iter().next().unwrap_or(resource_name))
}
