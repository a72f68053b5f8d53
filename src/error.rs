//! Error taxonomy for the API-access layer.
//!
//! Every fallible operation in the library returns [`Result`]. The variants
//! separate "the service said no" ([`Error::Remote`]) from "the service could
//! not be reached" ([`Error::Transport`]), so callers can decide between
//! retrying, re-authenticating or giving up.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No refresh token on record.
    #[error("not authenticated - run: gads-cli auth login")]
    NotAuthenticated,

    /// Required setting missing or unusable before any call was attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote service could not be reached.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The remote service answered with a non-2xx status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("authorization timed out after {} seconds", .0.as_secs())]
    AuthorizationTimedOut(Duration),

    #[error("failed to start local server on :{port} (is something else using it?): {source}")]
    CallbackBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("exchanging auth code: {0}")]
    TokenExchange(String),

    /// A response body did not have the expected structure.
    #[error("parsing response: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP status of a remote rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Missing refresh or developer token, or an unusable setting. Nothing was sent.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::NotAuthenticated | Error::Configuration(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Error::Remote { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
