//! # API Module
//!
//! HTTP endpoints served by the short-lived local listener that receives the
//! OAuth2 authorization redirect during `gads-cli auth login`.
//!
//! ## Endpoints
//!
//! - [`callback`] - Target of the redirect. Reads `code`, `state` and `error`
//!   from the query string and hands the outcome to the waiting login flow
//!   over a single-slot channel. Only the first redirect is delivered.
//! - [`health`] - Liveness probe that reports the listener is up and which
//!   version of the CLI is waiting.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use gads_cli::api::{CallbackState, callback, health};
//!
//! let (state, rx) = CallbackState::new("expected-state");
//! let app = Router::new()
//!     .route("/", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```
//!
//! ## Related Modules
//!
//! - [`crate::server`] - Binds and tears down the listener
//! - [`crate::ads::auth`] - The login flow consuming the callback outcome

mod callback;
mod health;

pub use callback::CallbackState;
pub use callback::callback;
pub use health::health;
