use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::{Mutex, oneshot};

use crate::types::CallbackOutcome;

/// Shared between the callback handler and the login flow.
#[derive(Clone)]
pub struct CallbackState {
    expected_state: Arc<str>,
    sender: Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>,
}

impl CallbackState {
    /// Creates the handler state and the receiving half of the handoff.
    pub fn new(expected_state: &str) -> (Self, oneshot::Receiver<CallbackOutcome>) {
        let (tx, rx) = oneshot::channel();
        let state = Self {
            expected_state: Arc::from(expected_state),
            sender: Arc::new(Mutex::new(Some(tx))),
        };
        (state, rx)
    }

    fn classify(&self, params: &HashMap<String, String>) -> CallbackOutcome {
        if let Some(error) = params.get("error") {
            let reason = match params.get("error_description") {
                Some(desc) if !desc.is_empty() => format!("{} ({})", error, desc),
                _ => error.clone(),
            };
            return CallbackOutcome::Denied(reason);
        }

        let Some(code) = params.get("code").filter(|c| !c.is_empty()) else {
            return CallbackOutcome::Denied("missing authorization code".to_string());
        };

        if params.get("state").map(String::as_str) != Some(&*self.expected_state) {
            return CallbackOutcome::Denied("state mismatch".to_string());
        }

        CallbackOutcome::Code(code.clone())
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<CallbackState>,
) -> Html<String> {
    let outcome = shared_state.classify(&params);

    let Some(sender) = shared_state.sender.lock().await.take() else {
        return Html(page(
            "Authorization already handled",
            "You can close this tab.",
        ));
    };

    let body = match &outcome {
        CallbackOutcome::Code(_) => page(
            "Authorization successful!",
            "You can close this tab and return to the terminal.",
        ),
        CallbackOutcome::Denied(reason) => page("Authorization failed", &escape(reason)),
    };

    // The flow may already have given up waiting.
    let _ = sender.send(outcome);
    Html(body)
}

fn page(title: &str, message: &str) -> String {
    format!(
        "<html><body style=\"font-family: system-ui; text-align: center; padding-top: 80px;\"><h2>{}</h2><p>{}</p></body></html>",
        title, message
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_classify_code_with_matching_state() {
        let (state, _rx) = CallbackState::new("xyz");
        let outcome = state.classify(&params(&[("code", "4/abc"), ("state", "xyz")]));
        assert_eq!(outcome, CallbackOutcome::Code("4/abc".to_string()));
    }

    #[test]
    fn test_classify_state_mismatch_is_denied() {
        let (state, _rx) = CallbackState::new("xyz");
        let outcome = state.classify(&params(&[("code", "4/abc"), ("state", "other")]));
        assert_eq!(outcome, CallbackOutcome::Denied("state mismatch".to_string()));
    }

    #[test]
    fn test_classify_error_wins_over_code() {
        let (state, _rx) = CallbackState::new("xyz");
        let outcome = state.classify(&params(&[
            ("error", "access_denied"),
            ("code", "4/abc"),
            ("state", "xyz"),
        ]));
        assert_eq!(
            outcome,
            CallbackOutcome::Denied("access_denied".to_string())
        );
    }

    #[tokio::test]
    async fn test_only_first_callback_is_delivered() {
        let (state, rx) = CallbackState::new("s");
        let first = callback(
            Query(params(&[("code", "one"), ("state", "s")])),
            Extension(state.clone()),
        )
        .await;
        assert!(first.0.contains("successful"));

        let second = callback(
            Query(params(&[("code", "two"), ("state", "s")])),
            Extension(state),
        )
        .await;
        assert!(second.0.contains("already handled"));

        assert_eq!(rx.await.unwrap(), CallbackOutcome::Code("one".to_string()));
    }
}
