use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle};

use crate::{
    api::{self, CallbackState},
    error::{Error, Result},
};

/// Local listener receiving the authorization redirect.
///
/// `localhost` may resolve to either loopback family, so the port is bound on
/// `127.0.0.1` and, when the host has IPv6, on `[::1]` as well. Owns its port
/// until [`CallbackServer::shutdown`] is awaited or the value is dropped; both
/// paths stop the accept loops and release the sockets.
pub struct CallbackServer {
    port: u16,
    handles: Vec<JoinHandle<()>>,
}

impl CallbackServer {
    pub async fn start(port: u16, state: CallbackState) -> Result<Self> {
        let app = Router::new()
            .route("/", get(api::callback))
            .route("/health", get(api::health))
            .layer(Extension(state));

        let v4 = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        let listener = TcpListener::bind(v4)
            .await
            .map_err(|source| Error::CallbackBind { port, source })?;
        let port = listener.local_addr()?.port();

        let mut handles = vec![serve(listener, app.clone())];
        match TcpListener::bind(SocketAddr::from((Ipv6Addr::LOCALHOST, port))).await {
            Ok(listener) => handles.push(serve(listener, app)),
            Err(e) => tracing::debug!(port, "no IPv6 loopback listener: {}", e),
        }

        tracing::debug!(port, listeners = handles.len(), "callback listener started");
        Ok(Self { port, handles })
    }

    /// Port actually bound, which differs from the requested one for port 0.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stops the listeners and waits until their sockets are closed.
    pub async fn shutdown(mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
            let _ = handle.await;
        }
        tracing::debug!(port = self.port, "callback listener released");
    }
}

impl Drop for CallbackServer {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

fn serve(listener: TcpListener, app: Router) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::warn!("callback listener stopped: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_and_release() {
        let (state, _rx) = CallbackState::new("s");
        let server = CallbackServer::start(0, state).await.unwrap();
        let port = server.port();
        assert_ne!(port, 0);

        let body: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{}/health", port))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "waiting for authorization");

        server.shutdown().await;
        assert!(TcpListener::bind(("127.0.0.1", port)).await.is_ok());
    }

    #[tokio::test]
    async fn test_answers_on_ipv6_loopback_when_available() {
        // Hosts without IPv6 have nothing to check.
        let Ok(v6) = TcpListener::bind("[::1]:0").await else {
            return;
        };
        drop(v6);

        let (state, _rx) = CallbackState::new("s");
        let server = CallbackServer::start(0, state).await.unwrap();
        let port = server.port();

        let response = reqwest::get(format!("http://[::1]:{}/health", port))
            .await
            .unwrap();
        assert!(response.status().is_success());

        server.shutdown().await;
        assert!(TcpListener::bind(("::1", port)).await.is_ok());
    }
}
