//! HTTP server lifecycle: bind, spawn, graceful shutdown.
//!
//! The vault API binds to the configured address (loopback by default),
//! mounts `vault_router()`, and runs in a background tokio task until the
//! shutdown channel fires.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::api::router::vault_router;
use crate::vault_state::VaultState;

/// Session metadata for a running API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSession {
    pub session_id: String,
    pub server_addr: String,
    pub port: u16,
    pub started_at: String,
}

/// Handle to a running API server.
pub struct ApiServer {
    pub session: ApiSession,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the vault API server on `addr`.
///
/// Binds the listener, builds the router, and spawns the axum server in a
/// background tokio task. Returns a handle with session metadata and a
/// shutdown channel.
pub async fn start_server(
    state: Arc<VaultState>,
    addr: SocketAddr,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    let app = vault_router(state);

    let session = ApiSession {
        session_id: Uuid::new_v4().to_string(),
        server_addr: addr.to_string(),
        port: addr.port(),
        started_at: chrono::Utc::now().to_rfc3339(),
    };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        session,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DisabledOcrEngine;

    fn test_state() -> (Arc<VaultState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = VaultState::new(dir.path().join("vault"), Arc::new(DisabledOcrEngine));
        state.initialize().unwrap();
        (Arc::new(state), dir)
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (state, _dir) = test_state();
        let mut server = start_server(state, "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");

        assert!(!server.session.session_id.is_empty());
        assert!(server.session.port > 0);

        // The listener is live before the handle is returned.
        tokio::net::TcpStream::connect(server.session.server_addr.as_str())
            .await
            .expect("server should accept connections");

        server.shutdown();
        // Let the accept loop wind down
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn server_session_has_valid_metadata() {
        let (state, _dir) = test_state();
        let mut server = start_server(state, "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");

        assert!(!server.session.started_at.is_empty());
        assert!(server.session.server_addr.contains(':'));
        assert!(server.session.server_addr.ends_with(&server.session.port.to_string()));

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (state, _dir) = test_state();
        let mut server = start_server(state, "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");

        server.shutdown();
        server.shutdown(); // second call is a no-op
    }
}
