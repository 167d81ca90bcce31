use std::process::exit;
use std::sync::Arc;

use sandook::extract::DisabledOcrEngine;
use sandook::vault_state::VaultState;
use sandook::{api, config, init_logging};

#[tokio::main]
async fn main() {
    init_logging();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    // No OCR backend is bundled; extraction falls back to manual entry
    // until an engine is wired in.
    let state = VaultState::new(config::data_dir(), Arc::new(DisabledOcrEngine));
    if let Err(e) = state.initialize() {
        tracing::error!("Failed to initialize vault storage: {e}");
        exit(1);
    }

    let addr = match config::bind_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("{e}");
            exit(1);
        }
    };

    let mut server = match api::start_server(Arc::new(state), addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            exit(1);
        }
    };

    tracing::info!(addr = %server.session.server_addr, "{} ready", config::APP_NAME);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    tracing::info!("Shutting down");
    server.shutdown();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
}
