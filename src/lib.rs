pub mod api;
pub mod config;
pub mod crypto;
pub mod db;
pub mod extract;
pub mod gate;
pub mod models;
pub mod store;
pub mod validate;
pub mod vault_state;

use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` wins; otherwise the built-in default
/// filter from `config`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
