use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Sandook";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default address the API server binds to. Loopback only; a reverse proxy
/// owns anything public.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7400";

/// Get the application data directory.
/// `SANDOOK_DATA_DIR` overrides the default of `~/.sandook/`.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("SANDOOK_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(".sandook")
}

/// Address to bind the API server to. `SANDOOK_BIND` overrides the default.
pub fn bind_addr() -> Result<SocketAddr, String> {
    let raw = std::env::var("SANDOOK_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    raw.parse()
        .map_err(|e| format!("Invalid bind address '{raw}': {e}"))
}

/// Default `RUST_LOG`-style filter when the caller sets none.
pub fn default_log_filter() -> &'static str {
    "sandook=info,tower_http=warn"
}
