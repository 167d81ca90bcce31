//! Vault HTTP API.
//!
//! Exposes the locker, document, and requirement operations as HTTP
//! endpoints. Routes are nested under `/api/`; every locker route verifies
//! the caller's PIN inside the handler, so there is no session middleware.
//!
//! The router is composable — `vault_router()` returns a `Router` that can
//! be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;

pub use router::vault_router;
pub use server::{start_server, ApiServer, ApiSession};
