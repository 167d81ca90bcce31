//! API endpoint handlers.
//!
//! Each module covers one resource. Handlers stay thin: parse the request,
//! call `gate`/`store`, shape the response.

use axum::http::HeaderMap;

pub mod documents;
pub mod locker;
pub mod requirements;

/// Client IP for audit trails, taken from `X-Forwarded-For` when a reverse
/// proxy supplies it.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = forwarded.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}
