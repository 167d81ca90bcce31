//! Vault API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. Every locker route verifies the PIN in
//! the handler chain, so the router itself carries no auth middleware.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::vault_state::VaultState;

/// Room for the 10 MB file cap plus multipart framing.
const UPLOAD_BODY_LIMIT: usize = 12 * 1024 * 1024;

/// Build the vault API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn vault_router(state: Arc<VaultState>) -> Router {
    let routes = Router::new()
        .route("/locker/create", post(endpoints::locker::create))
        .route("/locker/exists", get(endpoints::locker::exists))
        .route("/locker/unlock", post(endpoints::locker::unlock))
        .route("/locker/change-pin", put(endpoints::locker::change_pin))
        .route("/locker/stats", post(endpoints::locker::stats))
        .route(
            "/locker/profile-data",
            post(endpoints::locker::profile_data),
        )
        .route(
            "/locker/cross-validate",
            post(endpoints::locker::cross_validate),
        )
        .route("/locker/documents", post(endpoints::documents::list))
        .route(
            "/locker/documents/upload",
            post(endpoints::documents::upload),
        )
        .route(
            "/locker/documents/:id",
            post(endpoints::documents::detail)
                .put(endpoints::documents::update)
                .delete(endpoints::documents::delete),
        )
        .route(
            "/locker/documents/:id/download",
            post(endpoints::documents::download),
        )
        .route(
            "/locker/documents/:id/verify-ocr",
            post(endpoints::documents::verify_ocr),
        )
        .route(
            "/locker/documents/:id/ocr-data",
            put(endpoints::documents::ocr_data),
        )
        .route(
            "/requirements/service/:service_id",
            get(endpoints::requirements::for_service),
        )
        .route(
            "/requirements/validate",
            post(endpoints::requirements::validate),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(CorsLayer::permissive());

    Router::new().nest("/api", routes)
}
