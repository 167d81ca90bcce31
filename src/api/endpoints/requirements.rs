//! Service requirement endpoints.
//!
//! `GET /api/requirements/service/:service_id` — requirement set for a
//! government service.
//! `POST /api/requirements/validate` — check a document selection against
//! the service's rules.
//!
//! Requirement sets are public reference data, so neither route asks for
//! a PIN.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::models::RequirementSet;
use crate::store;
use crate::validate::SelectionVerdict;
use crate::vault_state::VaultState;

#[derive(Deserialize)]
pub struct ValidateSelectionRequest {
    pub service_id: String,
    #[serde(default)]
    pub selected_documents: Vec<String>,
}

/// `GET /api/requirements/service/:service_id` — the service's document
/// checklist.
pub async fn for_service(
    State(state): State<Arc<VaultState>>,
    Path(service_id): Path<String>,
) -> Result<Json<RequirementSet>, ApiError> {
    Ok(Json(store::get_requirements(&state, &service_id)?))
}

/// `POST /api/requirements/validate` — verdict on a document selection.
pub async fn validate(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<ValidateSelectionRequest>,
) -> Result<Json<SelectionVerdict>, ApiError> {
    let verdict =
        store::check_requirements(&state, &payload.service_id, &payload.selected_documents)?;
    Ok(Json(verdict))
}
