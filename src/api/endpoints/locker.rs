//! Locker lifecycle endpoints.
//!
//! `POST /api/locker/create` — create a PIN-protected locker.
//! `GET /api/locker/exists` — check whether a user has a locker.
//! `POST /api/locker/unlock` — verify the PIN and open the locker.
//! `PUT /api/locker/change-pin` — rotate the PIN.
//! `POST /api/locker/stats` — usage and validation overview.
//! `POST /api/locker/profile-data` — aggregated personal data.
//! `POST /api/locker/cross-validate` — locker-wide consistency report.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::client_ip;
use crate::api::error::ApiError;
use crate::gate::{self, LockerStatus};
use crate::models::CrossValidationReport;
use crate::store::{self, LockerStats, ProfileData};
use crate::vault_state::VaultState;

#[derive(Deserialize)]
pub struct CreateLockerRequest {
    pub user_id: String,
    pub pin: String,
    pub confirm_pin: String,
}

#[derive(Serialize)]
pub struct CreateLockerResponse {
    pub locker_id: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct ExistsQuery {
    pub user_id: String,
}

/// PIN-gated operations with no extra inputs share this body.
#[derive(Deserialize)]
pub struct PinRequest {
    pub user_id: String,
    pub pin: String,
}

#[derive(Serialize)]
pub struct UnlockResponse {
    pub locker_id: String,
    pub document_count: u32,
    pub last_accessed_at: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangePinRequest {
    pub user_id: String,
    pub current_pin: String,
    pub new_pin: String,
    pub confirm_pin: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /api/locker/create` — create a locker for a user.
pub async fn create(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<CreateLockerRequest>,
) -> Result<(StatusCode, Json<CreateLockerResponse>), ApiError> {
    if payload.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("User ID is required".into()));
    }
    if payload.pin.is_empty() || payload.confirm_pin.is_empty() {
        return Err(ApiError::BadRequest(
            "PIN and confirmation PIN are required".into(),
        ));
    }
    if payload.pin != payload.confirm_pin {
        return Err(ApiError::BadRequest(
            "PIN and confirmation PIN do not match".into(),
        ));
    }

    let locker = gate::create_locker(&state, &payload.user_id, &payload.pin).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLockerResponse {
            locker_id: locker.id.to_string(),
            user_id: locker.user_id,
            created_at: locker.created_at.to_rfc3339(),
        }),
    ))
}

/// `GET /api/locker/exists?user_id=` — existence and lock state.
pub async fn exists(
    State(state): State<Arc<VaultState>>,
    Query(query): Query<ExistsQuery>,
) -> Result<Json<LockerStatus>, ApiError> {
    Ok(Json(gate::locker_status(&state, &query.user_id)?))
}

/// `POST /api/locker/unlock` — verify the PIN, return the locker overview.
pub async fn unlock(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<PinRequest>,
) -> Result<Json<UnlockResponse>, ApiError> {
    let outcome = gate::unlock(&state, &payload.user_id, &payload.pin).await?;

    Ok(Json(UnlockResponse {
        locker_id: outcome.locker.id.to_string(),
        document_count: outcome.document_count,
        last_accessed_at: outcome.locker.last_accessed_at.map(|t| t.to_rfc3339()),
    }))
}

/// `PUT /api/locker/change-pin` — rotate the PIN after verifying the
/// current one.
pub async fn change_pin(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<ChangePinRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if payload.current_pin.is_empty()
        || payload.new_pin.is_empty()
        || payload.confirm_pin.is_empty()
    {
        return Err(ApiError::BadRequest(
            "Current PIN, new PIN, and confirmation are required".into(),
        ));
    }
    if payload.new_pin != payload.confirm_pin {
        return Err(ApiError::BadRequest(
            "New PIN and confirmation do not match".into(),
        ));
    }

    gate::change_pin(&state, &payload.user_id, &payload.current_pin, &payload.new_pin).await?;

    Ok(Json(MessageResponse {
        message: "PIN changed successfully".into(),
    }))
}

/// `POST /api/locker/stats` — document counts, sizes, recent activity.
pub async fn stats(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<PinRequest>,
) -> Result<Json<LockerStats>, ApiError> {
    Ok(Json(
        store::locker_stats(&state, &payload.user_id, &payload.pin).await?,
    ))
}

/// `POST /api/locker/profile-data` — personal data merged across the locker.
pub async fn profile_data(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<PinRequest>,
) -> Result<Json<ProfileData>, ApiError> {
    Ok(Json(
        store::profile_data(&state, &payload.user_id, &payload.pin).await?,
    ))
}

/// `POST /api/locker/cross-validate` — consistency report across all
/// active documents.
pub async fn cross_validate(
    State(state): State<Arc<VaultState>>,
    headers: HeaderMap,
    Json(payload): Json<PinRequest>,
) -> Result<Json<CrossValidationReport>, ApiError> {
    let report =
        store::cross_validate_locker(&state, &payload.user_id, &payload.pin, client_ip(&headers))
            .await?;
    Ok(Json(report))
}
