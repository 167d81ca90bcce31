//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::gate::GateError;
use crate::store::StoreError;
use crate::vault_state::StateError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_minutes: Option<i64>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Invalid PIN")]
    InvalidPin { attempts_remaining: u32 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    AlreadyExists(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Locker locked for {retry_after_minutes} minutes")]
    Locked { retry_after_minutes: i64 },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut attempts_remaining = None;
        let mut retry_after_minutes = None;
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::InvalidPin {
                attempts_remaining: remaining,
            } => {
                attempts_remaining = Some(*remaining);
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_PIN",
                    "Invalid PIN".to_string(),
                )
            }
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::AlreadyExists(detail) => {
                (StatusCode::CONFLICT, "ALREADY_EXISTS", detail.clone())
            }
            ApiError::PayloadTooLarge(detail) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                detail.clone(),
            ),
            ApiError::Locked {
                retry_after_minutes: minutes,
            } => {
                retry_after_minutes = Some(*minutes);
                (
                    StatusCode::LOCKED,
                    "LOCKED",
                    format!(
                        "Locker is locked due to multiple failed attempts. Try again in {minutes} minutes."
                    ),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                attempts_remaining,
                retry_after_minutes,
            },
        };

        let mut response = (status, Json(body)).into_response();
        // Locked responses also advertise the wait in seconds
        if let ApiError::Locked {
            retry_after_minutes,
        } = &self
        {
            let seconds = (*retry_after_minutes).max(0) * 60;
            if let Ok(val) = axum::http::HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert("Retry-After", val);
            }
        }
        response
    }
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::PinRequired | GateError::InvalidFormat => {
                ApiError::BadRequest(err.to_string())
            }
            GateError::NotFound => ApiError::NotFound(err.to_string()),
            GateError::Locked { minutes } => ApiError::Locked {
                retry_after_minutes: minutes,
            },
            GateError::InvalidPin { attempts_remaining } => {
                ApiError::InvalidPin { attempts_remaining }
            }
            GateError::AlreadyExists => ApiError::AlreadyExists(err.to_string()),
            GateError::State(e) => ApiError::Internal(e.to_string()),
            GateError::Database(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DocumentNotFound
            | StoreError::FileMissing
            | StoreError::RequirementsNotFound => ApiError::NotFound(err.to_string()),
            StoreError::NotEnoughDocuments
            | StoreError::UnsupportedFileType
            | StoreError::FileRequired => ApiError::BadRequest(err.to_string()),
            StoreError::FileTooLarge => ApiError::PayloadTooLarge(err.to_string()),
            StoreError::Gate(gate) => gate.into(),
            StoreError::State(e) => ApiError::Internal(e.to_string()),
            StoreError::Database(e) => ApiError::Internal(e.to_string()),
            StoreError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<crate::db::DatabaseError> for ApiError {
    fn from(err: crate::db::DatabaseError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart form: {err}"))
    }
}
