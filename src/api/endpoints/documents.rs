//! Document endpoints — upload, retrieval, and OCR verification.
//!
//! `POST /api/locker/documents/upload` — multipart upload with extraction.
//! `POST /api/locker/documents` — list active documents.
//! `POST /api/locker/documents/:id` — single document with audit trail.
//! `PUT /api/locker/documents/:id` — update name, tags, notes.
//! `DELETE /api/locker/documents/:id` — soft delete.
//! `POST /api/locker/documents/:id/download` — serve the stored file.
//! `POST /api/locker/documents/:id/verify-ocr` — extraction for review.
//! `PUT /api/locker/documents/:id/ocr-data` — save corrected extraction.
//!
//! Every route takes the user's PIN in the body; an upload carries it as a
//! multipart field alongside the file.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::endpoints::client_ip;
use crate::api::error::ApiError;
use crate::models::{DocumentSummary, DocumentType, ExtractedData};
use crate::store::{self, DocumentUpdate, ExtractionReview, UploadRequest, UploadedDocument};
use crate::vault_state::VaultState;

/// Body for PIN-gated document reads.
#[derive(Deserialize)]
pub struct DocumentAccess {
    pub user_id: String,
    pub pin: String,
}

#[derive(Deserialize)]
pub struct UpdateDocumentRequest {
    pub user_id: String,
    pub pin: String,
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmExtractionRequest {
    pub user_id: String,
    pub pin: String,
    pub extracted: ExtractedData,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub document_id: String,
    pub message: String,
}

/// `POST /api/locker/documents/upload` — store a document.
///
/// Multipart fields: `user_id`, `pin`, `document_type`, the `file` itself,
/// and optional `name`, `tags` (comma-separated), `notes`. Extraction and
/// locker-wide re-scoring run before the response is produced.
pub async fn upload(
    State(state): State<Arc<VaultState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedDocument>), ApiError> {
    let mut user_id = None;
    let mut pin = None;
    let mut document_type = None;
    let mut name = None;
    let mut tags: Vec<String> = Vec::new();
    let mut notes = None;
    let mut original_name = None;
    let mut content_type = None;
    let mut bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("user_id") => user_id = Some(field.text().await?),
            Some("pin") => pin = Some(field.text().await?),
            Some("document_type") => document_type = Some(field.text().await?),
            Some("name") => name = Some(field.text().await?),
            Some("tags") => {
                tags = field
                    .text()
                    .await?
                    .split(',')
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }
            Some("notes") => notes = Some(field.text().await?),
            Some("file") => {
                original_name = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().map(|s| s.to_string());
                bytes = Some(field.bytes().await?.to_vec());
            }
            _ => {}
        }
    }

    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("User ID is required".into()))?;
    let type_name = document_type
        .ok_or_else(|| ApiError::BadRequest("Document type is required".into()))?;
    let document_type: DocumentType = type_name
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Unknown document type: {type_name}")))?;

    let original_name = original_name.unwrap_or_else(|| "document".to_string());
    let mime_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(&original_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });

    let request = UploadRequest {
        user_id,
        pin: pin.unwrap_or_default(),
        document_type,
        name,
        tags,
        notes,
        original_name,
        mime_type,
        bytes: bytes.unwrap_or_default(),
    };

    let uploaded = store::upload_document(&state, request, client_ip(&headers)).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// `POST /api/locker/documents` — list the locker's active documents.
pub async fn list(
    State(state): State<Arc<VaultState>>,
    Json(payload): Json<DocumentAccess>,
) -> Result<Json<Vec<DocumentSummary>>, ApiError> {
    Ok(Json(
        store::list_documents(&state, &payload.user_id, &payload.pin).await?,
    ))
}

/// `POST /api/locker/documents/:id` — one document with its audit trail.
pub async fn detail(
    State(state): State<Arc<VaultState>>,
    Path(document_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<DocumentAccess>,
) -> Result<Json<DocumentSummary>, ApiError> {
    let document = store::get_document(
        &state,
        &payload.user_id,
        &payload.pin,
        document_id,
        client_ip(&headers),
    )
    .await?;
    Ok(Json(document))
}

/// `PUT /api/locker/documents/:id` — update document metadata.
pub async fn update(
    State(state): State<Arc<VaultState>>,
    Path(document_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentSummary>, ApiError> {
    let update = DocumentUpdate {
        name: payload.name,
        tags: payload.tags,
        notes: payload.notes,
    };
    let document = store::update_document(
        &state,
        &payload.user_id,
        &payload.pin,
        document_id,
        update,
        client_ip(&headers),
    )
    .await?;
    Ok(Json(document))
}

/// `DELETE /api/locker/documents/:id` — hide the document, keep the row.
pub async fn delete(
    State(state): State<Arc<VaultState>>,
    Path(document_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<DocumentAccess>,
) -> Result<Json<DeleteResponse>, ApiError> {
    store::delete_document(
        &state,
        &payload.user_id,
        &payload.pin,
        document_id,
        client_ip(&headers),
    )
    .await?;
    Ok(Json(DeleteResponse {
        document_id: document_id.to_string(),
        message: "Document deleted".into(),
    }))
}

/// `POST /api/locker/documents/:id/download` — stream the stored file back
/// with its original name and MIME type.
pub async fn download(
    State(state): State<Arc<VaultState>>,
    Path(document_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<DocumentAccess>,
) -> Result<Response, ApiError> {
    let file = store::download_document(
        &state,
        &payload.user_id,
        &payload.pin,
        document_id,
        client_ip(&headers),
    )
    .await?;

    // Quotes and backslashes would break the header value.
    let file_name = file.original_name.replace(['"', '\\'], "_");
    Response::builder()
        .header(header::CONTENT_TYPE, file.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from(file.bytes))
        .map_err(|e| ApiError::Internal(format!("Failed to build download response: {e}")))
}

/// `POST /api/locker/documents/:id/verify-ocr` — current extraction for the
/// manual verification screen.
pub async fn verify_ocr(
    State(state): State<Arc<VaultState>>,
    Path(document_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<DocumentAccess>,
) -> Result<Json<ExtractionReview>, ApiError> {
    let review = store::review_extraction(
        &state,
        &payload.user_id,
        &payload.pin,
        document_id,
        client_ip(&headers),
    )
    .await?;
    Ok(Json(review))
}

/// `PUT /api/locker/documents/:id/ocr-data` — save corrected extraction and
/// mark it verified.
pub async fn ocr_data(
    State(state): State<Arc<VaultState>>,
    Path(document_id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<ConfirmExtractionRequest>,
) -> Result<Json<DocumentSummary>, ApiError> {
    let document = store::confirm_extraction(
        &state,
        &payload.user_id,
        &payload.pin,
        document_id,
        payload.extracted,
        client_ip(&headers),
    )
    .await?;
    Ok(Json(document))
}
