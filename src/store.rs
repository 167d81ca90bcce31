//! PIN-gated operations over a locker's documents.
//!
//! Every operation re-verifies the PIN through the access gate, holds the
//! per-user guard for its duration, and persists audit entries before
//! returning. Files live under the state's files directory, rows in SQLite.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rand::{Rng, RngCore};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::extract;
use crate::gate::{self, GateError};
use crate::models::*;
use crate::validate::{cross_validate, validate_document, validate_selection, SelectionVerdict};
use crate::vault_state::{StateError, VaultState};

/// Upload size cap in bytes.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/bmp",
    "image/tiff",
    "application/pdf",
];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Document not found")]
    DocumentNotFound,
    #[error("Document file not found")]
    FileMissing,
    #[error("At least 2 documents are required for cross-validation")]
    NotEnoughDocuments,
    #[error("Document requirements not found for this service")]
    RequirementsNotFound,
    #[error("Only JPEG, JPG, PNG, WEBP, GIF, BMP, TIFF, and PDF files are allowed")]
    UnsupportedFileType,
    #[error("File too large. Maximum size is 10MB.")]
    FileTooLarge,
    #[error("Document file is required")]
    FileRequired,
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("File storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed multipart upload form.
#[derive(Debug)]
pub struct UploadRequest {
    pub user_id: String,
    pub pin: String,
    pub document_type: DocumentType,
    pub name: Option<String>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadedDocument {
    pub document_id: Uuid,
    pub name: String,
    pub document_type: DocumentType,
    pub extracted: ExtractedData,
    pub validation: Option<ValidationResults>,
    pub uploaded_at: DateTime<Utc>,
}

/// Raw file bytes plus the metadata needed to serve them.
#[derive(Debug)]
pub struct FileDownload {
    pub bytes: Vec<u8>,
    pub original_name: String,
    pub mime_type: String,
}

/// Metadata fields that can change after upload; `None` leaves a field as is.
#[derive(Debug, Default, Clone)]
pub struct DocumentUpdate {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidationSummary {
    pub fully_validated: u32,
    pub partially_validated: u32,
    pub needs_attention: u32,
}

#[derive(Debug, Serialize)]
pub struct LockerStats {
    pub total_documents: u32,
    pub document_types: BTreeMap<String, u32>,
    pub total_size: u64,
    pub recent_activity: Vec<AccessLogEntry>,
    pub validation_summary: ValidationSummary,
}

/// Current extraction of one document, served for manual review.
#[derive(Debug, Serialize)]
pub struct ExtractionReview {
    pub document_id: Uuid,
    pub name: String,
    pub document_type: DocumentType,
    pub extracted: ExtractedData,
}

/// Personal data aggregated across the locker, newest document first.
#[derive(Debug, Default, Serialize)]
pub struct ProfileData {
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub father_name: Option<String>,
    pub address: Option<Address>,
    pub document_numbers: BTreeMap<String, String>,
}

/// Store a new document: run extraction, enrich it from the locker peers,
/// write the file and the row, then re-score the whole locker.
pub async fn upload_document(
    state: &VaultState,
    request: UploadRequest,
    source_ip: Option<String>,
) -> Result<UploadedDocument, StoreError> {
    if request.bytes.is_empty() {
        return Err(StoreError::FileRequired);
    }
    let mime_type = request.mime_type.to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(StoreError::UnsupportedFileType);
    }
    if request.bytes.len() > MAX_FILE_BYTES {
        return Err(StoreError::FileTooLarge);
    }

    let _guard = state.user_guard(&request.user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let mut locker = gate::check_pin(&conn, &request.user_id, &request.pin, now)?;

    let peers = db::list_active_documents(&conn, locker.id)?;
    let peer_data: Vec<ExtractedData> = peers.iter().map(|d| d.extracted.clone()).collect();
    let mut extracted = extract::extract_document_data(
        state.ocr.as_ref(),
        &request.bytes,
        &mime_type,
        request.document_type,
    );
    extracted.merge_missing_from(&peer_data);

    let stored_name = format!(
        "{}-{}-{}-{}",
        sanitize_file_component(&request.user_id),
        now.timestamp_millis(),
        rand::thread_rng().gen_range(0..1_000_000_000u32),
        sanitize_file_component(&request.original_name),
    );
    let file_path = state.files_dir().join(stored_name);
    std::fs::write(&file_path, &request.bytes)?;

    let mut document = VaultDocument {
        id: Uuid::new_v4(),
        locker_id: locker.id,
        name: request
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| request.original_name.clone()),
        document_type: request.document_type,
        original_name: request.original_name,
        file_path: file_path.to_string_lossy().into_owned(),
        file_size: request.bytes.len() as u64,
        mime_type,
        encryption_key: generate_encryption_key(),
        extracted,
        validation: None,
        audit_trail: AuditTrail::new(),
        tags: request.tags,
        notes: request.notes,
        access_count: 0,
        last_accessed_at: None,
        is_active: true,
        uploaded_at: now,
        updated_at: now,
    };
    document.log_audit(AuditAction::Created, "Document uploaded", source_ip, now);

    if let Err(err) = db::insert_document(&conn, &document) {
        let _ = std::fs::remove_file(&file_path);
        return Err(err.into());
    }

    locker.log_access(AccessAction::UploadDocument, true, Some(document.id), now);
    locker.updated_at = now;
    db::update_locker(&conn, &locker)?;

    let mut documents = db::list_active_documents(&conn, locker.id)?;
    let document = if documents.len() > 1 {
        revalidate_all(&conn, &mut documents, now)?;
        documents
            .into_iter()
            .find(|d| d.id == document.id)
            .unwrap_or(document)
    } else {
        document
    };

    tracing::info!(
        user_id = %request.user_id,
        document_id = %document.id,
        document_type = document.document_type.as_str(),
        size = document.file_size,
        "document uploaded"
    );

    Ok(UploadedDocument {
        document_id: document.id,
        name: document.name,
        document_type: document.document_type,
        extracted: document.extracted,
        validation: document.validation,
        uploaded_at: document.uploaded_at,
    })
}

pub async fn list_documents(
    state: &VaultState,
    user_id: &str,
    pin: &str,
) -> Result<Vec<DocumentSummary>, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let mut locker = gate::check_pin(&conn, user_id, pin, now)?;

    let documents = db::list_active_documents(&conn, locker.id)?;
    locker.log_access(AccessAction::ViewDocument, true, None, now);
    locker.updated_at = now;
    db::update_locker(&conn, &locker)?;

    Ok(documents.into_iter().map(DocumentSummary::from).collect())
}

pub async fn get_document(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    document_id: Uuid,
    source_ip: Option<String>,
) -> Result<DocumentSummary, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let mut locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut document =
        db::get_document(&conn, locker.id, document_id)?.ok_or(StoreError::DocumentNotFound)?;
    document.record_access(now);
    document.log_audit(AuditAction::Viewed, "Document accessed", source_ip, now);
    document.updated_at = now;
    db::update_document(&conn, &document)?;

    locker.log_access(AccessAction::ViewDocument, true, Some(document_id), now);
    locker.updated_at = now;
    db::update_locker(&conn, &locker)?;

    Ok(document.into())
}

/// Read the stored file back for serving.
pub async fn download_document(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    document_id: Uuid,
    source_ip: Option<String>,
) -> Result<FileDownload, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut document =
        db::get_document(&conn, locker.id, document_id)?.ok_or(StoreError::DocumentNotFound)?;
    let bytes = match std::fs::read(&document.file_path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::FileMissing)
        }
        Err(err) => return Err(err.into()),
    };

    document.record_access(now);
    document.log_audit(AuditAction::Downloaded, "Document downloaded", source_ip, now);
    document.updated_at = now;
    db::update_document(&conn, &document)?;

    Ok(FileDownload {
        bytes,
        original_name: document.original_name,
        mime_type: document.mime_type,
    })
}

pub async fn update_document(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    document_id: Uuid,
    update: DocumentUpdate,
    source_ip: Option<String>,
) -> Result<DocumentSummary, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut document =
        db::get_document(&conn, locker.id, document_id)?.ok_or(StoreError::DocumentNotFound)?;
    if let Some(name) = update.name.filter(|n| !n.trim().is_empty()) {
        document.name = name;
    }
    if let Some(tags) = update.tags {
        document.tags = tags;
    }
    if let Some(notes) = update.notes {
        document.notes = Some(notes);
    }
    document.log_audit(AuditAction::Updated, "Document metadata updated", source_ip, now);
    document.updated_at = now;
    db::update_document(&conn, &document)?;

    Ok(document.into())
}

/// Soft delete: the row and its audit trail stay, the document disappears
/// from every listing.
pub async fn delete_document(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    document_id: Uuid,
    source_ip: Option<String>,
) -> Result<(), StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let mut locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut document =
        db::get_document(&conn, locker.id, document_id)?.ok_or(StoreError::DocumentNotFound)?;
    document.is_active = false;
    document.log_audit(AuditAction::Deleted, "Document deleted", source_ip, now);
    document.updated_at = now;
    db::update_document(&conn, &document)?;

    locker.log_access(AccessAction::DeleteDocument, true, Some(document_id), now);
    locker.updated_at = now;
    db::update_locker(&conn, &locker)?;

    tracing::info!(user_id, document_id = %document_id, "document deleted");
    Ok(())
}

pub async fn locker_stats(
    state: &VaultState,
    user_id: &str,
    pin: &str,
) -> Result<LockerStats, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let locker = gate::check_pin(&conn, user_id, pin, Utc::now())?;

    let documents = db::list_active_documents(&conn, locker.id)?;
    let mut document_types: BTreeMap<String, u32> = BTreeMap::new();
    let mut total_size: u64 = 0;
    let mut summary = ValidationSummary {
        fully_validated: 0,
        partially_validated: 0,
        needs_attention: 0,
    };
    for document in &documents {
        *document_types
            .entry(document.document_type.as_str().to_string())
            .or_default() += 1;
        total_size += document.file_size;
        if let Some(validation) = &document.validation {
            if validation.overall_score >= 90 {
                summary.fully_validated += 1;
            } else if validation.overall_score >= 70 {
                summary.partially_validated += 1;
            } else {
                summary.needs_attention += 1;
            }
        }
    }

    Ok(LockerStats {
        total_documents: documents.len() as u32,
        document_types,
        total_size,
        recent_activity: locker.access_log.recent(10),
        validation_summary: summary,
    })
}

/// Serve the current extraction for the manual verification screen.
pub async fn review_extraction(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    document_id: Uuid,
    source_ip: Option<String>,
) -> Result<ExtractionReview, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut document =
        db::get_document(&conn, locker.id, document_id)?.ok_or(StoreError::DocumentNotFound)?;
    document.log_audit(AuditAction::Viewed, "OCR verification accessed", source_ip, now);
    document.updated_at = now;
    db::update_document(&conn, &document)?;

    Ok(ExtractionReview {
        document_id: document.id,
        name: document.name,
        document_type: document.document_type,
        extracted: document.extracted,
    })
}

/// Replace a document's extraction with user-corrected data, mark it
/// verified, and re-score the locker against the corrected values.
pub async fn confirm_extraction(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    document_id: Uuid,
    mut corrected: ExtractedData,
    source_ip: Option<String>,
) -> Result<DocumentSummary, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut document =
        db::get_document(&conn, locker.id, document_id)?.ok_or(StoreError::DocumentNotFound)?;
    corrected.is_verified = true;
    corrected.verified_at = Some(now);
    corrected.verified_by = Some(user_id.to_string());
    document.extracted = corrected;
    document.log_audit(AuditAction::Updated, "OCR data verified and updated", source_ip, now);
    document.updated_at = now;
    db::update_document(&conn, &document)?;

    let mut documents = db::list_active_documents(&conn, locker.id)?;
    revalidate_all(&conn, &mut documents, now)?;
    let refreshed = documents
        .into_iter()
        .find(|d| d.id == document_id)
        .ok_or(StoreError::DocumentNotFound)?;

    tracing::info!(user_id, document_id = %document_id, "extraction verified");
    Ok(refreshed.into())
}

/// Aggregate personal data across the locker. The most recent document
/// carrying a field wins; addresses merge per subfield.
pub async fn profile_data(
    state: &VaultState,
    user_id: &str,
    pin: &str,
) -> Result<ProfileData, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let locker = gate::check_pin(&conn, user_id, pin, Utc::now())?;

    let documents = db::list_active_documents(&conn, locker.id)?;
    let extractions: Vec<ExtractedData> = documents.iter().map(|d| d.extracted.clone()).collect();
    let mut merged = ExtractedData::default();
    merged.merge_missing_from(&extractions);

    let mut document_numbers = BTreeMap::new();
    for extraction in &extractions {
        if let Some((kind, number)) = extraction.primary_number() {
            document_numbers
                .entry(kind.to_string())
                .or_insert_with(|| number.to_string());
        }
    }

    Ok(ProfileData {
        full_name: merged.full_name,
        date_of_birth: merged.date_of_birth,
        gender: merged.gender,
        father_name: merged.father_name,
        address: merged.address,
        document_numbers,
    })
}

/// Locker-wide consistency report; every document's stored validation is
/// refreshed as a side effect.
pub async fn cross_validate_locker(
    state: &VaultState,
    user_id: &str,
    pin: &str,
    source_ip: Option<String>,
) -> Result<CrossValidationReport, StoreError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let mut locker = gate::check_pin(&conn, user_id, pin, now)?;

    let mut documents = db::list_active_documents(&conn, locker.id)?;
    if documents.len() < 2 {
        return Err(StoreError::NotEnoughDocuments);
    }

    let extractions: Vec<ExtractedData> = documents.iter().map(|d| d.extracted.clone()).collect();
    let report = cross_validate(&extractions);

    for document in documents.iter_mut() {
        document.log_audit(
            AuditAction::Updated,
            "Cross-validation performed",
            source_ip.clone(),
            now,
        );
    }
    revalidate_all(&conn, &mut documents, now)?;

    locker.log_access(AccessAction::ViewDocument, true, None, now);
    locker.updated_at = now;
    db::update_locker(&conn, &locker)?;

    tracing::info!(user_id, overall_score = report.overall_score, "cross-validation completed");
    Ok(report)
}

/// Requirement sets are public reference data; no PIN involved.
pub fn get_requirements(
    state: &VaultState,
    service_id: &str,
) -> Result<RequirementSet, StoreError> {
    let conn = state.open_db()?;
    db::get_requirement_set(&conn, service_id)?.ok_or(StoreError::RequirementsNotFound)
}

pub fn check_requirements(
    state: &VaultState,
    service_id: &str,
    selected_documents: &[String],
) -> Result<SelectionVerdict, StoreError> {
    let set = get_requirements(state, service_id)?;
    Ok(validate_selection(&set, selected_documents))
}

// Re-score every active document against the rest of the locker.
fn revalidate_all(
    conn: &Connection,
    documents: &mut [VaultDocument],
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let extractions: Vec<ExtractedData> = documents.iter().map(|d| d.extracted.clone()).collect();
    for (index, document) in documents.iter_mut().enumerate() {
        let peers: Vec<ExtractedData> = extractions
            .iter()
            .enumerate()
            .filter_map(|(i, e)| (i != index).then(|| e.clone()))
            .collect();
        document.validation = Some(validate_document(&document.extracted, &peers, now));
        document.updated_at = now;
        db::update_document(conn, document)?;
    }
    Ok(())
}

fn sanitize_file_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn generate_encryption_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
