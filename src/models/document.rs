use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bounded_log::BoundedLog;
use super::enums::{AuditAction, DocumentType};
use super::extracted::ExtractedData;
use super::validation::ValidationResults;

/// Newest audit trail entries kept per document.
pub const AUDIT_TRAIL_CAP: usize = 50;

pub type AuditTrail = BoundedLog<AuditEntry, AUDIT_TRAIL_CAP>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: AuditAction,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_ip: Option<String>,
}

/// A document held in a locker. Deletion is a soft flag so the audit trail
/// survives; `encryption_key` is generated at upload and reserved for
/// at-rest encryption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultDocument {
    pub id: Uuid,
    pub locker_id: Uuid,
    pub name: String,
    pub document_type: DocumentType,
    pub original_name: String,
    pub file_path: String,
    pub file_size: u64,
    pub mime_type: String,
    pub encryption_key: String,
    pub extracted: ExtractedData,
    pub validation: Option<ValidationResults>,
    pub audit_trail: AuditTrail,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub access_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VaultDocument {
    pub fn log_audit(
        &mut self,
        action: AuditAction,
        details: impl Into<String>,
        source_ip: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.audit_trail.push(AuditEntry {
            action,
            timestamp: now,
            details: details.into(),
            source_ip,
        });
    }

    pub fn record_access(&mut self, now: DateTime<Utc>) {
        self.access_count += 1;
        self.last_accessed_at = Some(now);
    }
}

/// List view of a document: everything except the storage path and the
/// encryption key.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: Uuid,
    pub locker_id: Uuid,
    pub name: String,
    pub document_type: DocumentType,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub extracted: ExtractedData,
    pub validation: Option<ValidationResults>,
    pub audit_trail: AuditTrail,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub access_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VaultDocument> for DocumentSummary {
    fn from(doc: VaultDocument) -> Self {
        Self {
            id: doc.id,
            locker_id: doc.locker_id,
            name: doc.name,
            document_type: doc.document_type,
            original_name: doc.original_name,
            file_size: doc.file_size,
            mime_type: doc.mime_type,
            extracted: doc.extracted,
            validation: doc.validation,
            audit_trail: doc.audit_trail,
            tags: doc.tags,
            notes: doc.notes,
            access_count: doc.access_count,
            last_accessed_at: doc.last_accessed_at,
            is_active: doc.is_active,
            uploaded_at: doc.uploaded_at,
            updated_at: doc.updated_at,
        }
    }
}
