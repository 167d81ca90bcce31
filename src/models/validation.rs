use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ExpiryStatus;

/// Score and findings for one field checked across a locker's documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConsistency {
    pub score: u8,
    pub issues: Vec<String>,
}

impl FieldConsistency {
    /// A perfect score with nothing flagged.
    pub fn clean() -> Self {
        Self {
            score: 100,
            issues: Vec::new(),
        }
    }
}

impl Default for FieldConsistency {
    fn default() -> Self {
        Self::clean()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentValidity {
    pub is_valid: bool,
    pub expiry_status: ExpiryStatus,
    pub issues: Vec<String>,
}

impl Default for DocumentValidity {
    fn default() -> Self {
        Self {
            is_valid: true,
            expiry_status: ExpiryStatus::Valid,
            issues: Vec::new(),
        }
    }
}

/// Per-document validation snapshot, stored alongside the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResults {
    pub name_consistency: FieldConsistency,
    pub dob_consistency: FieldConsistency,
    pub address_consistency: FieldConsistency,
    pub document_validity: DocumentValidity,
    pub overall_score: u8,
    pub last_validated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrossValidationDetails {
    pub name_consistency: FieldConsistency,
    pub dob_consistency: FieldConsistency,
    pub address_consistency: FieldConsistency,
}

/// Locker-wide consistency report returned by cross-validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossValidationReport {
    pub overall_score: u8,
    pub consistent_fields: u32,
    pub inconsistent_fields: u32,
    pub validation_details: CrossValidationDetails,
    pub recommendations: Vec<String>,
}
