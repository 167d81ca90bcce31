use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::DocumentCategory;

/// Document priority, stored as 1, 2, or 3 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Priority {
    /// The label used in user-facing shortfall messages.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "high priority",
            Priority::Medium => "medium priority",
            Priority::Low => "low priority",
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        priority as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            _ => Err(format!("priority must be 1, 2, or 3, got {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeDocument {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredDocument {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: DocumentCategory,
    #[serde(default = "default_required")]
    pub is_required: bool,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub alternatives: Vec<AlternativeDocument>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub validity_period: Option<String>,
    #[serde(default)]
    pub acceptable_formats: Vec<String>,
}

fn default_required() -> bool {
    true
}

fn default_priority() -> Priority {
    Priority::High
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRequirement {
    pub category: DocumentCategory,
    pub minimum_required: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityRequirement {
    pub priority: Priority,
    pub minimum_required: u32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    pub total_required: u32,
    pub minimum_threshold: u32,
    #[serde(default)]
    pub category_requirements: Vec<CategoryRequirement>,
    #[serde(default)]
    pub priority_requirements: Vec<PriorityRequirement>,
}

/// Which documents a government service asks the applicant to bring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    pub service_id: String,
    pub documents: Vec<RequiredDocument>,
    pub validation_rules: ValidationRules,
    pub instructions: String,
    pub staff_instructions: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_INSTRUCTIONS: &str =
    "Please review the document requirements and select which documents you currently have.";
pub const DEFAULT_STAFF_INSTRUCTIONS: &str =
    "Review user document selection and verify availability during appointment.";
