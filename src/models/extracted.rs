use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Postal address assembled from OCR text. Empty strings mean the field was
/// not found; `country` defaults to India for parsed addresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.line1.is_empty()
            && self.line2.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.pincode.is_empty()
            && self.country.is_empty()
    }
}

/// Fields specific to one document type, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeFields {
    Aadhaar {
        aadhaar_number: Option<String>,
        mobile_number: Option<String>,
    },
    Pan {
        pan_number: Option<String>,
        has_signature: bool,
        has_photo: bool,
    },
    VoterId {
        voter_id_number: Option<String>,
        age: Option<u32>,
    },
    Passport {
        passport_number: Option<String>,
        issue_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
        issuing_authority: Option<String>,
    },
    DrivingLicense {
        license_number: Option<String>,
        issue_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
    },
    RationCard {
        ration_card_number: Option<String>,
    },
    IncomeCertificate {
        certificate_number: Option<String>,
        annual_income: Option<u64>,
        issue_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
        issuing_authority: Option<String>,
    },
    BirthCertificate {
        certificate_number: Option<String>,
        mother_name: Option<String>,
        issue_date: Option<NaiveDate>,
        issuing_authority: Option<String>,
    },
    Certificate {
        certificate_number: Option<String>,
    },
    Other,
}

impl Default for TypeFields {
    fn default() -> Self {
        TypeFields::Other
    }
}

/// Structured data pulled from one document, plus the raw OCR text it came
/// from. Common fields are shared across types; `fields` carries the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub fields: TypeFields,
    #[serde(default)]
    pub raw_text: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified_by: Option<String>,
}

impl ExtractedData {
    /// Expiry date for types that carry one.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        match &self.fields {
            TypeFields::Passport { expiry_date, .. }
            | TypeFields::DrivingLicense { expiry_date, .. }
            | TypeFields::IncomeCertificate { expiry_date, .. } => *expiry_date,
            _ => None,
        }
    }

    /// The identifying number this document carries, labelled by field name.
    pub fn primary_number(&self) -> Option<(&'static str, &str)> {
        match &self.fields {
            TypeFields::Aadhaar {
                aadhaar_number: Some(n),
                ..
            } => Some(("aadhaar_number", n.as_str())),
            TypeFields::Pan {
                pan_number: Some(n),
                ..
            } => Some(("pan_number", n.as_str())),
            TypeFields::VoterId {
                voter_id_number: Some(n),
                ..
            } => Some(("voter_id_number", n.as_str())),
            TypeFields::Passport {
                passport_number: Some(n),
                ..
            } => Some(("passport_number", n.as_str())),
            TypeFields::DrivingLicense {
                license_number: Some(n),
                ..
            } => Some(("license_number", n.as_str())),
            TypeFields::RationCard {
                ration_card_number: Some(n),
            } => Some(("ration_card_number", n.as_str())),
            TypeFields::IncomeCertificate {
                certificate_number: Some(n),
                ..
            } => Some(("certificate_number", n.as_str())),
            TypeFields::BirthCertificate {
                certificate_number: Some(n),
                ..
            } => Some(("certificate_number", n.as_str())),
            TypeFields::Certificate {
                certificate_number: Some(n),
            } => Some(("certificate_number", n.as_str())),
            _ => None,
        }
    }

    /// Fill empty common fields from peer documents, first non-empty value
    /// wins. Existing values are never overwritten; addresses merge per
    /// subfield.
    pub fn merge_missing_from(&mut self, peers: &[ExtractedData]) {
        for peer in peers {
            fill_string(&mut self.full_name, &peer.full_name);
            fill_string(&mut self.gender, &peer.gender);
            fill_string(&mut self.father_name, &peer.father_name);
            if self.date_of_birth.is_none() {
                self.date_of_birth = peer.date_of_birth;
            }
            if let Some(peer_addr) = &peer.address {
                let addr = self.address.get_or_insert_with(Address::default);
                if addr.line1.is_empty() {
                    addr.line1 = peer_addr.line1.clone();
                }
                if addr.line2.is_empty() {
                    addr.line2 = peer_addr.line2.clone();
                }
                if addr.city.is_empty() {
                    addr.city = peer_addr.city.clone();
                }
                if addr.state.is_empty() {
                    addr.state = peer_addr.state.clone();
                }
                if addr.pincode.is_empty() {
                    addr.pincode = peer_addr.pincode.clone();
                }
                if addr.country.is_empty() {
                    addr.country = peer_addr.country.clone();
                }
            }
        }
    }
}

fn fill_string(dst: &mut Option<String>, src: &Option<String>) {
    let missing = dst.as_deref().map_or(true, str::is_empty);
    if missing {
        if let Some(value) = src.as_deref().filter(|s| !s.is_empty()) {
            *dst = Some(value.to_string());
        }
    }
}
