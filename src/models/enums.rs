use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same snake_case strings as the SQLite columns.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DocumentType {
    AadhaarCard => "aadhaar_card",
    PanCard => "pan_card",
    VoterId => "voter_id",
    RationCard => "ration_card",
    BirthCertificate => "birth_certificate",
    DeathCertificate => "death_certificate",
    IncomeCertificate => "income_certificate",
    CasteCertificate => "caste_certificate",
    CommunityCertificate => "community_certificate",
    DomicileCertificate => "domicile_certificate",
    ResidenceCertificate => "residence_certificate",
    MarriageCertificate => "marriage_certificate",
    DrivingLicense => "driving_license",
    SslcCertificate => "sslc_certificate",
    PensionCertificate => "pension_certificate",
    Passport => "passport",
    BankPassbook => "bank_passbook",
    SalarySlip => "salary_slip",
    PropertyDocument => "property_document",
    EducationalCertificate => "educational_certificate",
    MedicalCertificate => "medical_certificate",
    Other => "other",
});

str_enum!(AccessAction {
    Unlock => "unlock",
    Lock => "lock",
    ViewDocument => "view_document",
    UploadDocument => "upload_document",
    DeleteDocument => "delete_document",
    FailedAttempt => "failed_attempt",
});

str_enum!(AuditAction {
    Created => "created",
    Viewed => "viewed",
    Updated => "updated",
    Shared => "shared",
    Downloaded => "downloaded",
    Deleted => "deleted",
});

str_enum!(ExpiryStatus {
    Valid => "valid",
    ExpiringSoon => "expiring_soon",
    Expired => "expired",
    Unknown => "unknown",
});

str_enum!(DocumentCategory {
    Identity => "identity",
    Address => "address",
    Income => "income",
    Educational => "educational",
    Medical => "medical",
    Other => "other",
});
