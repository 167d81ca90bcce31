//! Field extraction from OCR text, one parser per document family.
//!
//! Indian identity documents are bilingual, so label alternations carry the
//! Hindi forms next to the English ones. Every field is optional; whatever
//! is missed or misread here gets corrected on the verification screen.

use chrono::NaiveDate;
use regex::Regex;

use crate::models::*;

const INDIAN_STATES: [&str; 28] = [
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

/// Parse recognized text into structured fields for the given document type.
/// Types without a dedicated parser keep the raw text and confidence only.
pub fn parse_document_text(
    text: &str,
    confidence: f32,
    document_type: DocumentType,
) -> ExtractedData {
    let mut data = match document_type {
        DocumentType::AadhaarCard => parse_aadhaar(text),
        DocumentType::PanCard => parse_pan(text),
        DocumentType::VoterId => parse_voter_id(text),
        DocumentType::Passport => parse_passport(text),
        DocumentType::DrivingLicense => parse_driving_license(text),
        DocumentType::RationCard => parse_ration_card(text),
        DocumentType::IncomeCertificate => parse_income_certificate(text),
        DocumentType::BirthCertificate => parse_birth_certificate(text),
        DocumentType::DeathCertificate
        | DocumentType::CasteCertificate
        | DocumentType::CommunityCertificate
        | DocumentType::DomicileCertificate
        | DocumentType::ResidenceCertificate
        | DocumentType::MarriageCertificate
        | DocumentType::SslcCertificate
        | DocumentType::PensionCertificate => parse_generic_certificate(text),
        _ => ExtractedData::default(),
    };
    data.raw_text = text.to_string();
    data.confidence = confidence;
    data
}

fn parse_aadhaar(text: &str) -> ExtractedData {
    let aadhaar_number = Regex::new(r"\b\d{4}\s*\d{4}\s*\d{4}\b")
        .unwrap()
        .find(text)
        .map(|m| m.as_str().replace(|c: char| c.is_whitespace(), ""));

    let name_labeled =
        Regex::new(r"(?i)(?:Name[:\s]*|नाम[:\s]*)(.*?)(?:\n|Date of Birth|DOB|जन्म)").unwrap();
    let full_name = capture(&name_labeled, text).or_else(|| capture(&caps_line(), text));

    let dob_labeled =
        Regex::new(r"(?i)(?:DOB|Date of Birth|जन्म तिथि)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})")
            .unwrap();
    let date_of_birth = capture(&dob_labeled, text)
        .and_then(|s| parse_date(&s))
        .or_else(|| parse_date(text));

    let gender_re = Regex::new(r"(?i)(?:Gender|लिंग)[:\s]*(Male|Female|पुरुष|महिला)").unwrap();
    let gender = capture(&gender_re, text).map(|g| normalize_gender(&g));

    let father_re = Regex::new(r"(?i)(?:Father|पिता)[:\s]*(.*?)(?:\n|Address|पता)").unwrap();
    let father_name = capture(&father_re, text);

    let address_re = Regex::new(r"(?is)(?:Address|पता)[:\s]*(.*?)(?:\n.*?PIN|$)").unwrap();
    let mut address = capture(&address_re, text).map(|block| parse_address(&block));

    let pin_labeled = Regex::new(r"(?i)PIN[:\s]*(\d{6})").unwrap();
    let pin_bare = Regex::new(r"(\d{6})").unwrap();
    if let Some(pin) = capture(&pin_labeled, text).or_else(|| capture(&pin_bare, text)) {
        let addr = address.get_or_insert_with(Address::default);
        if addr.pincode.is_empty() {
            addr.pincode = pin;
        }
    }

    let mobile_re = Regex::new(r"(?i)(?:Mobile|Mob)[:\s]*(\d{10})").unwrap();
    let mobile_number = capture(&mobile_re, text);

    ExtractedData {
        full_name,
        date_of_birth,
        gender,
        father_name,
        address,
        fields: TypeFields::Aadhaar {
            aadhaar_number,
            mobile_number,
        },
        ..Default::default()
    }
}

fn parse_pan(text: &str) -> ExtractedData {
    // PAN format is five letters, four digits, one letter; case-sensitive on
    // purpose so lowercase OCR noise does not pass for a number.
    let pan_number = capture(&Regex::new(r"([A-Z]{5}\d{4}[A-Z])").unwrap(), text);

    let name_re = Regex::new(r"(?i)Name[:\s]*(.*?)(?:\n|Father)").unwrap();
    let full_name = capture(&name_re, text).or_else(|| capture(&caps_line(), text));

    let father_re = Regex::new(r"(?i)Father['\s]*s?\s*Name[:\s]*(.*?)(?:\n|Date)").unwrap();
    let father_name = capture(&father_re, text);

    ExtractedData {
        full_name,
        father_name,
        date_of_birth: parse_date(text),
        fields: TypeFields::Pan {
            pan_number,
            has_signature: Regex::new(r"(?i)Signature").unwrap().is_match(text),
            has_photo: Regex::new(r"(?i)Photo").unwrap().is_match(text),
        },
        ..Default::default()
    }
}

fn parse_voter_id(text: &str) -> ExtractedData {
    let voter_id_number = capture(&Regex::new(r"([A-Z]{3}\d{7})").unwrap(), text);

    let name_re = Regex::new(r"(?i)Name[:\s]*(.*?)(?:\n|Father|Husband)").unwrap();
    let relation_re = Regex::new(r"(?i)(?:Father|Husband)[:\s]*(.*?)(?:\n|Age|DOB)").unwrap();
    let age_re = Regex::new(r"(?i)Age[:\s]*(\d+)").unwrap();

    ExtractedData {
        full_name: capture(&name_re, text),
        father_name: capture(&relation_re, text),
        fields: TypeFields::VoterId {
            voter_id_number,
            age: capture(&age_re, text).and_then(|a| a.parse().ok()),
        },
        ..Default::default()
    }
}

fn parse_passport(text: &str) -> ExtractedData {
    let number_re = Regex::new(r"(?i)(?:Passport\s*(?:No|Number|#)?[:\s]*)?([A-Z]\d{7,8})").unwrap();
    let passport_number = capture(&number_re, text).map(|n| n.to_uppercase());

    let name_re = Regex::new(r"(?i)(?:Name|Given\s*Names?)[:\s]*([A-Z\s]+)").unwrap();
    let full_name = capture(&name_re, text);

    let dob_re = Regex::new(
        r"(?i)(?:Date\s*of\s*Birth|DOB|Birth)[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
    )
    .unwrap();
    let issue_re = Regex::new(
        r"(?i)(?:Date\s*of\s*Issue|Issue\s*Date)[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
    )
    .unwrap();
    let expiry_re = Regex::new(
        r"(?i)(?:Date\s*of\s*Expiry|Expiry\s*Date|Valid\s*Until)[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
    )
    .unwrap();

    let birth_place_re = Regex::new(r"(?i)Place\s*of\s*Birth[:\s]*([A-Z\s,]+)").unwrap();
    let address = capture(&birth_place_re, text).map(|city| Address {
        city,
        ..Address::default()
    });

    let issue_place_re = Regex::new(r"(?i)Place\s*of\s*Issue[:\s]*([A-Z\s]+)").unwrap();

    ExtractedData {
        full_name,
        date_of_birth: capture(&dob_re, text).and_then(|s| parse_date(&s)),
        address,
        fields: TypeFields::Passport {
            passport_number,
            issue_date: capture(&issue_re, text).and_then(|s| parse_date(&s)),
            expiry_date: capture(&expiry_re, text).and_then(|s| parse_date(&s)),
            issuing_authority: capture(&issue_place_re, text),
        },
        ..Default::default()
    }
}

fn parse_driving_license(text: &str) -> ExtractedData {
    let number_re = Regex::new(r"(?i)(?:DL No|License No)[:\s]*([A-Z0-9\-/]+)").unwrap();
    let name_re = Regex::new(r"(?i)Name[:\s]*(.*?)(?:\n|DOB|Date)").unwrap();
    let dob_re = Regex::new(
        r"(?i)(?:DOB|Date of Birth)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
    )
    .unwrap();
    let issue_re = Regex::new(
        r"(?i)(?:Issue Date|Issued)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
    )
    .unwrap();
    let expiry_re = Regex::new(
        r"(?i)(?:Valid Till|Valid Upto)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
    )
    .unwrap();

    ExtractedData {
        full_name: capture(&name_re, text),
        date_of_birth: capture(&dob_re, text).and_then(|s| parse_date(&s)),
        fields: TypeFields::DrivingLicense {
            license_number: capture(&number_re, text),
            issue_date: capture(&issue_re, text).and_then(|s| parse_date(&s)),
            expiry_date: capture(&expiry_re, text).and_then(|s| parse_date(&s)),
        },
        ..Default::default()
    }
}

fn parse_ration_card(text: &str) -> ExtractedData {
    let number_re = Regex::new(r"(?i)(?:Card No|कार्ड संख्या)[:\s]*([A-Z0-9]+)").unwrap();
    let head_re = Regex::new(r"(?i)(?:Head of Family|मुखिया)[:\s]*(.*?)(?:\n|Father)").unwrap();

    ExtractedData {
        full_name: capture(&head_re, text),
        fields: TypeFields::RationCard {
            ration_card_number: capture(&number_re, text),
        },
        ..Default::default()
    }
}

fn parse_income_certificate(text: &str) -> ExtractedData {
    let cert_re =
        Regex::new(r"(?i)(?:Certificate No|प्रमाण पत्र संख्या)[:\s]*([A-Z0-9/\-]+)").unwrap();
    let name_re = Regex::new(r"(?i)(?:Name|नाम)[:\s]*(.*?)(?:\n|Father|Son|Daughter)").unwrap();
    let father_re =
        Regex::new(r"(?i)(?:Father|Son of|Daughter of|पिता)[:\s]*(.*?)(?:\n|Resident|Income)")
            .unwrap();
    let income_re =
        Regex::new(r"(?i)(?:Income|आय)[:\s]*(?:Rs\.?|₹)?\s*(\d+(?:,\d+)*)").unwrap();
    let issue_re =
        Regex::new(r"(?i)(?:Issued on|Date)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})").unwrap();
    let expiry_re =
        Regex::new(r"(?i)(?:Valid till|Valid up to)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})")
            .unwrap();
    let authority_re = Regex::new(r"(?i)(?:Issued by|Authority)[:\s]*(.*?)(?:\n|Date)").unwrap();
    let address_re = Regex::new(r"(?is)(?:Resident of|Address)[:\s]*(.*?)(?:\n.*?Income|$)").unwrap();

    let annual_income = capture(&income_re, text).and_then(|raw| raw.replace(',', "").parse().ok());

    ExtractedData {
        full_name: capture(&name_re, text),
        father_name: capture(&father_re, text),
        address: capture(&address_re, text).map(|block| parse_address(&block)),
        fields: TypeFields::IncomeCertificate {
            certificate_number: capture(&cert_re, text),
            annual_income,
            issue_date: capture(&issue_re, text).and_then(|s| parse_date(&s)),
            expiry_date: capture(&expiry_re, text).and_then(|s| parse_date(&s)),
            issuing_authority: capture(&authority_re, text),
        },
        ..Default::default()
    }
}

fn parse_birth_certificate(text: &str) -> ExtractedData {
    let cert_re = Regex::new(
        r"(?i)(?:Certificate\s*(?:No|Number|#)?|Registration\s*(?:No|Number))[:\s]*([A-Z0-9/\-]+)",
    )
    .unwrap();
    let child_re =
        Regex::new(r"(?i)(?:Name\s*of\s*(?:Child|Baby)|Child'?s?\s*Name)[:\s]*([A-Z\s]+)").unwrap();
    let dob_re = Regex::new(
        r"(?i)(?:Date\s*of\s*Birth|DOB|Born\s*on)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
    )
    .unwrap();
    let father_re = Regex::new(r"(?i)Father'?s?\s*Name[:\s]*([A-Z\s]+)").unwrap();
    let mother_re = Regex::new(r"(?i)Mother'?s?\s*Name[:\s]*([A-Z\s]+)").unwrap();
    let place_re = Regex::new(r"(?i)Place\s*of\s*Birth[:\s]*([A-Z\s,]+)").unwrap();
    let issue_re = Regex::new(
        r"(?i)(?:Date\s*of\s*Issue|Issue\s*Date|Issued\s*on)[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})",
    )
    .unwrap();
    let authority_re = Regex::new(r"(?i)(?:Registrar|Issued\s*by)[:\s]*([A-Z\s]+)").unwrap();

    ExtractedData {
        full_name: capture(&child_re, text),
        father_name: capture(&father_re, text),
        date_of_birth: capture(&dob_re, text).and_then(|s| parse_date(&s)),
        address: capture(&place_re, text).map(|city| Address {
            city,
            ..Address::default()
        }),
        fields: TypeFields::BirthCertificate {
            certificate_number: capture(&cert_re, text),
            mother_name: capture(&mother_re, text),
            issue_date: capture(&issue_re, text).and_then(|s| parse_date(&s)),
            issuing_authority: capture(&authority_re, text),
        },
        ..Default::default()
    }
}

/// Caste, community, domicile and the other free-form state certificates
/// share one loose layout.
fn parse_generic_certificate(text: &str) -> ExtractedData {
    let name_re = Regex::new(r"(?i)Name[:\s]*([A-Z][A-Za-z\s]+)").unwrap();
    let date_re = Regex::new(r"(?i)Date[:\s]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})").unwrap();
    let number_re = Regex::new(r"(?i)(?:Number|No|ID|#)[:\s]*([A-Z0-9/\-]+)").unwrap();

    ExtractedData {
        full_name: capture(&name_re, text),
        date_of_birth: capture(&date_re, text).and_then(|s| parse_date(&s)),
        fields: TypeFields::Certificate {
            certificate_number: capture(&number_re, text),
        },
        ..Default::default()
    }
}

/// Split a free-text address block into the structured form. State names are
/// matched against the Indian state list; pincode is any six-digit group.
pub(crate) fn parse_address(block: &str) -> Address {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());
    let line1 = lines.next().unwrap_or("").to_string();
    let line2 = lines.next().unwrap_or("").to_string();

    let city_re = Regex::new(r"(?i)(?:City|District)[:\s]*([A-Za-z\s]+)").unwrap();
    let city = capture(&city_re, block).unwrap_or_default();

    let lowered = block.to_lowercase();
    let state = INDIAN_STATES
        .iter()
        .find(|s| lowered.contains(&s.to_lowercase()))
        .map(|s| s.to_string())
        .unwrap_or_default();

    let pincode = capture(&Regex::new(r"\b(\d{6})\b").unwrap(), block).unwrap_or_default();

    Address {
        line1,
        line2,
        city,
        state,
        pincode,
        country: "India".to_string(),
    }
}

/// Dates on Indian documents are day-first; year-first is accepted as a
/// fallback. Two-digit years and impossible dates come back as `None`.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let dmy = Regex::new(r"(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})").unwrap();
    if let Some(c) = dmy.captures(text) {
        let day = c[1].parse().ok()?;
        let month = c[2].parse().ok()?;
        let year = c[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let ymd = Regex::new(r"(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})").unwrap();
    if let Some(c) = ymd.captures(text) {
        let year = c[1].parse().ok()?;
        let month = c[2].parse().ok()?;
        let day = c[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

// Fallback for cards that print the holder's name as a bare uppercase line.
fn caps_line() -> Regex {
    Regex::new(r"(?m)^([A-Z\s]+)$").unwrap()
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn normalize_gender(token: &str) -> String {
    if token.eq_ignore_ascii_case("male") || token == "पुरुष" {
        "Male".to_string()
    } else {
        "Female".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aadhaar_extracts_core_fields() {
        let text = "Name: Ravi Kumar\nDOB: 15/08/1990\nGender: Male\n1234 5678 9012\nAddress: 12 MG Road Bangalore Karnataka 560001\nPIN: 560001";
        let data = parse_document_text(text, 88.0, DocumentType::AadhaarCard);

        assert_eq!(data.full_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(data.gender.as_deref(), Some("Male"));
        let TypeFields::Aadhaar { aadhaar_number, mobile_number } = &data.fields else {
            panic!("expected aadhaar fields");
        };
        assert_eq!(aadhaar_number.as_deref(), Some("123456789012"));
        assert!(mobile_number.is_none());
        let address = data.address.unwrap();
        assert_eq!(address.state, "Karnataka");
        assert_eq!(address.pincode, "560001");
        assert_eq!(address.country, "India");
        assert_eq!(data.raw_text, text);
        assert_eq!(data.confidence, 88.0);
    }

    #[test]
    fn aadhaar_pin_fallback_without_address_block() {
        let text = "नाम Ravi Kumar\nजन्म तिथि 15/08/1990\nMobile: 9876543210\nPIN: 560002";
        let data = parse_document_text(text, 50.0, DocumentType::AadhaarCard);

        let address = data.address.unwrap();
        assert_eq!(address.pincode, "560002");
        assert!(address.state.is_empty());
        let TypeFields::Aadhaar { mobile_number, .. } = &data.fields else {
            panic!("expected aadhaar fields");
        };
        assert_eq!(mobile_number.as_deref(), Some("9876543210"));
    }

    #[test]
    fn pan_extracts_number_and_flags() {
        let text = "Income Tax Department\nName: SURESH BABU\nFather's Name: RAMESH BABU\nDate of Birth: 02/01/1975\nABCDE1234F\nSignature";
        let data = parse_document_text(text, 90.0, DocumentType::PanCard);

        assert_eq!(data.full_name.as_deref(), Some("SURESH BABU"));
        assert_eq!(data.father_name.as_deref(), Some("RAMESH BABU"));
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(1975, 1, 2));
        let TypeFields::Pan { pan_number, has_signature, has_photo } = &data.fields else {
            panic!("expected pan fields");
        };
        assert_eq!(pan_number.as_deref(), Some("ABCDE1234F"));
        assert!(has_signature);
        assert!(!has_photo);
    }

    #[test]
    fn pan_number_is_case_sensitive() {
        let data = parse_document_text("abcde1234f", 30.0, DocumentType::PanCard);
        let TypeFields::Pan { pan_number, .. } = &data.fields else {
            panic!("expected pan fields");
        };
        assert!(pan_number.is_none());
    }

    #[test]
    fn voter_id_reads_relation_and_age() {
        let text = "ELECTION COMMISSION OF INDIA\nName: Meena Devi\nHusband: Raj Kumar\nAge: 34\nABC1234567";
        let data = parse_document_text(text, 80.0, DocumentType::VoterId);

        assert_eq!(data.full_name.as_deref(), Some("Meena Devi"));
        assert_eq!(data.father_name.as_deref(), Some("Raj Kumar"));
        let TypeFields::VoterId { voter_id_number, age } = &data.fields else {
            panic!("expected voter id fields");
        };
        assert_eq!(voter_id_number.as_deref(), Some("ABC1234567"));
        assert_eq!(*age, Some(34));
    }

    #[test]
    fn passport_reads_dates_and_places() {
        let text = "REPUBLIC OF INDIA भारत गणराज्य\nPassport No: A1234567\nDate of Birth: 10/03/1985\nDate of Issue: 05/06/2018\nDate of Expiry: 04/06/2028\nPlace of Birth: NEW DELHI जन्म स्थान\nPlace of Issue: DELHI भारत\nGiven Names: ANITA SHARMA";
        let data = parse_document_text(text, 85.0, DocumentType::Passport);

        assert_eq!(data.full_name.as_deref(), Some("ANITA SHARMA"));
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(1985, 3, 10));
        assert_eq!(data.address.as_ref().unwrap().city, "NEW DELHI");
        let TypeFields::Passport {
            passport_number,
            issue_date,
            expiry_date,
            issuing_authority,
        } = &data.fields
        else {
            panic!("expected passport fields");
        };
        assert_eq!(passport_number.as_deref(), Some("A1234567"));
        assert_eq!(*issue_date, NaiveDate::from_ymd_opt(2018, 6, 5));
        assert_eq!(*expiry_date, NaiveDate::from_ymd_opt(2028, 6, 4));
        assert_eq!(issuing_authority.as_deref(), Some("DELHI"));
        assert_eq!(data.expiry_date(), NaiveDate::from_ymd_opt(2028, 6, 4));
    }

    #[test]
    fn driving_license_reads_validity_window() {
        let text = "DL No: KA0120230001234\nName: Ravi Kumar\nDOB: 15/08/1990\nIssue Date: 01/01/2020\nValid Till: 31/12/2039";
        let data = parse_document_text(text, 80.0, DocumentType::DrivingLicense);

        assert_eq!(data.full_name.as_deref(), Some("Ravi Kumar"));
        let TypeFields::DrivingLicense { license_number, issue_date, expiry_date } = &data.fields
        else {
            panic!("expected driving license fields");
        };
        assert_eq!(license_number.as_deref(), Some("KA0120230001234"));
        assert_eq!(*issue_date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(*expiry_date, NaiveDate::from_ymd_opt(2039, 12, 31));
    }

    #[test]
    fn ration_card_reads_head_of_family() {
        let text = "Card No: KA1234567890\nHead of Family: Lakshmi Devi\nMembers: 4";
        let data = parse_document_text(text, 70.0, DocumentType::RationCard);

        assert_eq!(data.full_name.as_deref(), Some("Lakshmi Devi"));
        let TypeFields::RationCard { ration_card_number } = &data.fields else {
            panic!("expected ration card fields");
        };
        assert_eq!(ration_card_number.as_deref(), Some("KA1234567890"));
    }

    #[test]
    fn income_certificate_parses_amount_with_commas() {
        let text = "Certificate No: IC/2024/1234\nName: Ravi Kumar\nFather: Suresh Kumar\nAnnual Income: Rs. 1,20,000\nIssued by: Tahsildar Bangalore North\nIssued on: 01/04/2024\nValid till: 31/03/2025";
        let data = parse_document_text(text, 82.0, DocumentType::IncomeCertificate);

        assert_eq!(data.full_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(data.father_name.as_deref(), Some("Suresh Kumar"));
        let TypeFields::IncomeCertificate {
            certificate_number,
            annual_income,
            issue_date,
            expiry_date,
            issuing_authority,
        } = &data.fields
        else {
            panic!("expected income certificate fields");
        };
        assert_eq!(certificate_number.as_deref(), Some("IC/2024/1234"));
        assert_eq!(*annual_income, Some(120_000));
        assert_eq!(*issue_date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(*expiry_date, NaiveDate::from_ymd_opt(2025, 3, 31));
        assert_eq!(issuing_authority.as_deref(), Some("Tahsildar Bangalore North"));
    }

    #[test]
    fn birth_certificate_reads_both_parents() {
        let text = "जन्म प्रमाण पत्र\nCertificate No: BC/2020/555\nName of Child: ARJUN RAO जन्म\nDate of Birth: 05/05/2020\nFather's Name: KIRAN RAO पिता\nMother's Name: DEEPA RAO माता\nPlace of Birth: MYSORE कर्नाटक\nDate of Issue: 10/05/2020\nIssued by: REGISTRAR MYSORE";
        let data = parse_document_text(text, 75.0, DocumentType::BirthCertificate);

        assert_eq!(data.full_name.as_deref(), Some("ARJUN RAO"));
        assert_eq!(data.father_name.as_deref(), Some("KIRAN RAO"));
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(2020, 5, 5));
        assert_eq!(data.address.unwrap().city, "MYSORE");
        let TypeFields::BirthCertificate {
            certificate_number,
            mother_name,
            issue_date,
            issuing_authority,
        } = &data.fields
        else {
            panic!("expected birth certificate fields");
        };
        assert_eq!(certificate_number.as_deref(), Some("BC/2020/555"));
        assert_eq!(mother_name.as_deref(), Some("DEEPA RAO"));
        assert_eq!(*issue_date, NaiveDate::from_ymd_opt(2020, 5, 10));
        assert_eq!(issuing_authority.as_deref(), Some("REGISTRAR MYSORE"));
    }

    #[test]
    fn generic_certificate_reads_common_fields() {
        let text = "जाति प्रमाण पत्र\nCertificate ID: CC/2023/99\nDate: 12/06/2023\nName: Ravi Kumar";
        let data = parse_document_text(text, 60.0, DocumentType::CasteCertificate);

        assert_eq!(data.full_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(data.date_of_birth, NaiveDate::from_ymd_opt(2023, 6, 12));
        let TypeFields::Certificate { certificate_number } = &data.fields else {
            panic!("expected certificate fields");
        };
        assert_eq!(certificate_number.as_deref(), Some("CC/2023/99"));
    }

    #[test]
    fn unparsed_types_keep_raw_text_only() {
        let data = parse_document_text("Basic pay 45000", 40.0, DocumentType::SalarySlip);
        assert_eq!(data.fields, TypeFields::Other);
        assert!(data.full_name.is_none());
        assert_eq!(data.raw_text, "Basic pay 45000");
        assert_eq!(data.confidence, 40.0);
    }

    #[test]
    fn address_block_is_structured() {
        let address = parse_address("12 MG Road\nIndiranagar\nDistrict: Bangalore Urban\n560038 Karnataka");
        assert_eq!(address.line1, "12 MG Road");
        assert_eq!(address.line2, "Indiranagar");
        assert_eq!(address.city, "Bangalore Urban");
        assert_eq!(address.state, "Karnataka");
        assert_eq!(address.pincode, "560038");
        assert_eq!(address.country, "India");
    }

    #[test]
    fn date_parsing_rules() {
        assert_eq!(parse_date("15/08/1990"), NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(parse_date("5-1-2001"), NaiveDate::from_ymd_opt(2001, 1, 5));
        assert_eq!(parse_date("1990-08-15"), NaiveDate::from_ymd_opt(1990, 8, 15));
        assert_eq!(parse_date("31/02/2001"), None);
        assert_eq!(parse_date("15/08/90"), None);
        assert_eq!(parse_date("no date here"), None);
    }

    #[test]
    fn hindi_gender_tokens_are_mapped() {
        let male = parse_document_text("लिंग पुरुष", 50.0, DocumentType::AadhaarCard);
        assert_eq!(male.gender.as_deref(), Some("Male"));
        let female = parse_document_text("Gender: Female", 50.0, DocumentType::AadhaarCard);
        assert_eq!(female.gender.as_deref(), Some("Female"));
    }
}
