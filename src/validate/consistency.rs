//! Cross-document consistency scoring and expiry checks.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::models::*;

const MSECS_PER_DAY: f64 = 86_400_000.0;

/// Whole days until the expiry date, rounded up; negative once it has passed.
pub(crate) fn days_until_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry_at = expiry.and_time(NaiveTime::MIN).and_utc();
    let millis = (expiry_at - now).num_milliseconds();
    (millis as f64 / MSECS_PER_DAY).ceil() as i64
}

/// Expiry check for one document. Types without an expiry date report
/// `unknown` and stay valid.
pub fn check_validity(data: &ExtractedData, now: DateTime<Utc>) -> DocumentValidity {
    let Some(expiry) = data.expiry_date() else {
        return DocumentValidity {
            is_valid: true,
            expiry_status: ExpiryStatus::Unknown,
            issues: Vec::new(),
        };
    };

    let days = days_until_expiry(expiry, now);
    if days < 0 {
        DocumentValidity {
            is_valid: false,
            expiry_status: ExpiryStatus::Expired,
            issues: vec!["Document has expired".to_string()],
        }
    } else if days <= 30 {
        DocumentValidity {
            is_valid: true,
            expiry_status: ExpiryStatus::ExpiringSoon,
            issues: vec![format!("Document expires in {days} days")],
        }
    } else {
        DocumentValidity::default()
    }
}

/// Validate one document against its locker peers. Field comparisons are
/// trimmed and lowercased; blank values are skipped.
pub fn validate_document(
    data: &ExtractedData,
    peers: &[ExtractedData],
    now: DateTime<Utc>,
) -> ValidationResults {
    let mut name_consistency = FieldConsistency::clean();
    let names = collect_strings(data, peers, |d| d.full_name.as_deref());
    if distinct_normalized(&names).len() > 1 {
        name_consistency.score = 60;
        name_consistency
            .issues
            .push("Name variations found across documents".to_string());
    }

    let mut dob_consistency = FieldConsistency::clean();
    let dobs: Vec<NaiveDate> = std::iter::once(data)
        .chain(peers.iter())
        .filter_map(|d| d.date_of_birth)
        .collect();
    if distinct_dates(&dobs).len() > 1 {
        dob_consistency.score = 50;
        dob_consistency
            .issues
            .push("Date of birth variations found across documents".to_string());
    }

    let mut address_consistency = FieldConsistency::clean();
    let pincodes = collect_strings(data, peers, |d| d.address.as_ref().map(|a| a.pincode.as_str()));
    if distinct_normalized(&pincodes).len() > 1 {
        address_consistency.score = 70;
        address_consistency
            .issues
            .push("Multiple PIN codes found across documents".to_string());
    }
    let states = collect_strings(data, peers, |d| d.address.as_ref().map(|a| a.state.as_str()));
    if distinct_normalized(&states).len() > 1 {
        address_consistency.score = address_consistency.score.min(60);
        address_consistency
            .issues
            .push("Multiple states found across documents".to_string());
    }

    let document_validity = check_validity(data, now);
    let validity_score: f64 = if document_validity.is_valid { 100.0 } else { 50.0 };
    let overall_score = ((name_consistency.score as f64
        + dob_consistency.score as f64
        + address_consistency.score as f64
        + validity_score)
        / 4.0)
        .round() as u8;

    ValidationResults {
        name_consistency,
        dob_consistency,
        address_consistency,
        document_validity,
        overall_score,
        last_validated: now,
    }
}

/// Locker-wide consistency report. A field is only counted, consistent or
/// not, when at least two documents supplied a value for it.
pub fn cross_validate(extractions: &[ExtractedData]) -> CrossValidationReport {
    let mut details = CrossValidationDetails::default();
    let mut consistent_fields: u32 = 0;
    let mut inconsistent_fields: u32 = 0;
    let mut recommendations = Vec::new();

    let names: Vec<String> = extractions
        .iter()
        .filter_map(|d| d.full_name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();
    if names.len() > 1 {
        let variants = distinct_normalized(&names);
        if variants.len() > 1 {
            inconsistent_fields += 1;
            details.name_consistency.score = 60;
            details
                .name_consistency
                .issues
                .push(format!("Name variations found: {}", variants.join(", ")));
            recommendations.push("Verify name spelling consistency across documents".to_string());
        } else {
            consistent_fields += 1;
        }
    }

    let dobs: Vec<NaiveDate> = extractions.iter().filter_map(|d| d.date_of_birth).collect();
    if dobs.len() > 1 {
        let variants = distinct_dates(&dobs);
        if variants.len() > 1 {
            inconsistent_fields += 1;
            details.dob_consistency.score = 50;
            let listed: Vec<String> = variants.iter().map(NaiveDate::to_string).collect();
            details
                .dob_consistency
                .issues
                .push(format!("Date of birth variations found: {}", listed.join(", ")));
            recommendations.push("Verify date of birth consistency across documents".to_string());
        } else {
            consistent_fields += 1;
        }
    }

    let pincodes: Vec<String> = extractions
        .iter()
        .filter_map(|d| d.address.as_ref())
        .map(|a| a.pincode.clone())
        .filter(|p| !p.is_empty())
        .collect();
    let states: Vec<String> = extractions
        .iter()
        .filter_map(|d| d.address.as_ref())
        .map(|a| a.state.clone())
        .filter(|s| !s.is_empty())
        .collect();

    let pin_variants = distinct(&pincodes);
    if pin_variants.len() > 1 {
        details.address_consistency.score = 70;
        details
            .address_consistency
            .issues
            .push(format!("Multiple PIN codes found: {}", pin_variants.join(", ")));
    }
    let state_variants = distinct(&states);
    if state_variants.len() > 1 {
        details.address_consistency.score = details.address_consistency.score.min(60);
        details
            .address_consistency
            .issues
            .push(format!("Multiple states found: {}", state_variants.join(", ")));
    }
    if pincodes.len() > 1 || states.len() > 1 {
        if details.address_consistency.issues.is_empty() {
            consistent_fields += 1;
        } else {
            inconsistent_fields += 1;
            recommendations.push("Verify address consistency across documents".to_string());
        }
    }

    let overall_score = ((details.name_consistency.score as f64
        + details.dob_consistency.score as f64
        + details.address_consistency.score as f64)
        / 3.0)
        .round() as u8;

    if overall_score < 80 {
        recommendations.push("Consider re-uploading documents with better image quality".to_string());
        recommendations.push("Manually verify and correct OCR data for accuracy".to_string());
    }
    if consistent_fields > inconsistent_fields {
        recommendations.push("Most data is consistent - good document quality".to_string());
    }

    CrossValidationReport {
        overall_score,
        consistent_fields,
        inconsistent_fields,
        validation_details: details,
        recommendations,
    }
}

fn collect_strings<'a, F>(
    data: &'a ExtractedData,
    peers: &'a [ExtractedData],
    get: F,
) -> Vec<String>
where
    F: Fn(&'a ExtractedData) -> Option<&'a str>,
{
    std::iter::once(data)
        .chain(peers.iter())
        .filter_map(|d| get(d))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// Order-preserving dedupe on the raw values.
fn distinct(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.clone());
        }
    }
    out
}

// Order-preserving dedupe keyed on the trimmed, lowercased form; the first
// raw spelling of each variant is kept for display.
fn distinct_normalized(values: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let key = value.trim().to_lowercase();
        if !keys.contains(&key) {
            keys.push(key);
            out.push(value.trim().to_string());
        }
    }
    out
}

fn distinct_dates(dates: &[NaiveDate]) -> Vec<NaiveDate> {
    let mut out: Vec<NaiveDate> = Vec::new();
    for date in dates {
        if !out.contains(date) {
            out.push(*date);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn extraction(name: &str, dob: Option<NaiveDate>, pincode: &str, state: &str) -> ExtractedData {
        ExtractedData {
            full_name: Some(name.to_string()),
            date_of_birth: dob,
            address: Some(Address {
                pincode: pincode.to_string(),
                state: state.to_string(),
                ..Address::default()
            }),
            ..Default::default()
        }
    }

    fn with_expiry(expiry: Option<NaiveDate>) -> ExtractedData {
        ExtractedData {
            fields: TypeFields::DrivingLicense {
                license_number: None,
                issue_date: None,
                expiry_date: expiry,
            },
            ..Default::default()
        }
    }

    #[test]
    fn expired_document_is_flagged() {
        let now = Utc::now();
        let expired = with_expiry(Some((now - Duration::days(2)).date_naive()));
        let validity = check_validity(&expired, now);
        assert!(!validity.is_valid);
        assert_eq!(validity.expiry_status, ExpiryStatus::Expired);
        assert_eq!(validity.issues, vec!["Document has expired"]);
    }

    #[test]
    fn imminent_expiry_counts_days() {
        let now = Utc::now();
        let soon = with_expiry(Some((now + Duration::days(10)).date_naive()));
        let validity = check_validity(&soon, now);
        assert!(validity.is_valid);
        assert_eq!(validity.expiry_status, ExpiryStatus::ExpiringSoon);
        assert_eq!(validity.issues, vec!["Document expires in 10 days"]);
    }

    #[test]
    fn distant_expiry_is_valid() {
        let now = Utc::now();
        let fine = with_expiry(Some((now + Duration::days(200)).date_naive()));
        let validity = check_validity(&fine, now);
        assert!(validity.is_valid);
        assert_eq!(validity.expiry_status, ExpiryStatus::Valid);
        assert!(validity.issues.is_empty());
    }

    #[test]
    fn missing_expiry_reports_unknown() {
        let validity = check_validity(&with_expiry(None), Utc::now());
        assert!(validity.is_valid);
        assert_eq!(validity.expiry_status, ExpiryStatus::Unknown);
    }

    #[test]
    fn consistent_documents_score_full_marks() {
        let now = Utc::now();
        let dob = NaiveDate::from_ymd_opt(1990, 8, 15);
        let target = extraction("Ravi Kumar", dob, "560001", "Karnataka");
        let peers = vec![extraction("RAVI KUMAR", dob, "560001", "Karnataka")];

        let results = validate_document(&target, &peers, now);
        assert_eq!(results.name_consistency.score, 100);
        assert_eq!(results.dob_consistency.score, 100);
        assert_eq!(results.address_consistency.score, 100);
        assert_eq!(results.overall_score, 100);
        assert_eq!(results.last_validated, now);
    }

    #[test]
    fn pincode_mismatch_scores_93() {
        let now = Utc::now();
        let dob = NaiveDate::from_ymd_opt(1990, 8, 15);
        let target = extraction("Ravi Kumar", dob, "560001", "Karnataka");
        let peers = vec![
            extraction("Ravi Kumar", dob, "560001", "Karnataka"),
            extraction("Ravi Kumar", dob, "560002", "Karnataka"),
        ];

        let results = validate_document(&target, &peers, now);
        assert_eq!(results.address_consistency.score, 70);
        assert_eq!(
            results.address_consistency.issues,
            vec!["Multiple PIN codes found across documents"]
        );
        // (100 + 100 + 70 + 100) / 4 = 92.5, rounds away from zero
        assert_eq!(results.overall_score, 93);
    }

    #[test]
    fn state_mismatch_caps_address_score() {
        let now = Utc::now();
        let target = extraction("Ravi Kumar", None, "560001", "Karnataka");
        let peers = vec![extraction("Ravi Kumar", None, "110001", "Delhi NCT")];

        let results = validate_document(&target, &peers, now);
        assert_eq!(results.address_consistency.score, 60);
        assert_eq!(results.address_consistency.issues.len(), 2);
    }

    #[test]
    fn name_and_dob_variations_lower_scores() {
        let now = Utc::now();
        let target = extraction(
            "Ravi Kumar",
            NaiveDate::from_ymd_opt(1990, 8, 15),
            "560001",
            "Karnataka",
        );
        let peers = vec![extraction(
            "Ravi Kumaar",
            NaiveDate::from_ymd_opt(1990, 8, 16),
            "560001",
            "Karnataka",
        )];

        let results = validate_document(&target, &peers, now);
        assert_eq!(results.name_consistency.score, 60);
        assert_eq!(results.dob_consistency.score, 50);
        // (60 + 50 + 100 + 100) / 4 = 77.5 -> 78
        assert_eq!(results.overall_score, 78);
    }

    #[test]
    fn cross_validation_flags_pincode_split() {
        let dob = NaiveDate::from_ymd_opt(1990, 8, 15);
        let extractions = vec![
            extraction("Ravi Kumar", dob, "560001", "Karnataka"),
            extraction("Ravi Kumar", dob, "560001", "Karnataka"),
            extraction("Ravi Kumar", dob, "560002", "Karnataka"),
        ];

        let report = cross_validate(&extractions);
        assert_eq!(report.overall_score, 90);
        assert_eq!(report.consistent_fields, 2);
        assert_eq!(report.inconsistent_fields, 1);
        assert_eq!(report.validation_details.address_consistency.score, 70);
        assert_eq!(
            report.validation_details.address_consistency.issues,
            vec!["Multiple PIN codes found: 560001, 560002"]
        );
        assert_eq!(
            report.recommendations,
            vec![
                "Verify address consistency across documents",
                "Most data is consistent - good document quality",
            ]
        );
    }

    #[test]
    fn cross_validation_low_score_adds_quality_recommendations() {
        let extractions = vec![
            extraction("Ravi Kumar", NaiveDate::from_ymd_opt(1990, 8, 15), "560001", ""),
            extraction("Suresh Babu", NaiveDate::from_ymd_opt(1985, 3, 10), "110001", ""),
        ];

        let report = cross_validate(&extractions);
        assert_eq!(report.overall_score, 60);
        assert_eq!(report.consistent_fields, 0);
        assert_eq!(report.inconsistent_fields, 3);
        assert_eq!(
            report.validation_details.name_consistency.issues,
            vec!["Name variations found: Ravi Kumar, Suresh Babu"]
        );
        assert_eq!(
            report.validation_details.dob_consistency.issues,
            vec!["Date of birth variations found: 1990-08-15, 1985-03-10"]
        );
        assert_eq!(
            report.recommendations,
            vec![
                "Verify name spelling consistency across documents",
                "Verify date of birth consistency across documents",
                "Verify address consistency across documents",
                "Consider re-uploading documents with better image quality",
                "Manually verify and correct OCR data for accuracy",
            ]
        );
    }

    #[test]
    fn fields_with_one_value_are_not_compared() {
        let lone = ExtractedData {
            full_name: Some("Ravi Kumar".to_string()),
            ..Default::default()
        };
        let report = cross_validate(&[lone, ExtractedData::default()]);
        assert_eq!(report.consistent_fields, 0);
        assert_eq!(report.inconsistent_fields, 0);
        assert_eq!(report.overall_score, 100);
        assert!(report.recommendations.is_empty());
    }
}
