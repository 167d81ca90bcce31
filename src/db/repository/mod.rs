//! Repository layer, entity-scoped database operations.
//!
//! All public functions are free functions over a borrowed [`Connection`];
//! callers own the connection and any transaction scope around it.

mod document;
mod locker;
mod requirement;

use chrono::{DateTime, Utc};

// Re-export all public items from sub-modules
pub use document::*;
pub use locker::*;
pub use requirement::*;

/// Timestamps are stored as RFC 3339 text. Rows written by hand or by older
/// builds may not parse; callers decide the fallback.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::DatabaseError;
    use crate::models::*;
    use chrono::Duration;
    use rusqlite::Connection;
    use uuid::Uuid;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_locker(conn: &Connection, user_id: &str) -> Locker {
        let locker = Locker::new(user_id, "v1$c2FsdA$aGFzaA".to_string(), Utc::now());
        insert_locker(conn, &locker).unwrap();
        locker
    }

    fn make_document(
        conn: &Connection,
        locker_id: Uuid,
        name: &str,
        uploaded_at: DateTime<Utc>,
    ) -> VaultDocument {
        let document = VaultDocument {
            id: Uuid::new_v4(),
            locker_id,
            name: name.to_string(),
            document_type: DocumentType::AadhaarCard,
            original_name: format!("{name}.png"),
            file_path: format!("/tmp/{name}.png"),
            file_size: 2048,
            mime_type: "image/png".to_string(),
            encryption_key: "ab".repeat(32),
            extracted: ExtractedData {
                full_name: Some("Ravi Kumar".to_string()),
                confidence: 90.0,
                ..Default::default()
            },
            validation: None,
            audit_trail: AuditTrail::new(),
            tags: vec!["identity".to_string()],
            notes: None,
            access_count: 0,
            last_accessed_at: None,
            is_active: true,
            uploaded_at,
            updated_at: uploaded_at,
        };
        insert_document(conn, &document).unwrap();
        document
    }

    #[test]
    fn locker_round_trip() {
        let conn = test_db();
        let mut locker = Locker::new("user-1", "v1$c2FsdA$aGFzaA".to_string(), Utc::now());
        locker.log_access(AccessAction::Unlock, true, None, Utc::now());
        insert_locker(&conn, &locker).unwrap();

        let loaded = get_locker_by_user(&conn, "user-1").unwrap().unwrap();
        assert_eq!(loaded.id, locker.id);
        assert_eq!(loaded.pin_hash, locker.pin_hash);
        assert_eq!(loaded.settings, SecuritySettings::default());
        assert_eq!(loaded.access_log.len(), 1);
        assert_eq!(loaded.access_log.entries()[0].action, AccessAction::Unlock);
    }

    #[test]
    fn get_locker_returns_none_for_unknown_user() {
        let conn = test_db();
        assert!(get_locker_by_user(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_user_id_is_rejected() {
        let conn = test_db();
        make_locker(&conn, "user-1");
        let second = Locker::new("user-1", "v1$c2FsdA$aGFzaA".to_string(), Utc::now());
        assert!(insert_locker(&conn, &second).is_err());
    }

    #[test]
    fn update_locker_persists_lockout_state() {
        let conn = test_db();
        let mut locker = make_locker(&conn, "user-1");
        let now = Utc::now();
        for _ in 0..3 {
            locker.record_failed_attempt(now);
        }
        update_locker(&conn, &locker).unwrap();

        let loaded = get_locker_by_user(&conn, "user-1").unwrap().unwrap();
        assert_eq!(loaded.failed_attempt_count, 3);
        assert!(loaded.is_locked(now));
    }

    #[test]
    fn update_missing_locker_is_not_found() {
        let conn = test_db();
        let locker = Locker::new("ghost", "v1$c2FsdA$aGFzaA".to_string(), Utc::now());
        let err = update_locker(&conn, &locker).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn document_round_trip_preserves_extracted_data() {
        let conn = test_db();
        let locker = make_locker(&conn, "user-1");
        let document = make_document(&conn, locker.id, "aadhaar", Utc::now());

        let loaded = get_document(&conn, locker.id, document.id).unwrap().unwrap();
        assert_eq!(loaded.name, "aadhaar");
        assert_eq!(loaded.document_type, DocumentType::AadhaarCard);
        assert_eq!(loaded.extracted.full_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(loaded.file_size, 2048);
        assert!(loaded.validation.is_none());
    }

    #[test]
    fn get_document_is_scoped_to_locker() {
        let conn = test_db();
        let locker = make_locker(&conn, "user-1");
        let other = make_locker(&conn, "user-2");
        let document = make_document(&conn, locker.id, "aadhaar", Utc::now());

        assert!(get_document(&conn, other.id, document.id).unwrap().is_none());
    }

    #[test]
    fn list_orders_newest_first_and_skips_inactive() {
        let conn = test_db();
        let locker = make_locker(&conn, "user-1");
        let now = Utc::now();
        make_document(&conn, locker.id, "oldest", now - Duration::hours(2));
        let mut middle = make_document(&conn, locker.id, "middle", now - Duration::hours(1));
        make_document(&conn, locker.id, "newest", now);

        middle.is_active = false;
        update_document(&conn, &middle).unwrap();

        let documents = list_active_documents(&conn, locker.id).unwrap();
        let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["newest", "oldest"]);
        assert_eq!(count_active_documents(&conn, locker.id).unwrap(), 2);
        assert!(get_document(&conn, locker.id, middle.id).unwrap().is_none());
    }

    #[test]
    fn update_missing_document_is_not_found() {
        let conn = test_db();
        let locker = make_locker(&conn, "user-1");
        let mut document = make_document(&conn, locker.id, "aadhaar", Utc::now());
        document.id = Uuid::new_v4();
        let err = update_document(&conn, &document).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn seed_runs_once() {
        let conn = test_db();
        let inserted = seed_default_requirements(&conn).unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(seed_default_requirements(&conn).unwrap(), 0);

        let set = get_requirement_set(&conn, "income_certificate")
            .unwrap()
            .unwrap();
        assert_eq!(set.documents.len(), 4);
        assert_eq!(set.validation_rules.minimum_threshold, 2);
        assert_eq!(set.validation_rules.total_required, 3);
        assert!(!set.instructions.is_empty());
    }

    #[test]
    fn get_requirement_set_returns_none_for_unknown_service() {
        let conn = test_db();
        seed_default_requirements(&conn).unwrap();
        assert!(get_requirement_set(&conn, "passport_renewal")
            .unwrap()
            .is_none());
    }
}
