use rusqlite::{params, Connection};
use uuid::Uuid;

use super::parse_timestamp;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_locker(conn: &Connection, locker: &Locker) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO lockers (id, user_id, pin_hash, max_failed_attempts, lockout_duration_minutes,
         session_timeout_minutes, failed_attempt_count, last_failed_attempt_at, locked_until,
         access_log, last_accessed_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            locker.id.to_string(),
            locker.user_id,
            locker.pin_hash,
            locker.settings.max_failed_attempts,
            locker.settings.lockout_duration_minutes,
            locker.settings.session_timeout_minutes,
            locker.failed_attempt_count,
            locker.last_failed_attempt_at.map(|t| t.to_rfc3339()),
            locker.locked_until.map(|t| t.to_rfc3339()),
            serde_json::to_string(&locker.access_log).unwrap_or_else(|_| "[]".into()),
            locker.last_accessed_at.map(|t| t.to_rfc3339()),
            locker.created_at.to_rfc3339(),
            locker.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_locker_by_user(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<Locker>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, pin_hash, max_failed_attempts, lockout_duration_minutes,
         session_timeout_minutes, failed_attempt_count, last_failed_attempt_at, locked_until,
         access_log, last_accessed_at, created_at, updated_at
         FROM lockers WHERE user_id = ?1",
    )?;

    let result = stmt.query_row(params![user_id], |row| {
        Ok(LockerRow {
            id: row.get::<_, String>(0)?,
            user_id: row.get::<_, String>(1)?,
            pin_hash: row.get::<_, String>(2)?,
            max_failed_attempts: row.get::<_, u32>(3)?,
            lockout_duration_minutes: row.get::<_, i64>(4)?,
            session_timeout_minutes: row.get::<_, i64>(5)?,
            failed_attempt_count: row.get::<_, u32>(6)?,
            last_failed_attempt_at: row.get::<_, Option<String>>(7)?,
            locked_until: row.get::<_, Option<String>>(8)?,
            access_log: row.get::<_, String>(9)?,
            last_accessed_at: row.get::<_, Option<String>>(10)?,
            created_at: row.get::<_, String>(11)?,
            updated_at: row.get::<_, String>(12)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(locker_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn update_locker(conn: &Connection, locker: &Locker) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE lockers SET pin_hash = ?2, max_failed_attempts = ?3,
         lockout_duration_minutes = ?4, session_timeout_minutes = ?5,
         failed_attempt_count = ?6, last_failed_attempt_at = ?7, locked_until = ?8,
         access_log = ?9, last_accessed_at = ?10, updated_at = ?11
         WHERE id = ?1",
        params![
            locker.id.to_string(),
            locker.pin_hash,
            locker.settings.max_failed_attempts,
            locker.settings.lockout_duration_minutes,
            locker.settings.session_timeout_minutes,
            locker.failed_attempt_count,
            locker.last_failed_attempt_at.map(|t| t.to_rfc3339()),
            locker.locked_until.map(|t| t.to_rfc3339()),
            serde_json::to_string(&locker.access_log).unwrap_or_else(|_| "[]".into()),
            locker.last_accessed_at.map(|t| t.to_rfc3339()),
            locker.updated_at.to_rfc3339(),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Locker".into(),
            id: locker.id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Locker mapping
struct LockerRow {
    id: String,
    user_id: String,
    pin_hash: String,
    max_failed_attempts: u32,
    lockout_duration_minutes: i64,
    session_timeout_minutes: i64,
    failed_attempt_count: u32,
    last_failed_attempt_at: Option<String>,
    locked_until: Option<String>,
    access_log: String,
    last_accessed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

fn locker_from_row(row: LockerRow) -> Result<Locker, DatabaseError> {
    Ok(Locker {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: row.user_id,
        pin_hash: row.pin_hash,
        settings: SecuritySettings {
            max_failed_attempts: row.max_failed_attempts,
            lockout_duration_minutes: row.lockout_duration_minutes,
            session_timeout_minutes: row.session_timeout_minutes,
        },
        failed_attempt_count: row.failed_attempt_count,
        last_failed_attempt_at: row.last_failed_attempt_at.as_deref().and_then(parse_timestamp),
        locked_until: row.locked_until.as_deref().and_then(parse_timestamp),
        access_log: serde_json::from_str(&row.access_log).unwrap_or_default(),
        last_accessed_at: row.last_accessed_at.as_deref().and_then(parse_timestamp),
        created_at: parse_timestamp(&row.created_at)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
        updated_at: parse_timestamp(&row.updated_at)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
    })
}
