use chrono::Utc;
use rusqlite::{params, Connection};
use serde::Deserialize;

use super::parse_timestamp;
use crate::db::DatabaseError;
use crate::models::*;

pub fn upsert_requirement_set(
    conn: &Connection,
    set: &RequirementSet,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR REPLACE INTO requirement_sets (service_id, documents, validation_rules,
         instructions, staff_instructions, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            set.service_id,
            serde_json::to_string(&set.documents).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&set.validation_rules).unwrap_or_else(|_| "{}".into()),
            set.instructions,
            set.staff_instructions,
            set.created_at.to_rfc3339(),
            set.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_requirement_set(
    conn: &Connection,
    service_id: &str,
) -> Result<Option<RequirementSet>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT service_id, documents, validation_rules, instructions, staff_instructions,
         created_at, updated_at
         FROM requirement_sets WHERE service_id = ?1",
    )?;

    let result = stmt.query_row(params![service_id], |row| {
        Ok(RequirementSetRow {
            service_id: row.get::<_, String>(0)?,
            documents: row.get::<_, String>(1)?,
            validation_rules: row.get::<_, String>(2)?,
            instructions: row.get::<_, String>(3)?,
            staff_instructions: row.get::<_, String>(4)?,
            created_at: row.get::<_, String>(5)?,
            updated_at: row.get::<_, String>(6)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(requirement_set_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_requirement_sets(conn: &Connection) -> Result<u32, DatabaseError> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM requirement_sets", [], |row| row.get(0))?;
    Ok(count)
}

/// Loads the bundled requirement catalog on first run. Returns the number of
/// sets inserted, 0 when the table is already populated.
pub fn seed_default_requirements(conn: &Connection) -> Result<u32, DatabaseError> {
    if count_requirement_sets(conn)? > 0 {
        return Ok(0);
    }

    let seeds: Vec<SeedRequirementSet> =
        serde_json::from_str(include_str!("../../../resources/requirements/default.json"))
            .map_err(|e| {
                DatabaseError::ConstraintViolation(format!("invalid requirement seed file: {e}"))
            })?;

    let now = Utc::now();
    let mut inserted = 0;
    for seed in seeds {
        let set = RequirementSet {
            service_id: seed.service_id,
            documents: seed.documents,
            validation_rules: seed.validation_rules,
            instructions: seed.instructions,
            staff_instructions: seed.staff_instructions,
            created_at: now,
            updated_at: now,
        };
        upsert_requirement_set(conn, &set)?;
        inserted += 1;
    }

    tracing::info!(count = inserted, "seeded default requirement sets");
    Ok(inserted)
}

// Seed file entries carry no timestamps, those are stamped at insert time.
#[derive(Deserialize)]
struct SeedRequirementSet {
    service_id: String,
    documents: Vec<RequiredDocument>,
    validation_rules: ValidationRules,
    #[serde(default = "default_instructions")]
    instructions: String,
    #[serde(default = "default_staff_instructions")]
    staff_instructions: String,
}

fn default_instructions() -> String {
    DEFAULT_INSTRUCTIONS.to_string()
}

fn default_staff_instructions() -> String {
    DEFAULT_STAFF_INSTRUCTIONS.to_string()
}

struct RequirementSetRow {
    service_id: String,
    documents: String,
    validation_rules: String,
    instructions: String,
    staff_instructions: String,
    created_at: String,
    updated_at: String,
}

fn requirement_set_from_row(row: RequirementSetRow) -> Result<RequirementSet, DatabaseError> {
    let validation_rules = serde_json::from_str(&row.validation_rules).map_err(|e| {
        DatabaseError::ConstraintViolation(format!(
            "invalid validation_rules for {}: {e}",
            row.service_id
        ))
    })?;

    Ok(RequirementSet {
        service_id: row.service_id,
        documents: serde_json::from_str(&row.documents).unwrap_or_default(),
        validation_rules,
        instructions: row.instructions,
        staff_instructions: row.staff_instructions,
        created_at: parse_timestamp(&row.created_at)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
        updated_at: parse_timestamp(&row.updated_at)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
    })
}
