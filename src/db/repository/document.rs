use rusqlite::{params, Connection};
use std::str::FromStr;
use uuid::Uuid;

use super::parse_timestamp;
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_document(conn: &Connection, document: &VaultDocument) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO documents (id, locker_id, name, document_type, original_name, file_path,
         file_size, mime_type, encryption_key, extracted_data, validation_results, audit_trail,
         tags, notes, access_count, last_accessed_at, is_active, uploaded_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            document.id.to_string(),
            document.locker_id.to_string(),
            document.name,
            document.document_type.as_str(),
            document.original_name,
            document.file_path,
            document.file_size as i64,
            document.mime_type,
            document.encryption_key,
            serde_json::to_string(&document.extracted).unwrap_or_else(|_| "{}".into()),
            document
                .validation
                .as_ref()
                .map(|v| serde_json::to_string(v).unwrap_or_else(|_| "{}".into())),
            serde_json::to_string(&document.audit_trail).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&document.tags).unwrap_or_else(|_| "[]".into()),
            document.notes,
            document.access_count as i64,
            document.last_accessed_at.map(|t| t.to_rfc3339()),
            document.is_active as i32,
            document.uploaded_at.to_rfc3339(),
            document.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

const DOCUMENT_COLUMNS: &str = "id, locker_id, name, document_type, original_name, file_path,
         file_size, mime_type, encryption_key, extracted_data, validation_results, audit_trail,
         tags, notes, access_count, last_accessed_at, is_active, uploaded_at, updated_at";

pub fn get_document(
    conn: &Connection,
    locker_id: Uuid,
    document_id: Uuid,
) -> Result<Option<VaultDocument>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         WHERE id = ?1 AND locker_id = ?2 AND is_active = 1"
    ))?;

    let result = stmt.query_row(
        params![document_id.to_string(), locker_id.to_string()],
        map_document_row,
    );

    match result {
        Ok(row) => Ok(Some(document_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_active_documents(
    conn: &Connection,
    locker_id: Uuid,
) -> Result<Vec<VaultDocument>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents
         WHERE locker_id = ?1 AND is_active = 1
         ORDER BY uploaded_at DESC"
    ))?;

    let rows = stmt.query_map(params![locker_id.to_string()], map_document_row)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(document_from_row(row?)?);
    }
    Ok(documents)
}

pub fn count_active_documents(conn: &Connection, locker_id: Uuid) -> Result<u32, DatabaseError> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE locker_id = ?1 AND is_active = 1",
        params![locker_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn update_document(conn: &Connection, document: &VaultDocument) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "UPDATE documents SET name = ?2, document_type = ?3, extracted_data = ?4,
         validation_results = ?5, audit_trail = ?6, tags = ?7, notes = ?8, access_count = ?9,
         last_accessed_at = ?10, is_active = ?11, updated_at = ?12
         WHERE id = ?1",
        params![
            document.id.to_string(),
            document.name,
            document.document_type.as_str(),
            serde_json::to_string(&document.extracted).unwrap_or_else(|_| "{}".into()),
            document
                .validation
                .as_ref()
                .map(|v| serde_json::to_string(v).unwrap_or_else(|_| "{}".into())),
            serde_json::to_string(&document.audit_trail).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&document.tags).unwrap_or_else(|_| "[]".into()),
            document.notes,
            document.access_count as i64,
            document.last_accessed_at.map(|t| t.to_rfc3339()),
            document.is_active as i32,
            document.updated_at.to_rfc3339(),
        ],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Document".into(),
            id: document.id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for VaultDocument mapping
struct DocumentRow {
    id: String,
    locker_id: String,
    name: String,
    document_type: String,
    original_name: String,
    file_path: String,
    file_size: i64,
    mime_type: String,
    encryption_key: String,
    extracted_data: String,
    validation_results: Option<String>,
    audit_trail: String,
    tags: String,
    notes: Option<String>,
    access_count: i64,
    last_accessed_at: Option<String>,
    is_active: i32,
    uploaded_at: String,
    updated_at: String,
}

fn map_document_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get::<_, String>(0)?,
        locker_id: row.get::<_, String>(1)?,
        name: row.get::<_, String>(2)?,
        document_type: row.get::<_, String>(3)?,
        original_name: row.get::<_, String>(4)?,
        file_path: row.get::<_, String>(5)?,
        file_size: row.get::<_, i64>(6)?,
        mime_type: row.get::<_, String>(7)?,
        encryption_key: row.get::<_, String>(8)?,
        extracted_data: row.get::<_, String>(9)?,
        validation_results: row.get::<_, Option<String>>(10)?,
        audit_trail: row.get::<_, String>(11)?,
        tags: row.get::<_, String>(12)?,
        notes: row.get::<_, Option<String>>(13)?,
        access_count: row.get::<_, i64>(14)?,
        last_accessed_at: row.get::<_, Option<String>>(15)?,
        is_active: row.get::<_, i32>(16)?,
        uploaded_at: row.get::<_, String>(17)?,
        updated_at: row.get::<_, String>(18)?,
    })
}

fn document_from_row(row: DocumentRow) -> Result<VaultDocument, DatabaseError> {
    Ok(VaultDocument {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        locker_id: Uuid::parse_str(&row.locker_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        name: row.name,
        document_type: DocumentType::from_str(&row.document_type)?,
        original_name: row.original_name,
        file_path: row.file_path,
        file_size: row.file_size.max(0) as u64,
        mime_type: row.mime_type,
        encryption_key: row.encryption_key,
        extracted: serde_json::from_str(&row.extracted_data).unwrap_or_default(),
        validation: row
            .validation_results
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok()),
        audit_trail: serde_json::from_str(&row.audit_trail).unwrap_or_default(),
        tags: serde_json::from_str(&row.tags).unwrap_or_default(),
        notes: row.notes,
        access_count: row.access_count.max(0) as u64,
        last_accessed_at: row.last_accessed_at.as_deref().and_then(parse_timestamp),
        is_active: row.is_active != 0,
        uploaded_at: parse_timestamp(&row.uploaded_at)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
        updated_at: parse_timestamp(&row.updated_at)
            .unwrap_or(chrono::DateTime::<chrono::Utc>::UNIX_EPOCH),
    })
}
