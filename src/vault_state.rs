//! Transport-agnostic application state.
//!
//! `VaultState` is the single shared state behind the HTTP API: the data
//! directory layout, database access, the OCR engine, and per-user locks
//! that serialize locker mutations.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

use crate::db::{self, DatabaseError};
use crate::extract::OcrEngine;

/// Errors from VaultState operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Data directory error: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Shared state for all API routes.
///
/// Wrapped in `Arc` at startup. Connections are opened per operation
/// rather than pooled; SQLite's busy timeout covers the overlap.
pub struct VaultState {
    /// Root data directory. Holds the database and the stored files.
    data_dir: PathBuf,
    /// OCR engine used at upload time.
    pub ocr: Arc<dyn OcrEngine>,
    /// Per-user locks serializing read-modify-write cycles on a locker row.
    /// Entries are tiny and never pruned.
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl VaultState {
    pub fn new(data_dir: PathBuf, ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            data_dir,
            ocr,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Create the directory layout, run migrations, and seed the default
    /// requirement sets. Safe to call on every startup.
    pub fn initialize(&self) -> Result<(), StateError> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(self.files_dir())?;
        let conn = self.open_db()?;
        let seeded = db::seed_default_requirements(&conn)?;
        tracing::info!(
            data_dir = %self.data_dir.display(),
            seeded_requirement_sets = seeded,
            "vault storage ready"
        );
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("sandook.db")
    }

    /// Directory holding uploaded document files.
    pub fn files_dir(&self) -> PathBuf {
        self.data_dir.join("files")
    }

    /// Open a database connection. Runs pending migrations, which is a
    /// version check after the first open.
    pub fn open_db(&self) -> Result<rusqlite::Connection, StateError> {
        db::open_database(&self.db_path()).map_err(StateError::Database)
    }

    /// Acquire the mutation lock for one user's locker.
    ///
    /// Handlers hold this across load-verify-update cycles so concurrent
    /// requests for the same user cannot interleave. Different users never
    /// contend.
    pub async fn user_guard(&self, user_id: &str) -> Result<OwnedMutexGuard<()>, StateError> {
        let lock = {
            let mut locks = self.user_locks.lock().map_err(|_| StateError::LockPoisoned)?;
            locks.entry(user_id.to_string()).or_default().clone()
        };
        Ok(lock.lock_owned().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::DisabledOcrEngine;
    use std::time::Duration;

    fn test_state(dir: &std::path::Path) -> VaultState {
        VaultState::new(dir.join("vault"), Arc::new(DisabledOcrEngine))
    }

    #[test]
    fn initialize_creates_layout_and_seeds() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        state.initialize().unwrap();

        assert!(state.files_dir().is_dir());
        assert!(state.db_path().is_file());

        let conn = state.open_db().unwrap();
        let seeded = crate::db::count_requirement_sets(&conn).unwrap();
        assert!(seeded >= 2, "default requirement sets missing: {seeded}");
    }

    #[test]
    fn initialize_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        state.initialize().unwrap();
        let conn = state.open_db().unwrap();
        let first = crate::db::count_requirement_sets(&conn).unwrap();

        state.initialize().unwrap();
        let second = crate::db::count_requirement_sets(&conn).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn user_guard_serializes_only_the_same_user() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let held = state.user_guard("user-a").await.unwrap();

        // A different user is not blocked.
        let other = tokio::time::timeout(Duration::from_millis(100), state.user_guard("user-b"))
            .await
            .expect("different user should not wait");
        drop(other);

        // The same user waits until the guard drops.
        let blocked =
            tokio::time::timeout(Duration::from_millis(50), state.user_guard("user-a")).await;
        assert!(blocked.is_err(), "same user should wait for the held guard");

        drop(held);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(100), state.user_guard("user-a"))
                .await
                .expect("guard should be free after drop");
        drop(reacquired);
    }
}
