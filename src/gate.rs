//! PIN access gate for lockers.
//!
//! There are no sessions: every sensitive operation presents the PIN and
//! goes through `check_pin`, which drives the lockout state machine and
//! persists its outcome. The other operations cover the locker lifecycle.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::crypto::{hash_pin, pin_format_ok, verify_pin};
use crate::db::{self, DatabaseError};
use crate::models::*;
use crate::vault_state::{StateError, VaultState};

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Locker PIN is required")]
    PinRequired,
    #[error("PIN must be between 4 and 6 digits")]
    InvalidFormat,
    #[error("Document locker not found")]
    NotFound,
    #[error("Locker is locked due to multiple failed attempts. Try again in {minutes} minutes.")]
    Locked { minutes: i64 },
    #[error("Invalid PIN")]
    InvalidPin { attempts_remaining: u32 },
    #[error("Document locker already exists")]
    AlreadyExists,
    #[error(transparent)]
    State(#[from] StateError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Existence and lock state for a user. A missing locker is not an error.
#[derive(Debug, Clone, Serialize)]
pub struct LockerStatus {
    pub exists: bool,
    pub is_locked: bool,
}

/// Successful unlock: the locker plus its active document count.
#[derive(Debug)]
pub struct UnlockOutcome {
    pub locker: Locker,
    pub document_count: u32,
}

/// Create a locker for a user who has none yet. The creation counts as the
/// first successful unlock in the access log.
pub async fn create_locker(
    state: &VaultState,
    user_id: &str,
    pin: &str,
) -> Result<Locker, GateError> {
    if pin.is_empty() {
        return Err(GateError::PinRequired);
    }
    if !pin_format_ok(pin) {
        return Err(GateError::InvalidFormat);
    }

    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    if db::get_locker_by_user(&conn, user_id)?.is_some() {
        return Err(GateError::AlreadyExists);
    }

    let now = Utc::now();
    let mut locker = Locker::new(user_id, hash_pin(pin), now);
    locker.log_access(AccessAction::Unlock, true, None, now);
    db::insert_locker(&conn, &locker)?;
    tracing::info!(user_id, locker_id = %locker.id, "locker created");
    Ok(locker)
}

/// `{ exists, is_locked }` for a user.
pub fn locker_status(state: &VaultState, user_id: &str) -> Result<LockerStatus, GateError> {
    let conn = state.open_db()?;
    let status = match db::get_locker_by_user(&conn, user_id)? {
        Some(locker) => LockerStatus {
            exists: true,
            is_locked: locker.is_locked(Utc::now()),
        },
        None => LockerStatus {
            exists: false,
            is_locked: false,
        },
    };
    Ok(status)
}

/// Verify a PIN against the stored hash, driving the lockout machine.
///
/// The caller must hold the user's guard. The updated locker row, with the
/// access log entry applied, is persisted before returning. A locked-out
/// locker refuses verification up front, even for the correct PIN.
pub fn check_pin(
    conn: &Connection,
    user_id: &str,
    pin: &str,
    now: DateTime<Utc>,
) -> Result<Locker, GateError> {
    if pin.is_empty() {
        return Err(GateError::PinRequired);
    }
    let mut locker = db::get_locker_by_user(conn, user_id)?.ok_or(GateError::NotFound)?;

    if locker.is_locked(now) {
        let minutes = locker.retry_after_minutes(now);
        tracing::warn!(user_id, minutes, "verification refused, locker locked");
        return Err(GateError::Locked { minutes });
    }

    if !verify_pin(pin, &locker.pin_hash) {
        locker.record_failed_attempt(now);
        locker.log_access(AccessAction::FailedAttempt, false, None, now);
        locker.updated_at = now;
        db::update_locker(conn, &locker)?;
        let attempts_remaining = locker.attempts_remaining();
        tracing::warn!(user_id, attempts_remaining, "failed PIN attempt");
        return Err(GateError::InvalidPin { attempts_remaining });
    }

    locker.reset_failed_attempts();
    locker.log_access(AccessAction::Unlock, true, None, now);
    locker.updated_at = now;
    db::update_locker(conn, &locker)?;
    Ok(locker)
}

/// Unlock: full verification plus the locker's active document count.
pub async fn unlock(
    state: &VaultState,
    user_id: &str,
    pin: &str,
) -> Result<UnlockOutcome, GateError> {
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let locker = check_pin(&conn, user_id, pin, Utc::now())?;
    let document_count = db::count_active_documents(&conn, locker.id)?;
    tracing::info!(user_id, locker_id = %locker.id, "locker unlocked");
    Ok(UnlockOutcome {
        locker,
        document_count,
    })
}

/// Replace the PIN after verifying the current one through the lockout
/// machine.
pub async fn change_pin(
    state: &VaultState,
    user_id: &str,
    current_pin: &str,
    new_pin: &str,
) -> Result<(), GateError> {
    if !pin_format_ok(new_pin) {
        return Err(GateError::InvalidFormat);
    }
    let _guard = state.user_guard(user_id).await?;
    let conn = state.open_db()?;
    let now = Utc::now();
    let mut locker = check_pin(&conn, user_id, current_pin, now)?;
    locker.pin_hash = hash_pin(new_pin);
    locker.updated_at = now;
    db::update_locker(&conn, &locker)?;
    tracing::info!(user_id, "locker PIN changed");
    Ok(())
}
