use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bounded_log::BoundedLog;
use super::enums::AccessAction;

/// Newest access log entries kept per locker.
pub const ACCESS_LOG_CAP: usize = 100;

pub type AccessLog = BoundedLog<AccessLogEntry, ACCESS_LOG_CAP>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub max_failed_attempts: u32,
    pub lockout_duration_minutes: i64,
    pub session_timeout_minutes: i64,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            lockout_duration_minutes: 15,
            session_timeout_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    pub action: AccessAction,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
}

/// One PIN-protected vault per user.
///
/// Lockout state is evaluated lazily against the stored `locked_until`
/// timestamp, so an expired lockout clears on the next check without a
/// background job. The failure counter only resets on a successful
/// verification.
#[derive(Debug, Clone)]
pub struct Locker {
    pub id: Uuid,
    pub user_id: String,
    pub pin_hash: String,
    pub settings: SecuritySettings,
    pub failed_attempt_count: u32,
    pub last_failed_attempt_at: Option<DateTime<Utc>>,
    pub locked_until: Option<DateTime<Utc>>,
    pub access_log: AccessLog,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Locker {
    pub fn new(user_id: impl Into<String>, pin_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            pin_hash,
            settings: SecuritySettings::default(),
            failed_attempt_count: 0,
            last_failed_attempt_at: None,
            locked_until: None,
            access_log: AccessLog::new(),
            last_accessed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.map(|until| until > now).unwrap_or(false)
    }

    /// Whole minutes until the lockout expires, rounded up. Zero when open.
    pub fn retry_after_minutes(&self, now: DateTime<Utc>) -> i64 {
        match self.locked_until {
            Some(until) if until > now => {
                let secs = (until - now).num_seconds();
                (secs + 59) / 60
            }
            _ => 0,
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.settings
            .max_failed_attempts
            .saturating_sub(self.failed_attempt_count)
    }

    /// Count one failed attempt; trips the lockout once the limit is reached.
    pub fn record_failed_attempt(&mut self, now: DateTime<Utc>) {
        self.failed_attempt_count += 1;
        self.last_failed_attempt_at = Some(now);
        if self.failed_attempt_count >= self.settings.max_failed_attempts {
            self.locked_until =
                Some(now + Duration::minutes(self.settings.lockout_duration_minutes));
        }
    }

    pub fn reset_failed_attempts(&mut self) {
        self.failed_attempt_count = 0;
        self.last_failed_attempt_at = None;
        self.locked_until = None;
    }

    /// Append an access log entry. Successful entries refresh `last_accessed_at`.
    pub fn log_access(
        &mut self,
        action: AccessAction,
        success: bool,
        document_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) {
        self.access_log.push(AccessLogEntry {
            action,
            timestamp: now,
            success,
            document_id,
        });
        if success {
            self.last_accessed_at = Some(now);
        }
    }
}
