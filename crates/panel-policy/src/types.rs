//! Lockout policy types.

use serde::{Deserialize, Serialize};

/// Default number of failed attempts before a client is locked out
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default lockout window in seconds
pub const DEFAULT_WINDOW_SECONDS: u64 = 300;

/// Lockout policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutConfig {
    /// Failed attempts that trigger a lockout
    pub max_attempts: u32,
    /// Seconds after the last failed attempt during which the record stays live
    pub window_seconds: u64,
}

impl LockoutConfig {
    pub fn new(max_attempts: u32, window_seconds: u64) -> Self {
        Self {
            max_attempts,
            window_seconds,
        }
    }
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_SECONDS)
    }
}

/// Result of a single authentication attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Secret matched; any failure record was cleared
    Admitted,

    /// Secret did not match and the client still has attempts left
    Rejected { remaining_attempts: u32 },

    /// This failure reached the threshold and started a lockout
    LockedOut { lockout_seconds: u64 },

    /// Client was already locked out; the secret was not checked
    Locked { remaining_seconds: u64 },
}

impl AttemptOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AttemptOutcome::Admitted)
    }

    /// True for both a fresh lockout and a denial while locked
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::LockedOut { .. } | AttemptOutcome::Locked { .. }
        )
    }
}

/// Read-only view of a client's lockout record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockoutStatus {
    pub failed_attempts: u32,
    pub is_locked: bool,
    /// Unix seconds of the last failed attempt
    pub last_attempt: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_lockout: Option<u64>,
}

impl LockoutStatus {
    pub(crate) fn fresh() -> Self {
        Self {
            failed_attempts: 0,
            is_locked: false,
            last_attempt: None,
            remaining_lockout: None,
        }
    }
}
