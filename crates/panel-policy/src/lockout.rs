//! Failed-login lockout tracking.

use crate::types::{AttemptOutcome, LockoutConfig, LockoutStatus};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

/// Hard cap on tracked clients
const MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct LockoutRecord {
    failed_count: u32,
    last_attempt: u64,
}

impl LockoutRecord {
    fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_attempt)
    }
}

/// Per-client failed attempt tracker
///
/// Every public operation runs inside one critical section, so the
/// check-then-increment sequence of an attempt is atomic across requests.
pub struct LockoutPolicy {
    config: LockoutConfig,
    records: Mutex<HashMap<String, LockoutRecord>>,
}

impl LockoutPolicy {
    /// Create a new lockout policy
    pub fn new(config: LockoutConfig) -> Self {
        Self {
            config,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> LockoutConfig {
        self.config
    }

    /// Run an authentication attempt for `client_id`
    ///
    /// Compares `supplied` with `correct` in constant time. An empty secret
    /// on either side never matches.
    pub fn attempt(
        &self,
        client_id: &str,
        supplied: &str,
        correct: &str,
        now: u64,
    ) -> AttemptOutcome {
        let matches = !supplied.is_empty()
            && !correct.is_empty()
            && bool::from(supplied.as_bytes().ct_eq(correct.as_bytes()));

        self.check(client_id, matches, now)
    }

    /// Run an attempt whose secret comparison the caller already made
    pub fn check(&self, client_id: &str, secret_matches: bool, now: u64) -> AttemptOutcome {
        let mut records = self.lock();
        let window = self.config.window_seconds;
        let threshold = self.config.max_attempts;

        if records
            .get(client_id)
            .is_some_and(|record| record.age(now) > window)
        {
            debug!(client = %client_id, "Lockout record expired");
            records.remove(client_id);
        }

        if let Some(record) = records.get(client_id) {
            if record.failed_count >= threshold {
                return AttemptOutcome::Locked {
                    remaining_seconds: window.saturating_sub(record.age(now)),
                };
            }
        }

        if secret_matches {
            records.remove(client_id);
            return AttemptOutcome::Admitted;
        }

        let failed_count = {
            let record = records
                .entry(client_id.to_string())
                .or_insert(LockoutRecord {
                    failed_count: 0,
                    last_attempt: now,
                });
            record.failed_count += 1;
            record.last_attempt = now;
            record.failed_count
        };

        cleanup_records(&mut records, now, window);

        if failed_count >= threshold {
            warn!(client = %client_id, failed_count, "Client locked out");
            AttemptOutcome::LockedOut {
                lockout_seconds: window,
            }
        } else {
            AttemptOutcome::Rejected {
                remaining_attempts: threshold - failed_count,
            }
        }
    }

    /// Lockout state for a client without modifying it
    pub fn status(&self, client_id: &str, now: u64) -> LockoutStatus {
        let records = self.lock();
        let window = self.config.window_seconds;

        match records.get(client_id) {
            Some(record) if record.age(now) <= window => {
                let is_locked = record.failed_count >= self.config.max_attempts;
                LockoutStatus {
                    failed_attempts: record.failed_count,
                    is_locked,
                    last_attempt: Some(record.last_attempt),
                    remaining_lockout: is_locked
                        .then(|| window.saturating_sub(record.age(now))),
                }
            }
            _ => LockoutStatus::fresh(),
        }
    }

    /// Drop records older than twice the window, returning how many were removed
    pub fn sweep(&self, now: u64) -> usize {
        let mut records = self.lock();
        let max_age = self.config.window_seconds.saturating_mul(2);
        let before = records.len();
        records.retain(|_, record| record.age(now) <= max_age);
        before - records.len()
    }

    /// Forget a client's record
    pub fn reset(&self, client_id: &str) {
        self.lock().remove(client_id);
    }

    /// Number of tracked clients
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, LockoutRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(LockoutConfig::default())
    }
}

fn cleanup_records(records: &mut HashMap<String, LockoutRecord>, now: u64, window: u64) {
    if records.len() <= MAX_ENTRIES {
        return;
    }

    records.retain(|_, record| record.age(now) <= window);

    if records.len() > MAX_ENTRIES {
        evict_oldest(records);
    }
}

fn evict_oldest(records: &mut HashMap<String, LockoutRecord>) {
    let mut entries: Vec<_> = records
        .iter()
        .map(|(key, record)| (key.clone(), record.last_attempt))
        .collect();

    entries.sort_by_key(|(_, last_attempt)| *last_attempt);
    let remove_count = records.len().saturating_sub(MAX_ENTRIES);

    for (key, _) in entries.into_iter().take(remove_count) {
        records.remove(&key);
    }
}
