//! Admin authentication service.

use crate::{errors::*, types::*};
use panel_policy::{AttemptOutcome, LockoutConfig, LockoutPolicy};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

/// Generate random bytes of the specified length
pub fn generate_random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    use rand::RngCore;
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Single-password admin authentication with lockout and sessions
///
/// The configured password is kept only as a SHA-256 digest and compared
/// in constant time. Session tokens are likewise stored hashed.
pub struct AuthService {
    password_digest: Option<[u8; 32]>,
    lockout: LockoutPolicy,
    sessions: RwLock<HashMap<[u8; 32], AdminSession>>,
    session_ttl: u64,
}

impl AuthService {
    /// Create the service; an empty `admin_password` rejects every login
    pub fn new(admin_password: &str, lockout: LockoutConfig, session_ttl: u64) -> Self {
        let password_digest = (!admin_password.is_empty()).then(|| sha256(admin_password.as_bytes()));
        if password_digest.is_none() {
            warn!("No admin password configured, all logins will be rejected");
        }

        Self {
            password_digest,
            lockout: LockoutPolicy::new(lockout),
            sessions: RwLock::new(HashMap::new()),
            session_ttl,
        }
    }

    pub fn lockout_config(&self) -> LockoutConfig {
        self.lockout.config()
    }

    fn password_matches(&self, password: &str) -> bool {
        match &self.password_digest {
            Some(digest) if !password.is_empty() => {
                sha256(password.as_bytes())
                    .as_slice()
                    .ct_eq(digest.as_slice())
                    .into()
            }
            _ => false,
        }
    }

    /// Attempt an admin login from `client_id`
    pub fn login(&self, password: &str, client_id: &str, now: u64) -> LoginOutcome {
        let matches = self.password_matches(password);

        match self.lockout.check(client_id, matches, now) {
            AttemptOutcome::Admitted => {
                let token = hex::encode(generate_random_bytes::<32>());
                let session = AdminSession {
                    client_id: client_id.to_string(),
                    created_at: now,
                };

                self.sessions
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(sha256(token.as_bytes()), session.clone());

                info!(client = %client_id, "Admin login succeeded");
                LoginOutcome::Admitted { token, session }
            }
            AttemptOutcome::Rejected { remaining_attempts } => {
                warn!(client = %client_id, remaining_attempts, "Admin login failed");
                LoginOutcome::Rejected { remaining_attempts }
            }
            AttemptOutcome::LockedOut { lockout_seconds } => {
                LoginOutcome::LockedOut { lockout_seconds }
            }
            AttemptOutcome::Locked { remaining_seconds } => {
                debug!(client = %client_id, remaining_seconds, "Login refused while locked");
                LoginOutcome::Locked { remaining_seconds }
            }
        }
    }

    /// Look up a live session by its token
    pub fn session(&self, token: &str, now: u64) -> Option<AdminSession> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&sha256(token.as_bytes()))
            .filter(|session| !self.is_expired(session, now))
            .cloned()
    }

    /// Like [`Self::session`] but fails when there is no live session
    pub fn require_session(&self, token: Option<&str>, now: u64) -> Result<AdminSession> {
        token
            .and_then(|token| self.session(token, now))
            .ok_or(AuthError::AuthenticationRequired)
    }

    /// End the session identified by `token`
    pub fn logout(&self, token: Option<&str>) -> Result<AdminSession> {
        let token = token.ok_or(AuthError::NotLoggedIn)?;
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&sha256(token.as_bytes()))
            .ok_or(AuthError::NotLoggedIn)?;

        info!(client = %removed.client_id, "Admin logged out");
        Ok(removed)
    }

    pub fn auth_info(&self, token: Option<&str>, now: u64) -> AuthInfo {
        let session = token.and_then(|token| self.session(token, now));
        AuthInfo::from_session(session.as_ref())
    }

    /// Lockout settings and record for a client
    pub fn security_info(&self, client_id: &str, now: u64) -> SecurityInfo {
        let config = self.lockout.config();
        SecurityInfo {
            max_attempts: config.max_attempts,
            lockout_duration: config.window_seconds,
            status: self.lockout.status(client_id, now),
        }
    }

    /// Drop stale lockout records and expired sessions
    ///
    /// Returns `(lockout_records_removed, sessions_removed)`.
    pub fn sweep(&self, now: u64) -> (usize, usize) {
        let records = self.lockout.sweep(now);

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        let expired = before - sessions.len();

        (records, expired)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn is_expired(&self, session: &AdminSession, now: u64) -> bool {
        now.saturating_sub(session.created_at) > self.session_ttl
    }
}
