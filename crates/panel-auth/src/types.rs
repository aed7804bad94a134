use panel_policy::LockoutStatus;
use serde::Serialize;

/// Session type reported to clients; sessions end with the browser
pub const SESSION_TYPE: &str = "browser_session";

/// Reported expiry for browser sessions
pub const SESSION_EXPIRES: &str = "browser_close";

/// An authenticated admin session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSession {
    /// Client the session was issued to
    pub client_id: String,
    /// Unix seconds at login
    pub created_at: u64,
}

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Password accepted; `token` is shown to the client once and only its hash is kept
    Admitted { token: String, session: AdminSession },

    /// Wrong password, attempts remain
    Rejected { remaining_attempts: u32 },

    /// Wrong password that triggered a lockout
    LockedOut { lockout_seconds: u64 },

    /// Client is locked out; the password was not considered
    Locked { remaining_seconds: u64 },
}

/// Authentication state of a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthInfo {
    pub authenticated: bool,
    pub auth_time: Option<u64>,
    pub session_type: Option<&'static str>,
    pub expires: Option<&'static str>,
}

impl AuthInfo {
    pub(crate) fn from_session(session: Option<&AdminSession>) -> Self {
        match session {
            Some(session) => Self {
                authenticated: true,
                auth_time: Some(session.created_at),
                session_type: Some(SESSION_TYPE),
                expires: Some(SESSION_EXPIRES),
            },
            None => Self {
                authenticated: false,
                auth_time: None,
                session_type: None,
                expires: None,
            },
        }
    }
}

/// Lockout settings plus the caller's current record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityInfo {
    pub max_attempts: u32,
    pub lockout_duration: u64,
    #[serde(flatten)]
    pub status: LockoutStatus,
}
