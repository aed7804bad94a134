use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use panel_auth::AuthError;
use panel_cards::CardError;
use panel_storage::StorageError;
use serde::Serialize;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Request body must be JSON")]
    InvalidContentType,

    #[error("Logout failed: {0}")]
    LogoutFailed(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Wrong password, {remaining_attempts} attempts left")]
    AuthenticationFailed { remaining_attempts: u32 },

    /// Lockout just triggered by this attempt
    #[error("Too many failed attempts, locked for {lockout_seconds} seconds")]
    LockedOut { lockout_seconds: u64 },

    /// Lockout still running from earlier failures
    #[error("Too many failed attempts, retry in {remaining_seconds} seconds")]
    Locked { remaining_seconds: u64 },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        self.parts().1
    }

    fn parts(&self) -> (StatusCode, &'static str, Option<serde_json::Value>) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", None),
            ApiError::InvalidContentType => (StatusCode::BAD_REQUEST, "invalid_content_type", None),
            ApiError::LogoutFailed(_) => (StatusCode::BAD_REQUEST, "logout_failed", None),
            ApiError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, "authentication_required", None)
            }
            ApiError::AuthenticationFailed { remaining_attempts } => (
                StatusCode::UNAUTHORIZED,
                "authentication_failed",
                Some(serde_json::json!({ "attempts_left": remaining_attempts })),
            ),
            ApiError::LockedOut { lockout_seconds } => (
                StatusCode::TOO_MANY_REQUESTS,
                "account_locked",
                Some(serde_json::json!({ "locked": true, "lockout_duration": lockout_seconds })),
            ),
            ApiError::Locked { remaining_seconds } => (
                StatusCode::TOO_MANY_REQUESTS,
                "account_locked",
                Some(serde_json::json!({ "locked": true, "remaining_time": remaining_seconds })),
            ),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", None),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "name_already_exists", None),
            ApiError::Storage(StorageError::FileNotFound(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "file_not_found", None)
            }
            ApiError::Storage(StorageError::JsonDecode(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "json_decode_error", None)
            }
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "unexpected_error", None),
        }
    }

    fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::LockedOut { lockout_seconds } => Some(*lockout_seconds),
            ApiError::Locked { remaining_seconds } => Some(*remaining_seconds),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        let message = match &self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => {
                msg.clone()
            }
            ApiError::LogoutFailed(msg) => msg.clone(),
            ApiError::Storage(err) => {
                tracing::error!("Storage error: {}", err);
                match err {
                    StorageError::FileNotFound(_) => "Data file not found".to_string(),
                    StorageError::JsonDecode(_) => "Data file is corrupt".to_string(),
                    _ => "Failed to access card storage".to_string(),
                }
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:?}", err);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let retry_after = self.retry_after();

        let body = Json(ErrorResponse {
            success: false,
            error,
            message,
            details,
        });

        let mut response = (status, body).into_response();
        if let Some(seconds) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<CardError> for ApiError {
    fn from(error: CardError) -> Self {
        match error {
            CardError::Validation(msg) => ApiError::Validation(msg),
            CardError::NotFound(id) => ApiError::NotFound(format!("Card not found: {}", id)),
            conflict @ CardError::NameConflict(_) => ApiError::Conflict(conflict.to_string()),
            CardError::Storage(err) => ApiError::Storage(err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NotLoggedIn => ApiError::LogoutFailed("Not logged in".to_string()),
            AuthError::AuthenticationRequired => ApiError::AuthenticationRequired,
        }
    }
}
