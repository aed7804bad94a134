use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use panel_auth::{LoginOutcome, SESSION_EXPIRES};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::helpers::{acknowledge, current_timestamp, success};
use crate::{
    error::ApiError,
    extractors::ApiJson,
    request_context::{RequestContext, SESSION_COOKIE},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub authenticated: bool,
    pub session_type: &'static str,
    pub token: String,
}

fn session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, token)
}

fn expired_session_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

fn with_cookie(mut response: Response, cookie: String) -> Result<Response, ApiError> {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid cookie value: {}", e)))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

/// POST /api/auth
pub async fn login(
    State(state): State<Arc<AppState>>,
    context: RequestContext,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    tracing::debug!(
        ip = %context.client_ip,
        user_agent = %context.user_agent,
        "Admin login attempt"
    );

    let outcome = state
        .auth_service
        .login(&request.password, &context.client_ip, current_timestamp());

    match outcome {
        LoginOutcome::Admitted { token, .. } => {
            let cookie = session_cookie(&token);
            let body = success(
                LoginResponse {
                    authenticated: true,
                    session_type: SESSION_EXPIRES,
                    token,
                },
                "Authentication successful",
            );
            with_cookie(body.into_response(), cookie)
        }
        LoginOutcome::Rejected { remaining_attempts } => {
            Err(ApiError::AuthenticationFailed { remaining_attempts })
        }
        LoginOutcome::LockedOut { lockout_seconds } => {
            Err(ApiError::LockedOut { lockout_seconds })
        }
        LoginOutcome::Locked { remaining_seconds } => {
            Err(ApiError::Locked { remaining_seconds })
        }
    }
}

/// POST /api/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    context: RequestContext,
) -> Result<Response, ApiError> {
    state.auth_service.logout(context.token())?;
    with_cookie(
        acknowledge("Logged out").into_response(),
        expired_session_cookie(),
    )
}

/// GET /api/auth/status
pub async fn status(
    State(state): State<Arc<AppState>>,
    context: RequestContext,
) -> impl IntoResponse {
    let info = state
        .auth_service
        .auth_info(context.token(), current_timestamp());
    success(info, "Authentication status retrieved")
}

/// GET /api/auth/security
pub async fn security(
    State(state): State<Arc<AppState>>,
    context: RequestContext,
) -> impl IntoResponse {
    let info = state
        .auth_service
        .security_info(&context.client_ip, current_timestamp());
    success(info, "Security information retrieved")
}
