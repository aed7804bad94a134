use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::{
    api::helpers::current_timestamp, error::ApiError, request_context::RequestContext,
    state::AppState,
};

/// Extractor for admin-only requests
///
/// Resolves the session token from the request and checks it against the
/// live session table; anything else is rejected with 401.
pub struct AdminUser {
    pub session: panel_auth::AdminSession,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let context = RequestContext::from_parts(parts, &state.config.trusted_proxies);

        let session = state
            .auth_service
            .require_session(context.token(), current_timestamp())
            .map_err(|_| {
                tracing::debug!(ip = %context.client_ip, "Admin session missing or expired");
                ApiError::AuthenticationRequired
            })?;

        Ok(AdminUser { session })
    }
}

/// JSON body extractor that reports failures in the API envelope
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => Err(ApiError::InvalidContentType),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}
