use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, Response},
    middleware::Next,
};
use std::sync::Arc;
use std::time::Instant;

use crate::request_context::RequestContext;
use crate::state::AppState;

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Longest client-supplied request ID that is kept as is
const MAX_REQUEST_ID_LEN: usize = 128;

/// Reuse a usable client request ID, otherwise mint a UUID
fn request_id_for(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
        .filter(|value| value.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Tag each request with an ID and log its start and completion
///
/// The ID is forwarded to handlers and echoed on the response.
pub async fn request_id_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response<Body> {
    let request_id = request_id_for(req.headers());
    req.headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.clone());

    let context = RequestContext::from_head(
        req.headers(),
        req.extensions(),
        &state.config.trusted_proxies,
    );
    let id = request_id.to_str().unwrap_or_default().to_string();

    tracing::info!(
        request_id = %id,
        method = %req.method(),
        uri = %req.uri(),
        client = %context.client_ip,
        user_agent = %context.user_agent,
        "Request started"
    );

    let start = Instant::now();
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id);

    tracing::info!(
        request_id = %id,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    response
}
