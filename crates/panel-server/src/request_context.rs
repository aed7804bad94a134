use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, Extensions, HeaderMap},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the admin session token
pub const SESSION_COOKIE: &str = "panel_session";

/// Resolve the client identifier used for lockout tracking
///
/// Forwarding headers are honored only when the direct peer is one of
/// `trusted_proxies`; otherwise any client could pick its own identity and
/// sidestep the lockout. The rightmost `X-Forwarded-For` entry wins since it
/// was appended by the trusted proxy itself.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    trusted_proxies: &[IpAddr],
) -> String {
    let Some(direct) = direct_ip else {
        tracing::warn!("No direct connection IP available for request");
        return "unknown".to_string();
    };

    if trusted_proxies.contains(&direct) {
        let forwarded = header_str(headers, "X-Forwarded-For")
            .and_then(|chain| chain.split(',').next_back())
            .and_then(parse_ip);
        let real_ip = || header_str(headers, "X-Real-IP").and_then(parse_ip);

        if let Some(ip) = forwarded.or_else(real_ip) {
            return ip.to_string();
        }
    }

    direct.to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

fn parse_ip(value: &str) -> Option<IpAddr> {
    value.trim().parse().ok()
}

/// Session token from the `Authorization: Bearer` header or the session cookie
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = header_str(headers, header::AUTHORIZATION.as_str())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Address of the directly connected peer, set by `into_make_service_with_connect_info`
pub fn peer_ip(extensions: &Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
}

/// Request metadata: who is calling and with which session
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Client IP address, the key for login lockout
    pub client_ip: String,

    pub user_agent: String,

    /// Raw session token, if the request carried one
    pub session_token: Option<String>,
}

impl RequestContext {
    pub fn from_parts(parts: &Parts, trusted_proxies: &[IpAddr]) -> Self {
        Self::from_head(&parts.headers, &parts.extensions, trusted_proxies)
    }

    /// Build from a request head, also usable on a full `Request` in middleware
    pub fn from_head(
        headers: &HeaderMap,
        extensions: &Extensions,
        trusted_proxies: &[IpAddr],
    ) -> Self {
        let client_ip = extract_client_ip(headers, peer_ip(extensions), trusted_proxies);

        let user_agent = header_str(headers, header::USER_AGENT.as_str())
            .unwrap_or("unknown")
            .to_string();

        Self {
            client_ip,
            user_agent,
            session_token: extract_session_token(headers),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::from_parts(
            parts,
            &state.config.trusted_proxies,
        ))
    }
}
