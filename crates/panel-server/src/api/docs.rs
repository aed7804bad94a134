use axum::response::IntoResponse;
use serde::Serialize;
use serde_json::json;

use super::helpers::{success, DEFAULT_PER_PAGE, MAX_PER_PAGE};

pub const API_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub admin: bool,
    pub description: &'static str,
}

const fn endpoint(
    method: &'static str,
    path: &'static str,
    admin: bool,
    description: &'static str,
) -> Endpoint {
    Endpoint {
        method,
        path,
        admin,
        description,
    }
}

/// Every route under `/api`
pub const ENDPOINTS: &[Endpoint] = &[
    endpoint("POST", "/api/auth", false, "Log in with the admin password"),
    endpoint("POST", "/api/logout", false, "End the current admin session"),
    endpoint("GET", "/api/auth/status", false, "Current authentication status"),
    endpoint("GET", "/api/auth/security", false, "Lockout settings and state for the caller"),
    endpoint("GET", "/api/cards", false, "List cards with optional search and paging"),
    endpoint("POST", "/api/cards", true, "Create a card"),
    endpoint("GET", "/api/cards/:card_id", false, "Fetch one card"),
    endpoint("PUT", "/api/cards/:card_id", true, "Update card fields"),
    endpoint("DELETE", "/api/cards/:card_id", true, "Delete a card"),
    endpoint("POST", "/api/cards/reorder", true, "Assign new display positions"),
    endpoint("GET", "/api/icons", false, "Browse the icon catalog"),
    endpoint("POST", "/api/validate-name", false, "Check whether a card name is free"),
    endpoint("GET", "/api/stats", false, "Card and API statistics"),
    endpoint("GET", "/api/docs", false, "This document"),
    endpoint("GET", "/api/health", false, "Service health"),
];

pub const SUPPORTED_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE"];

const ERROR_CODES: &[(&str, u16, &str)] = &[
    ("validation_error", 400, "Malformed input, query or JSON body"),
    ("invalid_content_type", 400, "Request body is not JSON"),
    ("logout_failed", 400, "No session to end"),
    ("authentication_required", 401, "Admin session missing or expired"),
    ("authentication_failed", 401, "Wrong password"),
    ("account_locked", 429, "Too many failed logins from this client"),
    ("not_found", 404, "Unknown card or route"),
    ("name_already_exists", 409, "Card name already in use"),
    ("file_not_found", 500, "Card data file missing"),
    ("json_decode_error", 500, "Card data file corrupt"),
    ("storage_error", 500, "Card storage failure"),
    ("unexpected_error", 500, "Unexpected server error"),
];

/// GET /api/docs
pub async fn api_docs() -> impl IntoResponse {
    let error_codes: Vec<_> = ERROR_CODES
        .iter()
        .map(|(code, status, description)| {
            json!({ "code": code, "status": status, "description": description })
        })
        .collect();

    let docs = json!({
        "title": "Server Panel API",
        "version": API_VERSION,
        "base_url": "/api",
        "authentication": "Admin routes take the session token from the panel_session cookie or an Authorization: Bearer header",
        "pagination": {
            "default_per_page": DEFAULT_PER_PAGE,
            "max_per_page": MAX_PER_PAGE,
        },
        "endpoints": ENDPOINTS,
        "error_codes": error_codes,
        "response_format": {
            "success": { "success": true, "message": "string", "data": "object (optional)" },
            "error": {
                "success": false,
                "error": "error code",
                "message": "string",
                "details": "object (optional)"
            }
        }
    });

    success(docs, "API documentation retrieved")
}

/// GET /
pub async fn index() -> impl IntoResponse {
    let endpoints: serde_json::Map<String, serde_json::Value> = ENDPOINTS
        .iter()
        .map(|e| (format!("{} {}", e.method, e.path), json!(e.description)))
        .collect();

    success(
        json!({
            "service": "panel-server",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": endpoints,
        }),
        "Server panel API is running",
    )
}
