use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use super::helpers::success;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct DataHealth {
    pub data_file_accessible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cards: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Error code only, the details stay in the server log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub run_mode: &'static str,
    pub storage: String,
    pub active_sessions: usize,
    pub data: DataHealth,
}

/// GET /api/health
///
/// 200 when the card document can be read, 503 otherwise.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, data) = match state.card_service.stats().await {
        Ok(stats) => (
            "healthy",
            DataHealth {
                data_file_accessible: true,
                total_cards: Some(stats.total_cards),
                last_updated: stats.last_updated,
                error: None,
            },
        ),
        Err(e) => {
            tracing::warn!("Health check could not read card data: {}", e);
            (
                "degraded",
                DataHealth {
                    data_file_accessible: false,
                    total_cards: None,
                    last_updated: None,
                    error: Some(ApiError::from(e).code()),
                },
            )
        }
    };

    let code = if data.data_file_accessible {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: panel_storage::iso_timestamp(),
        run_mode: state.config.run_mode.as_str(),
        storage: state.card_service.storage().describe(),
        active_sessions: state.auth_service.active_sessions(),
        data,
    };

    (code, success(response, format!("Service status: {}", status)))
}
