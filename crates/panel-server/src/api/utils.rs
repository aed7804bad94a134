use axum::{extract::State, response::IntoResponse};
use panel_cards::CardStats;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    docs::{API_VERSION, ENDPOINTS, SUPPORTED_METHODS},
    helpers::success,
};
use crate::{error::ApiError, extractors::ApiJson, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ValidateNameRequest {
    pub name: String,
    pub exclude_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateNameResponse {
    pub name: String,
    pub is_valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiStats {
    pub api_version: &'static str,
    pub endpoints_count: usize,
    pub supported_methods: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub service: CardStats,
    pub api: ApiStats,
}

/// POST /api/validate-name
///
/// Always 200; the verdict is in `data.is_valid`.
pub async fn validate_name(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ValidateNameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let check = state
        .card_service
        .validate_name(&request.name, request.exclude_id.as_deref())
        .await?;

    let message = if check.is_valid {
        "Name check passed"
    } else {
        "Name check failed"
    };

    Ok(success(
        ValidateNameResponse {
            name: request.name,
            is_valid: check.is_valid,
            message: check.message,
        },
        message,
    ))
}

/// GET /api/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let service = state.card_service.stats().await?;

    Ok(success(
        StatsResponse {
            service,
            api: ApiStats {
                api_version: API_VERSION,
                endpoints_count: ENDPOINTS.len(),
                supported_methods: SUPPORTED_METHODS,
            },
        },
        "Statistics retrieved",
    ))
}
