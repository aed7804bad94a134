use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use panel_cards::{Card, CardOrder, CardUpdate, NewCard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::helpers::{
    acknowledge, paginate, parse_bounded, success, Page, DEFAULT_PER_PAGE, MAX_PER_PAGE,
};
use crate::{
    error::ApiError,
    extractors::{AdminUser, ApiJson},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ListCardsQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CardListing {
    Paged(Page<Card>),
    All { items: Vec<Card>, total: usize },
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub orders: Vec<CardOrder>,
}

/// GET /api/cards
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCardsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = parse_bounded("page", query.page.as_deref(), 1, usize::MAX)?;
    let per_page = parse_bounded(
        "per_page",
        query.per_page.as_deref(),
        DEFAULT_PER_PAGE,
        MAX_PER_PAGE,
    )?;

    let cards = state
        .card_service
        .list_cards(query.search.as_deref())
        .await?;

    let total = cards.len();
    let message = format!("Retrieved {} cards", total);

    let listing = if total > per_page {
        CardListing::Paged(paginate(cards, page, per_page))
    } else {
        CardListing::All {
            items: cards,
            total,
        }
    };

    Ok(success(listing, message))
}

/// GET /api/cards/:card_id
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(card_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.card_service.get_card(&card_id).await?;
    Ok(success(card, "Card retrieved"))
}

/// POST /api/cards
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    ApiJson(input): ApiJson<NewCard>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.card_service.create_card(input).await?;

    tracing::info!(
        card_id = %card.id,
        client = %admin.session.client_id,
        "Card created via API"
    );

    let message = format!("Card '{}' created", card.name);
    Ok((StatusCode::CREATED, success(card, message)))
}

/// PUT /api/cards/:card_id
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(card_id): Path<String>,
    ApiJson(update): ApiJson<CardUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.card_service.update_card(&card_id, update).await?;

    tracing::info!(
        card_id = %card.id,
        client = %admin.session.client_id,
        "Card updated via API"
    );

    let message = format!("Card '{}' updated", card.name);
    Ok(success(card, message))
}

/// DELETE /api/cards/:card_id
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    Path(card_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let card = state.card_service.delete_card(&card_id).await?;

    tracing::info!(
        card_id = %card.id,
        client = %admin.session.client_id,
        "Card deleted via API"
    );

    Ok(acknowledge(format!("Card '{}' deleted", card.name)))
}

/// POST /api/cards/reorder
pub async fn reorder_cards(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    ApiJson(request): ApiJson<ReorderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.card_service.reorder_cards(&request.orders).await?;

    tracing::info!(
        count = request.orders.len(),
        client = %admin.session.client_id,
        "Cards reordered via API"
    );

    Ok(acknowledge(format!(
        "Reordered {} cards",
        request.orders.len()
    )))
}
