//! Shared API helper functions.

use axum::Json;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ApiError;

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: usize = 20;

/// Largest page size a client may request
pub const MAX_PER_PAGE: usize = 100;

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn success<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: Some(data),
    })
}

/// Success envelope without a `data` field
pub fn acknowledge(message: impl Into<String>) -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        success: true,
        message: message.into(),
        data: None,
    })
}

/// Current unix time in seconds
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slice one page out of `items`; pages past the end are empty
pub fn paginate<T: Serialize>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(per_page);
    let start = page.saturating_sub(1).saturating_mul(per_page);

    let items = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
        },
    }
}

/// Parse an optional positive integer query parameter within `1..=max`
pub fn parse_bounded(
    name: &str,
    value: Option<&str>,
    default: usize,
    max: usize,
) -> Result<usize, ApiError> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(default);
    };

    let parsed: usize = raw
        .parse()
        .map_err(|_| ApiError::Validation(format!("{} must be a positive integer", name)))?;

    if parsed < 1 || parsed > max {
        return Err(ApiError::Validation(format!(
            "{} must be between 1 and {}",
            name, max
        )));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_middle_page() {
        let page = paginate((1..=45).collect::<Vec<_>>(), 2, 20);
        assert_eq!(page.items.first(), Some(&21));
        assert_eq!(page.items.len(), 20);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_prev);
        assert!(page.pagination.has_next);
    }

    #[test]
    fn test_paginate_past_end() {
        let page = paginate(vec![1, 2, 3], 5, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 2);
        assert!(!page.pagination.has_next);
    }

    #[test]
    fn test_parse_bounded() {
        assert_eq!(parse_bounded("page", None, 1, usize::MAX).unwrap(), 1);
        assert_eq!(parse_bounded("per_page", Some("50"), 20, 100).unwrap(), 50);
        assert!(parse_bounded("per_page", Some("101"), 20, 100).is_err());
        assert!(parse_bounded("page", Some("0"), 1, usize::MAX).is_err());
        assert!(parse_bounded("page", Some("-1"), 1, usize::MAX).is_err());
        assert!(parse_bounded("page", Some("two"), 1, usize::MAX).is_err());
    }
}
