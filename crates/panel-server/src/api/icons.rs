//! Built-in Bootstrap Icons catalog offered to the card editor.

use axum::{extract::Query, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::helpers::success;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub name: &'static str,
    pub description: &'static str,
}

const fn icon(name: &'static str, description: &'static str) -> Icon {
    Icon { name, description }
}

pub const CATALOG: &[(&str, &[Icon])] = &[
    (
        "system",
        &[
            icon("bi-server", "Server"),
            icon("bi-database", "Database"),
            icon("bi-hdd", "Hard disk"),
            icon("bi-cpu", "Processor"),
            icon("bi-memory", "Memory"),
            icon("bi-router", "Router"),
            icon("bi-wifi", "Wireless network"),
        ],
    ),
    (
        "monitoring",
        &[
            icon("bi-activity", "Activity"),
            icon("bi-graph-up", "Graph up"),
            icon("bi-graph-down", "Graph down"),
            icon("bi-speedometer", "Speedometer"),
            icon("bi-bar-chart", "Bar chart"),
            icon("bi-pie-chart", "Pie chart"),
            icon("bi-eye", "Watch"),
        ],
    ),
    (
        "storage",
        &[
            icon("bi-folder", "Folder"),
            icon("bi-file", "File"),
            icon("bi-cloud", "Cloud storage"),
            icon("bi-archive", "Archive"),
            icon("bi-box", "Container"),
            icon("bi-collection", "Collection"),
        ],
    ),
    (
        "development",
        &[
            icon("bi-github", "GitHub"),
            icon("bi-git", "Git"),
            icon("bi-code", "Code"),
            icon("bi-terminal", "Terminal"),
            icon("bi-bug", "Debugging"),
            icon("bi-tools", "Tools"),
        ],
    ),
    (
        "network",
        &[
            icon("bi-globe", "Internet"),
            icon("bi-share", "Share"),
            icon("bi-link", "Link"),
            icon("bi-ethernet", "Ethernet"),
            icon("bi-proxy", "Proxy"),
        ],
    ),
    (
        "security",
        &[
            icon("bi-shield", "Shield"),
            icon("bi-lock", "Lock"),
            icon("bi-unlock", "Unlock"),
            icon("bi-key", "Key"),
            icon("bi-person-check", "User verification"),
        ],
    ),
    (
        "media",
        &[
            icon("bi-camera", "Camera"),
            icon("bi-film", "Video"),
            icon("bi-music-note", "Music"),
            icon("bi-image", "Image"),
            icon("bi-play", "Play"),
            icon("bi-cast", "Cast"),
        ],
    ),
    (
        "communication",
        &[
            icon("bi-chat", "Chat"),
            icon("bi-envelope", "Mail"),
            icon("bi-telephone", "Telephone"),
            icon("bi-broadcast", "Broadcast"),
            icon("bi-megaphone", "Megaphone"),
        ],
    ),
    (
        "general",
        &[
            icon("bi-gear", "Settings"),
            icon("bi-house", "Home"),
            icon("bi-star", "Favorite"),
            icon("bi-heart", "Like"),
            icon("bi-bookmark", "Bookmark"),
            icon("bi-flag", "Flag"),
            icon("bi-lightning", "Lightning"),
            icon("bi-fire", "Fire"),
        ],
    ),
];

#[derive(Debug, Deserialize)]
pub struct IconQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IconListing {
    pub categories: BTreeMap<&'static str, Vec<Icon>>,
    pub total_count: usize,
    pub search_query: Option<String>,
    pub category_filter: Option<String>,
}

/// Filter the catalog; categories left empty are omitted
pub fn filter_icons(search: Option<&str>, category: Option<&str>) -> IconListing {
    let term = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    let mut categories = BTreeMap::new();
    for (name, icons) in CATALOG {
        if category.is_some_and(|wanted| wanted != *name) {
            continue;
        }

        let matching: Vec<Icon> = icons
            .iter()
            .filter(|icon| match &term {
                Some(term) => {
                    icon.name.to_lowercase().contains(term)
                        || icon.description.to_lowercase().contains(term)
                }
                None => true,
            })
            .copied()
            .collect();

        if !matching.is_empty() {
            categories.insert(*name, matching);
        }
    }

    IconListing {
        total_count: categories.values().map(Vec::len).sum(),
        categories,
        search_query: term,
        category_filter: category.map(str::to_string),
    }
}

/// GET /api/icons
pub async fn list_icons(Query(query): Query<IconQuery>) -> impl IntoResponse {
    let listing = filter_icons(query.search.as_deref(), query.category.as_deref());
    let message = format!("Found {} icons", listing.total_count);
    success(listing, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_catalog() {
        let listing = filter_icons(None, None);
        let expected: usize = CATALOG.iter().map(|(_, icons)| icons.len()).sum();
        assert_eq!(listing.total_count, expected);
        assert_eq!(listing.categories.len(), CATALOG.len());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let listing = filter_icons(Some("GRAPH"), None);
        assert_eq!(listing.total_count, 2);
        assert_eq!(listing.categories.keys().copied().collect::<Vec<_>>(), vec!["monitoring"]);
        assert_eq!(listing.search_query.as_deref(), Some("graph"));
    }

    #[test]
    fn test_category_filter() {
        let listing = filter_icons(None, Some("security"));
        assert_eq!(listing.total_count, 5);
        assert_eq!(listing.category_filter.as_deref(), Some("security"));

        let none = filter_icons(None, Some("unknown"));
        assert_eq!(none.total_count, 0);
        assert!(none.categories.is_empty());
    }
}
