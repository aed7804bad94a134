use serde::{Deserialize, Serialize};

/// Input for creating a card
#[derive(Debug, Clone, Deserialize)]
pub struct NewCard {
    pub name: String,
    pub icon: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// Partial card update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.icon.is_none() && self.url.is_none() && self.description.is_none()
    }
}

/// New display position for one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOrder {
    pub id: String,
    pub order: i64,
}

/// Outcome of a name availability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCheck {
    pub is_valid: bool,
    pub message: String,
}

impl NameCheck {
    pub(crate) fn available() -> Self {
        Self {
            is_valid: true,
            message: "Name is available".to_string(),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Summary of the stored cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardStats {
    pub total_cards: usize,
    pub last_updated: Option<String>,
    pub version: String,
    pub data_file_size: u64,
    pub oldest_card: Option<String>,
    pub newest_card: Option<String>,
    pub max_order: u32,
}
