//! Persisted document types.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Document format version written to new files
pub const DOCUMENT_VERSION: &str = "1.0";

/// A dashboard card as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub url: String,
    pub description: String,
    pub order: u32,
    pub created_time: String,
}

impl Card {
    /// Whether a stored card carries the fields the panel needs to render it
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty()
            && !self.name.trim().is_empty()
            && !self.icon.trim().is_empty()
            && !self.url.trim().is_empty()
    }
}

/// Document metadata block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub total_cards: usize,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            last_updated: None,
            total_cards: 0,
            version: default_version(),
        }
    }
}

/// The whole persisted card document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDocument {
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub config: DocumentConfig,
}

impl CardDocument {
    /// Empty document stamped with the current time
    pub fn empty() -> Self {
        let mut document = Self::default();
        document.touch();
        document
    }

    /// Replace the card list and refresh the metadata
    pub fn with_cards(mut self, cards: &[Card]) -> Self {
        self.cards = cards.to_vec();
        self.touch();
        self
    }

    fn touch(&mut self) {
        self.config.last_updated = Some(iso_timestamp());
        self.config.total_cards = self.cards.len();
    }
}

/// On-disk shape before individual cards are checked
#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    cards: Vec<serde_json::Value>,
    #[serde(default)]
    config: DocumentConfig,
}

impl RawDocument {
    /// Keep the well-formed cards, sorted by display order
    pub(crate) fn into_document(self) -> CardDocument {
        let mut cards: Vec<Card> = self
            .cards
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Card>(value.clone()) {
                Ok(card) if card.is_well_formed() => Some(card),
                _ => {
                    warn!(entry = %value, "Skipping invalid card entry");
                    None
                }
            })
            .collect();

        cards.sort_by_key(|card| card.order);

        CardDocument {
            cards,
            config: self.config,
        }
    }
}

/// Local time in ISO-8601 with microseconds, the format used for all stored timestamps
pub fn iso_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
