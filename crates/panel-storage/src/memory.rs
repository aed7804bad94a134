//! In-memory storage implementation.

use crate::{
    errors::{Result, StorageError},
    traits::Storage,
    types::{Card, CardDocument},
};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Data path value that selects in-memory storage
pub const MEMORY_PATH: &str = ":memory:";

/// Card document held in memory, lost on restart
pub struct MemoryStorage {
    document: RwLock<CardDocument>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_cards(&[])
    }

    /// Start from an existing card list
    pub fn with_cards(cards: &[Card]) -> Self {
        Self {
            document: RwLock::new(CardDocument::empty().with_cards(cards)),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn load(&self) -> Result<CardDocument> {
        let mut document = self.document.read().await.clone();
        document.cards.sort_by_key(|card| card.order);
        Ok(document)
    }

    async fn save(&self, cards: &[Card]) -> Result<()> {
        let mut document = self.document.write().await;
        *document = document.clone().with_cards(cards);
        Ok(())
    }

    async fn backup(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }

    async fn size_bytes(&self) -> Result<u64> {
        let document = self.document.read().await;
        serde_json::to_vec_pretty(&*document)
            .map(|bytes| bytes.len() as u64)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn describe(&self) -> String {
        MEMORY_PATH.to_string()
    }
}
