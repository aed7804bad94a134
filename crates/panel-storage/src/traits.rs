//! Storage trait definitions.

use crate::errors::Result;
use crate::types::{Card, CardDocument};
use async_trait::async_trait;
use std::path::PathBuf;

/// Storage interface for the card document
///
/// Every call reads or writes the whole document; there are no partial
/// updates. Callers that modify cards must serialize the load/save pair
/// themselves.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load the document with invalid cards skipped and cards sorted by order
    async fn load(&self) -> Result<CardDocument>;

    /// Back up the current document, then replace its card list
    async fn save(&self, cards: &[Card]) -> Result<()>;

    /// Copy the current document to the backup location
    ///
    /// Returns `Ok(None)` when there is nothing to back up.
    async fn backup(&self) -> Result<Option<PathBuf>>;

    /// Size of the persisted document in bytes
    async fn size_bytes(&self) -> Result<u64>;

    /// Where the document lives, for logs
    fn describe(&self) -> String;
}
