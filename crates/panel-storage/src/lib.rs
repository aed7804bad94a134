//! # panel-storage
//!
//! Storage for the panel's card document: one JSON file holding every card
//! plus a small metadata block, rewritten whole on each save with a
//! timestamped backup copy taken first.

#![warn(clippy::all)]

pub mod errors;
pub mod json_file;
pub mod memory;
pub mod traits;
pub mod types;

pub use errors::{Result, StorageError};
pub use json_file::JsonFileStorage;
pub use memory::{MemoryStorage, MEMORY_PATH};
pub use traits::Storage;
pub use types::{iso_timestamp, Card, CardDocument, DocumentConfig, DOCUMENT_VERSION};

use std::path::Path;
use std::sync::Arc;

/// Open the storage selected by a configured data path
///
/// `:memory:` selects [`MemoryStorage`]; anything else is a JSON file path.
pub fn open_storage(data_path: &Path) -> Result<Arc<dyn Storage>> {
    if data_path.as_os_str() == MEMORY_PATH {
        Ok(Arc::new(MemoryStorage::new()))
    } else {
        Ok(Arc::new(JsonFileStorage::open(data_path)?))
    }
}
