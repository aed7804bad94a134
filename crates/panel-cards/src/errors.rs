//! Card service error types.

use panel_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("{0}")]
    Validation(String),

    #[error("Card not found: {0}")]
    NotFound(String),

    #[error("Card name '{0}' already exists")]
    NameConflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, CardError>;
