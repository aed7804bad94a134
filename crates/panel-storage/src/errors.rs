//! Storage error types.

use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Data file is missing
    #[error("Data file not found: {0}")]
    FileNotFound(String),

    /// Data file is not a valid card document
    #[error("Invalid JSON in data file: {0}")]
    JsonDecode(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backup copy failed
    #[error("Backup failed: {0}")]
    Backup(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;
