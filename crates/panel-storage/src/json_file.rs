//! JSON file storage implementation.

use crate::{
    errors::{Result, StorageError},
    traits::Storage,
    types::{Card, CardDocument, RawDocument},
};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Directory under the data directory that receives backup copies
pub const BACKUP_DIR_NAME: &str = "backup";

/// Card document stored as a pretty-printed JSON file
pub struct JsonFileStorage {
    data_path: PathBuf,
    backup_dir: PathBuf,
}

impl JsonFileStorage {
    /// Open the document at `path`
    ///
    /// Creates the data and backup directories, and an empty document if
    /// the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data_path = path.as_ref().to_path_buf();
        let data_dir = data_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let backup_dir = data_dir.join(BACKUP_DIR_NAME);

        std::fs::create_dir_all(&data_dir)?;
        std::fs::create_dir_all(&backup_dir)?;

        if !data_path.exists() {
            let contents = encode(&CardDocument::empty())?;
            std::fs::write(&data_path, contents)?;
            info!("Created empty card document at {:?}", data_path);
        }

        debug!("Opened card document at {:?}", data_path);

        Ok(Self {
            data_path,
            backup_dir,
        })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    async fn read_raw(&self) -> Result<RawDocument> {
        let contents = tokio::fs::read_to_string(&self.data_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    StorageError::FileNotFound(self.data_path.display().to_string())
                }
                _ => StorageError::IoError(e),
            })?;

        serde_json::from_str(&contents).map_err(|e| StorageError::JsonDecode(e.to_string()))
    }

    async fn write_document(&self, document: &CardDocument) -> Result<()> {
        let contents = encode(document)?;
        let tmp_path = self.data_path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.data_path).await?;

        Ok(())
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn load(&self) -> Result<CardDocument> {
        Ok(self.read_raw().await?.into_document())
    }

    async fn save(&self, cards: &[Card]) -> Result<()> {
        self.backup().await?;

        let base = match self.read_raw().await {
            Ok(raw) => raw.into_document(),
            Err(e) => {
                warn!("Rebuilding document metadata, existing file unreadable: {}", e);
                CardDocument::default()
            }
        };

        let document = base.with_cards(cards);
        self.write_document(&document).await?;

        debug!(total_cards = cards.len(), "Saved card document");
        Ok(())
    }

    async fn backup(&self) -> Result<Option<PathBuf>> {
        if !tokio::fs::try_exists(&self.data_path).await? {
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.backup_dir).await?;

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = self
            .backup_dir
            .join(format!("cards_backup_{}.json", timestamp));

        tokio::fs::copy(&self.data_path, &backup_path)
            .await
            .map_err(|e| StorageError::Backup(format!("{}: {}", backup_path.display(), e)))?;

        debug!("Backed up card document to {:?}", backup_path);
        Ok(Some(backup_path))
    }

    async fn size_bytes(&self) -> Result<u64> {
        match tokio::fs::metadata(&self.data_path).await {
            Ok(metadata) => Ok(metadata.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.data_path.display().to_string()
    }
}

fn encode(document: &CardDocument) -> Result<String> {
    serde_json::to_string_pretty(document).map_err(|e| StorageError::Serialization(e.to_string()))
}
