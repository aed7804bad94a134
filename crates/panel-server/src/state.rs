use anyhow::{Context, Result};
use panel_auth::AuthService;
use panel_cards::CardService;
use panel_storage::{open_storage, Storage};
use std::sync::Arc;

use crate::config::Config;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    pub card_service: Arc<CardService<dyn Storage>>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let storage = open_storage(&config.data_path)
            .with_context(|| format!("Failed to open card storage at {:?}", config.data_path))?;
        Ok(Self::with_storage(config, storage))
    }

    /// Build state around an already opened storage handle
    pub fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Self {
        tracing::info!(storage = %storage.describe(), "Card storage ready");

        let card_service = Arc::new(CardService::new(storage));
        let auth_service = Arc::new(AuthService::new(
            &config.admin_password,
            config.lockout,
            config.session_ttl,
        ));

        AppState {
            config,
            card_service,
            auth_service,
        }
    }
}
