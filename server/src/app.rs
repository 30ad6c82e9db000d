//! Application state and initialization
//!
//! This module manages the shared state handed to every request handler.

use crate::config::AppConfig;
use crate::database::{create_pool, Repository};
use crate::error::Result;
use std::sync::Arc;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repo: Repository, config: AppConfig) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }
}

/// Application setup - called once on startup
///
/// Opens (and if needed creates, migrates and seeds) the database.
pub async fn setup(config: AppConfig) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("Database file: {:?}", config.database_path);

    let pool = create_pool(&config.database_path).await?;
    let state = AppState::new(Repository::new(pool), config);

    tracing::info!("Application initialized successfully");

    Ok(state)
}
