//! Database module
//!
//! This module provides all database functionality including:
//! - Schema, migrations and first-boot seeding
//! - Model definitions
//! - Repository layer for CRUD operations

pub mod models;
pub mod repository;
pub mod schema;

pub use models::*;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Connections kept open for request handlers
const MAX_CONNECTIONS: u32 = 5;

/// How long a writer waits on another request's transaction before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the board database, creating, migrating and seeding it on first boot.
///
/// Every connection enforces foreign keys, since board and note ownership
/// relies on them rather than on application checks.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening board database at: {:?}", db_path);

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    initialize_database(&pool).await?;

    tracing::info!("Board database ready");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_pool_creates_nested_file() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("data").join("boards.db");

        let pool = create_pool(&db_path).await.unwrap();
        assert!(db_path.exists());

        let foreign_keys: i32 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(foreign_keys, 1);
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("boards.db");

        let pool = create_pool(&db_path).await.unwrap();
        Repository::new(pool.clone())
            .create_project("Kept", None)
            .await
            .unwrap();
        pool.close().await;

        let reopened = Repository::new(create_pool(&db_path).await.unwrap());
        let names: Vec<String> = reopened
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Default".to_string(), "Kept".to_string()]);
    }
}
