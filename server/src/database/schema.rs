//! Database schema and migrations
//!
//! This module handles database initialization, schema migrations and
//! the first-boot seed. Uses SQLite with WAL mode for crash safety.

use crate::config::{DEFAULT_BOARD_BACKGROUND, DEFAULT_SEED_NAME};
use crate::error::Result;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

/// Initialize database with schema and seed data
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Initializing database schema");

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Board and note ownership is enforced by foreign keys
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    tracing::info!("Current database version: {}", current_version);

    apply_migrations(pool, current_version).await?;
    seed_defaults(pool).await?;

    tracing::info!("Database initialization complete");
    Ok(())
}

async fn apply_migrations(pool: &SqlitePool, current_version: i32) -> Result<()> {
    for (version, sql) in get_migrations() {
        if version > current_version {
            tracing::info!("Applying migration version {}", version);

            let mut tx = pool.begin().await?;

            for statement in sql.split(';').filter(|s| !s.trim().is_empty()) {
                sqlx::query(statement).execute(&mut *tx).await?;
            }

            sqlx::query("INSERT INTO migrations (version) VALUES (?)")
                .bind(version)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            tracing::info!("Migration version {} applied successfully", version);
        }
    }

    Ok(())
}

fn get_migrations() -> Vec<(i32, &'static str)> {
    vec![(1, include_str!("migrations/001_initial_schema.sql"))]
}

/// Create a default project and board when the database has none.
///
/// Runs on every boot; it only writes when a table is empty, so the
/// "at least one board" invariant holds from the first request on.
async fn seed_defaults(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    let project_id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM projects ORDER BY id LIMIT 1")
            .fetch_optional(&mut *tx)
            .await?;

    let project_id = match project_id {
        Some(id) => id,
        None => {
            tracing::info!("Seeding default project");
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO projects (name, created_at) VALUES (?, ?) RETURNING id",
            )
            .bind(DEFAULT_SEED_NAME)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let board_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
        .fetch_one(&mut *tx)
        .await?;

    if board_count == 0 {
        tracing::info!("Seeding default board in project {}", project_id);
        sqlx::query(
            r#"
            INSERT INTO boards (project_id, name, background_color, snapping, position, created_at)
            VALUES (?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(project_id)
        .bind(DEFAULT_SEED_NAME)
        .bind(DEFAULT_BOARD_BACKGROUND)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
