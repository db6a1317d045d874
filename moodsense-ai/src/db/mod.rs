//! Database access for moodsense-ai
//!
//! SQLite store for persisted mood entries

pub mod mood_entries;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the database file (and its parent directory) if missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create moodsense-ai tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    // created_at is UTC "YYYY-MM-DD HH:MM:SS" so date() grouping works
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS mood_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            text_entry TEXT,
            text_sentiment REAL,
            visual_sentiment REAL,
            combined_score REAL NOT NULL,
            stress_level REAL NOT NULL,
            confidence REAL NOT NULL DEFAULT 0.5,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_mood_entries_user_created \
         ON mood_entries (user_id, created_at)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (mood_entries)");

    Ok(())
}
