//! Database initialization
//!
//! Creates the connection pool and ensures the catalog schema exists on
//! startup. Artists are stored as a JSON array in a text column so the
//! artist membership query can use `json_each`.

use hifier_common::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::info;

/// Open (and create if missing) the SQLite database at `path`.
pub async fn create_pool(path: &Path) -> Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the catalog schema if it does not exist.
pub async fn init_schema(pool: &Pool<Sqlite>) -> Result<()> {
    info!("Initializing catalog schema");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artists TEXT NOT NULL,
            album TEXT NOT NULL,
            cover_url TEXT NOT NULL,
            music_url TEXT NOT NULL,
            user_id TEXT NOT NULL,
            user_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            metadata TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tracks_created_at ON tracks (created_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
