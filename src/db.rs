use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Settings;

const CREATE_VIDEOS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS videos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(200) NOT NULL,
        url VARCHAR(400) NOT NULL,
        notes TEXT NULL,
        video_id VARCHAR(40) NOT NULL UNIQUE
    )
"#;

#[tracing::instrument(name = "init_db", skip(settings), fields(database_url = %settings.database_url))]
pub async fn init_db(settings: &Settings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {}", settings.database_url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to the database")?;

    migrate(&pool).await?;

    tracing::info!("Database ready");
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::query(CREATE_VIDEOS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create videos table")?;
    Ok(())
}

/// Single-connection in-memory pool. Every connection to `sqlite::memory:` opens
/// its own database, so the pool must never hold more than one or recycle it.
#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    migrate(&pool).await.expect("Failed to create schema");
    pool
}
