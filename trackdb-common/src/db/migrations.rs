//! Database schema migrations
//!
//! Versioned, idempotent migrations tracked in the `schema_version` table.
//! Every statement uses `IF NOT EXISTS`, so re-running a migration against a
//! store that already has the objects is a no-op.
//!
//! Never modify an existing migration; add a new `migrate_vN` and bump
//! [`CURRENT_SCHEMA_VERSION`].

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Columns carrying a secondary index on `tracks`
pub const INDEXED_COLUMNS: [&str; 5] = [
    "artists",
    "release_year",
    "popularity",
    "danceability",
    "energy",
];

/// Get current schema version from database
///
/// Returns 0 if no version has been recorded
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    Ok(())
}

/// Migration v1: `tracks` table and its filter/sort indexes
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id TEXT PRIMARY KEY,
            track_name TEXT,
            artists TEXT,
            album TEXT,
            release_year INTEGER,
            duration_ms INTEGER,
            popularity INTEGER,
            danceability REAL,
            energy REAL,
            valence REAL,
            tempo REAL,
            loudness REAL,
            speechiness REAL,
            acousticness REAL,
            instrumentalness REAL,
            liveness REAL
        )
        "#,
    )
    .execute(pool)
    .await?;

    for column in INDEXED_COLUMNS {
        let sql = format!(
            "CREATE INDEX IF NOT EXISTS idx_{column} ON tracks({column})",
            column = column
        );
        sqlx::query(&sql).execute(pool).await?;
    }

    Ok(())
}
