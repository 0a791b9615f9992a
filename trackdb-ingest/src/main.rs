//! trackdb-ingest - batch loader for the track catalog
//!
//! Reads a track metadata CSV, normalizes it and writes it into the SQLite
//! store served by trackdb-api. Safe to re-run: ids already present are
//! skipped, never overwritten.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use trackdb_common::config::{resolve_database_path, BootstrapConfig, DATABASE_ENV_VAR};

/// Command-line arguments for trackdb-ingest
#[derive(Parser, Debug)]
#[command(name = "trackdb-ingest")]
#[command(about = "Load a track metadata CSV into the trackdb store")]
#[command(version)]
struct Args {
    /// Source CSV file
    source: PathBuf,

    /// SQLite database path (created if missing)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Bootstrap TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = BootstrapConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting trackdb-ingest v{}", env!("CARGO_PKG_VERSION"));

    let db_path = resolve_database_path(args.database.as_deref(), DATABASE_ENV_VAR, &config);
    info!("Database path: {}", db_path.display());

    let pool = trackdb_common::db::init_database(&db_path)
        .await
        .context("Failed to open database")?;

    let report = trackdb_ingest::ingest_file(&pool, &args.source)
        .await
        .with_context(|| format!("Ingest of {} failed", args.source.display()))?;

    pool.close().await;

    println!(
        "Ingest complete: {} inserted, {} skipped, {} errors ({} source rows, {} duplicates in source)",
        report.inserted,
        report.skipped,
        report.errors,
        report.source_rows,
        report.duplicates_in_source
    );

    Ok(())
}
