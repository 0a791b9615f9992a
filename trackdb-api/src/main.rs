//! trackdb-api - HTTP query service for the track catalog
//!
//! Opens the store, applies pending schema migrations once, then serves
//! read-only track search and statistics until Ctrl+C / SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use trackdb_api::{build_router, AppState};
use trackdb_common::config::{
    resolve_bind_addr, resolve_database_path, BootstrapConfig, BIND_ENV_VAR, DATABASE_ENV_VAR,
};

/// Command-line arguments for trackdb-api
#[derive(Parser, Debug)]
#[command(name = "trackdb-api")]
#[command(about = "Read-only HTTP query service for the trackdb catalog")]
#[command(version)]
struct Args {
    /// SQLite database path
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Address to listen on (host:port)
    #[arg(short, long)]
    bind: Option<String>,

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

    // Build identification first, before any database delay
    info!(
        "Starting trackdb-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let db_path = resolve_database_path(args.database.as_deref(), DATABASE_ENV_VAR, &config);
    info!("Database path: {}", db_path.display());

    // Schema migration runs here, once, before the listener opens
    trackdb_common::db::init_database(&db_path)
        .await
        .context("Failed to migrate database")?
        .close()
        .await;

    // Handlers only ever see a read-only pool
    let pool = trackdb_common::db::connect_readonly(&db_path)
        .await
        .context("Failed to open database")?;

    let state = AppState::new(pool.clone());
    let app = build_router(state);

    let bind_addr = resolve_bind_addr(args.bind.as_deref(), BIND_ENV_VAR, &config);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("trackdb-api listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
