//! trackdb-api library - read-only query service over the track catalog
//!
//! Filtered/sorted/paginated track search plus dataset statistics, served
//! over HTTP from the SQLite store that trackdb-ingest populates.

use axum::{body::Body, http::Request, routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod api;
pub mod db;
pub mod error;
pub mod pagination;
pub mod query;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only usage)
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Every request runs inside a `request` span carrying a fresh request id,
/// so handler and query logs are scoped to the request that produced them.
pub fn build_router(state: AppState) -> Router {
    let tracks = Router::new()
        .route("/tracks", get(api::get_tracks))
        .route("/tracks/", get(api::get_tracks))
        .route("/tracks/all", get(api::get_all_tracks));

    let stats = Router::new()
        .route("/stats/summary", get(api::get_summary))
        .route("/stats/artists/top", get(api::get_top_artists));

    let public = Router::new()
        .route("/", get(api::root))
        .merge(api::health_routes());

    Router::new()
        .merge(tracks)
        .merge(stats)
        .merge(public)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    uri = %request.uri()
                )
            }),
        )
        .with_state(state)
}
