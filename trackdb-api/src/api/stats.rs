//! Statistics endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;

use crate::db::{self, stats::DEFAULT_TOP_ARTISTS, ArtistPopularity, Summary};
use crate::error::ApiResult;
use crate::AppState;

/// Query parameters for GET /stats/artists/top
#[derive(Debug, Deserialize)]
pub struct TopArtistsQuery {
    /// Number of artists to return (1-100)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_TOP_ARTISTS
}

/// GET /stats/summary
pub async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<Summary>> {
    Ok(Json(db::summary(&state.db).await?))
}

/// GET /stats/artists/top
pub async fn get_top_artists(
    State(state): State<AppState>,
    query: Result<Query<TopArtistsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ArtistPopularity>>> {
    let Query(query) = query?;
    Ok(Json(db::top_artists(&state.db, query.limit).await?))
}
