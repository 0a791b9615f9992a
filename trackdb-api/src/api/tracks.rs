//! Track listing endpoints
//!
//! Pagination metadata travels in `X-*` response headers; the body is the
//! bare JSON array of tracks.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::db::{self, TrackPage};
use crate::error::ApiResult;
use crate::pagination::{PageRequest, Pagination, DEFAULT_PER_PAGE};
use crate::query::{SortKey, SortOrder, TrackFilter};
use crate::AppState;

pub const HEADER_TOTAL_COUNT: &str = "x-total-count";
pub const HEADER_TOTAL_PAGES: &str = "x-total-pages";
pub const HEADER_CURRENT_PAGE: &str = "x-current-page";
pub const HEADER_PER_PAGE: &str = "x-per-page";
pub const HEADER_HAS_NEXT: &str = "x-has-next";
pub const HEADER_HAS_PREV: &str = "x-has-prev";

/// Query parameters for GET /tracks
#[derive(Debug, Deserialize)]
pub struct TracksQuery {
    pub q: Option<String>,
    pub artist: Option<String>,
    pub year_min: Option<i64>,
    pub year_max: Option<i64>,
    pub pop_min: Option<i64>,
    pub dance_min: Option<f64>,
    pub dance_max: Option<f64>,
    pub energy_min: Option<f64>,
    pub energy_max: Option<f64>,
    pub valence_min: Option<f64>,
    pub valence_max: Option<f64>,
    pub tempo_min: Option<f64>,
    pub tempo_max: Option<f64>,

    /// One of popularity, release_year, danceability, energy
    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    /// "asc" or "desc"
    pub order: Option<String>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

impl TracksQuery {
    pub fn filter(&self) -> TrackFilter {
        TrackFilter {
            q: self.q.clone(),
            artist: self.artist.clone(),
            year_min: self.year_min,
            year_max: self.year_max,
            pop_min: self.pop_min,
            dance_min: self.dance_min,
            dance_max: self.dance_max,
            energy_min: self.energy_min,
            energy_max: self.energy_max,
            valence_min: self.valence_min,
            valence_max: self.valence_max,
            tempo_min: self.tempo_min,
            tempo_max: self.tempo_max,
        }
    }
}

/// Query parameters for GET /tracks/all
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_sort_by() -> String {
    SortKey::default().column().to_string()
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

/// GET /tracks
///
/// Filtered, sorted, paginated track search.
pub async fn get_tracks(
    State(state): State<AppState>,
    query: Result<Query<TracksQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;

    // Sort key is validated before anything touches the database
    let sort: SortKey = query.sort_by.parse()?;
    let order = SortOrder::from_param(query.order.as_deref());
    let request = PageRequest::new(query.page, query.per_page)?;

    let page = db::query_tracks(&state.db, &query.filter(), sort, order, request).await?;

    info!(
        returned = page.tracks.len(),
        total_count = page.pagination.total_count,
        page = page.pagination.page,
        "Served track query"
    );

    Ok(paginated_response(page))
}

/// GET /tracks/all
///
/// Unfiltered enumeration with the same pagination contract.
pub async fn get_all_tracks(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let request = PageRequest::new(query.page, query.per_page)?;

    let page = db::list_tracks(&state.db, request).await?;

    info!(
        returned = page.tracks.len(),
        page = page.pagination.page,
        "Served track listing"
    );

    Ok(paginated_response(page))
}

fn paginated_response(page: TrackPage) -> Response {
    (pagination_headers(&page.pagination), Json(page.tracks)).into_response()
}

/// Pagination metadata as response headers
pub fn pagination_headers(p: &Pagination) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let flag = |value: bool| HeaderValue::from_static(if value { "true" } else { "false" });

    headers.insert(HeaderName::from_static(HEADER_TOTAL_COUNT), HeaderValue::from(p.total_count));
    headers.insert(HeaderName::from_static(HEADER_TOTAL_PAGES), HeaderValue::from(p.total_pages));
    headers.insert(HeaderName::from_static(HEADER_CURRENT_PAGE), HeaderValue::from(p.page));
    headers.insert(HeaderName::from_static(HEADER_PER_PAGE), HeaderValue::from(p.per_page));
    headers.insert(HeaderName::from_static(HEADER_HAS_NEXT), flag(p.has_next));
    headers.insert(HeaderName::from_static(HEADER_HAS_PREV), flag(p.has_prev));
    headers
}
