//! Track query engine
//!
//! Filtered/sorted queries are built with `QueryBuilder`. The same WHERE
//! clause feeds the COUNT and the page SELECT, so `total_count` always
//! describes the rows being paged over.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, instrument};
use trackdb_common::db::TRACK_COLUMNS;
use trackdb_common::{Result, Track};

use crate::pagination::{PageRequest, Pagination};
use crate::query::{SortKey, SortOrder, TrackFilter};

/// One page of tracks plus its pagination metadata
#[derive(Debug, Clone)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    pub pagination: Pagination,
}

/// Filter, sort and paginate tracks.
///
/// Rows with equal sort values are ordered by `track_id` so consecutive
/// pages never overlap.
#[instrument(skip_all, fields(sort = %sort, order = ?order, page = request.page, per_page = request.per_page))]
pub async fn query_tracks(
    pool: &SqlitePool,
    filter: &TrackFilter,
    sort: SortKey,
    order: SortOrder,
    request: PageRequest,
) -> Result<TrackPage> {
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tracks");
    filter.push_where(&mut count_query);
    let total_count: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let pagination = Pagination::compute(total_count, request)?;

    let mut page_query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM tracks", TRACK_COLUMNS));
    filter.push_where(&mut page_query);
    page_query.push(format!(
        " ORDER BY {} {}, track_id ASC",
        sort.column(),
        order.sql()
    ));
    push_window(&mut page_query, &pagination);

    debug!(sql = page_query.sql(), "Executing track query");
    let tracks = page_query.build_query_as::<Track>().fetch_all(pool).await?;

    Ok(TrackPage { tracks, pagination })
}

/// Unfiltered enumeration in storage key order
#[instrument(skip_all, fields(page = request.page, per_page = request.per_page))]
pub async fn list_tracks(pool: &SqlitePool, request: PageRequest) -> Result<TrackPage> {
    let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await?;

    let pagination = Pagination::compute(total_count, request)?;

    let mut page_query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {} FROM tracks ORDER BY track_id",
        TRACK_COLUMNS
    ));
    push_window(&mut page_query, &pagination);
    let tracks = page_query.build_query_as::<Track>().fetch_all(pool).await?;

    Ok(TrackPage { tracks, pagination })
}

fn push_window(builder: &mut QueryBuilder<'_, Sqlite>, pagination: &Pagination) {
    builder
        .push(" LIMIT ")
        .push_bind(pagination.per_page)
        .push(" OFFSET ")
        .push_bind(pagination.offset);
}
