//! Aggregate statistics engine
//!
//! Recomputed from the full table on every call; nothing is cached.
//! Artist aggregates group on the raw `artists` string, so a collaboration
//! counts as its own artist value.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::instrument;
use trackdb_common::{Error, Result};

/// `year_range` value when the store has no release years
pub const YEAR_RANGE_UNAVAILABLE: &str = "N/A";

/// Minimum rated tracks for an artist to be ranked by popularity
pub const MIN_TRACKS_FOR_RANKING: i64 = 3;

pub const DEFAULT_TOP_ARTISTS: i64 = 20;
pub const MAX_TOP_ARTISTS: i64 = 100;

/// Dataset-wide summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub n_tracks: i64,
    /// Distinct raw `artists` strings
    pub n_artists: i64,
    /// `"{min}-{max}"` or [`YEAR_RANGE_UNAVAILABLE`]
    pub year_range: String,
    pub mean_popularity: f64,
    pub median_popularity: f64,
    pub top_10_artists: Vec<ArtistTrackCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistTrackCount {
    pub artist: String,
    pub track_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistPopularity {
    pub artist: String,
    pub avg_popularity: f64,
    pub track_count: i64,
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn median_of_sorted(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] as f64 + values[mid] as f64) / 2.0)
    } else {
        Some(values[mid] as f64)
    }
}

/// Compute the summary
#[instrument(skip(pool))]
pub async fn summary(pool: &SqlitePool) -> Result<Summary> {
    let (n_tracks, n_artists, min_year, max_year): (i64, i64, Option<i64>, Option<i64>) =
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(DISTINCT artists), MIN(release_year), MAX(release_year) FROM tracks",
        )
        .fetch_one(pool)
        .await?;

    let year_range = match (min_year, max_year) {
        (Some(min), Some(max)) => format!("{}-{}", min, max),
        _ => YEAR_RANGE_UNAVAILABLE.to_string(),
    };

    let popularity: Vec<i64> = sqlx::query_scalar(
        "SELECT popularity FROM tracks WHERE popularity IS NOT NULL ORDER BY popularity",
    )
    .fetch_all(pool)
    .await?;

    // Popularity is not range-checked at ingest; accumulate in f64
    let mean_popularity = if popularity.is_empty() {
        0.0
    } else {
        round2(popularity.iter().map(|&p| p as f64).sum::<f64>() / popularity.len() as f64)
    };
    let median_popularity = median_of_sorted(&popularity).map(round2).unwrap_or(0.0);

    let top_10_artists = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT artists, COUNT(*) AS track_count
        FROM tracks
        WHERE artists IS NOT NULL
        GROUP BY artists
        ORDER BY track_count DESC, artists ASC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(artist, track_count)| ArtistTrackCount {
        artist,
        track_count,
    })
    .collect();

    Ok(Summary {
        n_tracks,
        n_artists,
        year_range,
        mean_popularity,
        median_popularity,
        top_10_artists,
    })
}

/// Validate the `limit` of the top-artists ranking
pub fn validate_top_limit(limit: i64) -> Result<i64> {
    if (1..=MAX_TOP_ARTISTS).contains(&limit) {
        Ok(limit)
    } else {
        Err(Error::InvalidInput(format!(
            "limit must be between 1 and {} (got {})",
            MAX_TOP_ARTISTS, limit
        )))
    }
}

/// Artists ranked by mean popularity, ties by track count
///
/// Only tracks with a popularity value count, and an artist needs at least
/// [`MIN_TRACKS_FOR_RANKING`] of them.
#[instrument(skip(pool))]
pub async fn top_artists(pool: &SqlitePool, limit: i64) -> Result<Vec<ArtistPopularity>> {
    let limit = validate_top_limit(limit)?;

    let rows = sqlx::query_as::<_, (String, f64, i64)>(
        r#"
        SELECT artists, AVG(popularity) AS avg_popularity, COUNT(*) AS track_count
        FROM tracks
        WHERE popularity IS NOT NULL AND artists IS NOT NULL
        GROUP BY artists
        HAVING COUNT(*) >= ?
        ORDER BY avg_popularity DESC, track_count DESC
        LIMIT ?
        "#,
    )
    .bind(MIN_TRACKS_FOR_RANKING)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(artist, avg, track_count)| ArtistPopularity {
            artist,
            avg_popularity: round2(avg),
            track_count,
        })
        .collect())
}
