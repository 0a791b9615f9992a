//! Track persistence
//!
//! Insert-or-skip on `track_id`: an existing row is never overwritten.

use sqlx::SqlitePool;
use tracing::warn;
use trackdb_common::db::TRACK_COLUMNS;
use trackdb_common::Track;

use crate::error::IngestResult;

/// Outcome counters of one insert pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertCounts {
    pub inserted: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Insert tracks in one transaction.
///
/// A statement failure is logged, counted and does not abort the batch.
pub async fn insert_tracks(pool: &SqlitePool, tracks: &[Track]) -> IngestResult<InsertCounts> {
    let sql = format!(
        "INSERT OR IGNORE INTO tracks ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        TRACK_COLUMNS
    );

    let mut counts = InsertCounts::default();
    let mut tx = pool.begin().await?;

    for track in tracks {
        let result = sqlx::query(&sql)
            .bind(&track.track_id)
            .bind(&track.track_name)
            .bind(&track.artists)
            .bind(&track.album)
            .bind(track.release_year)
            .bind(track.duration_ms)
            .bind(track.popularity)
            .bind(track.danceability)
            .bind(track.energy)
            .bind(track.valence)
            .bind(track.tempo)
            .bind(track.loudness)
            .bind(track.speechiness)
            .bind(track.acousticness)
            .bind(track.instrumentalness)
            .bind(track.liveness)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => counts.skipped += 1,
            Ok(_) => counts.inserted += 1,
            Err(e) => {
                warn!(track_id = %track.track_id, error = %e, "Failed to insert track");
                counts.errors += 1;
            }
        }
    }

    tx.commit().await?;
    Ok(counts)
}
