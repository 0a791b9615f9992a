//! trackdb-ingest library
//!
//! One-shot batch load of a track metadata CSV into the trackdb store:
//! rename columns, derive release years, drop duplicate ids, impute numeric
//! nulls with column medians, then insert-or-skip every row.

pub mod columns;
pub mod error;
pub mod store;
pub mod transform;
pub mod year;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};

pub use error::{IngestError, IngestResult};

/// Final counters of an ingest run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Records read from the source, including rejected ones
    pub source_rows: usize,
    /// Records dropped because an earlier record had the same `track_id`
    pub duplicates_in_source: usize,
    pub inserted: usize,
    /// Rows whose `track_id` already existed in the store
    pub skipped: usize,
    /// Rejected source records plus failed inserts
    pub errors: usize,
}

/// Ingest a CSV file into an initialized store
#[instrument(skip(pool), fields(source = %path.display()))]
pub async fn ingest_file(pool: &SqlitePool, path: &Path) -> IngestResult<IngestReport> {
    let file = File::open(path).map_err(|source| IngestError::Source {
        path: path.to_path_buf(),
        source,
    })?;

    // CSV parsing is blocking work; keep it off the async workers
    let batch = tokio::task::spawn_blocking(move || transform::normalize(BufReader::new(file)))
        .await
        .map_err(|e| trackdb_common::Error::Internal(format!("Transform task failed: {}", e)))??;

    let counts = store::insert_tracks(pool, &batch.tracks).await?;

    let report = IngestReport {
        source_rows: batch.source_rows,
        duplicates_in_source: batch.duplicates,
        inserted: counts.inserted,
        skipped: counts.skipped,
        errors: batch.rejected + counts.errors,
    };

    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        errors = report.errors,
        "Ingest completed"
    );

    Ok(report)
}
