//! Error types for trackdb-ingest
//!
//! Only batch-fatal conditions are errors here. Problems with a single row
//! are logged and counted in the [`crate::IngestReport`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file could not be opened
    #[error("Cannot open source {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source lacks a column the transform cannot do without
    #[error("Source has no {0} column")]
    MissingColumn(String),

    /// CSV reader failure that is not confined to one record
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Database failure outside per-row inserts (transaction begin/commit)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// trackdb-common error
    #[error(transparent)]
    Common(#[from] trackdb_common::Error),
}

pub type IngestResult<T> = Result<T, IngestError>;
