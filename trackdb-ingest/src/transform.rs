//! Normalizing transform: source records to store-ready tracks
//!
//! Order matters: rows are deduplicated before medians are computed, so a
//! duplicated row never skews imputation.

use std::collections::HashSet;
use std::io::Read;

use tracing::{debug, info, warn};
use trackdb_common::Track;

use crate::columns::{ColumnMap, Field, NumericField};
use crate::error::{IngestError, IngestResult};
use crate::year::derive_release_year;

/// One parsed source row, before imputation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    pub track_id: String,
    pub track_name: Option<String>,
    pub artists: Option<String>,
    pub album: Option<String>,
    pub release_year: Option<i64>,
    /// Indexed by [`NumericField::index`]
    pub numeric: [Option<f64>; NumericField::ALL.len()],
}

impl SourceRow {
    pub fn get(&self, field: NumericField) -> Option<f64> {
        self.numeric[field.index()]
    }

    pub fn set(&mut self, field: NumericField, value: Option<f64>) {
        self.numeric[field.index()] = value;
    }

    /// Convert to the storage row. Integer columns are rounded half away
    /// from zero, which only matters for imputed medians like `15.5`.
    pub fn into_track(self) -> Track {
        let numeric = self.numeric;
        let int = |field: NumericField| numeric[field.index()].map(|v| v.round() as i64);
        let real = |field: NumericField| numeric[field.index()];

        Track {
            popularity: int(NumericField::Popularity),
            duration_ms: int(NumericField::DurationMs),
            danceability: real(NumericField::Danceability),
            energy: real(NumericField::Energy),
            valence: real(NumericField::Valence),
            tempo: real(NumericField::Tempo),
            loudness: real(NumericField::Loudness),
            speechiness: real(NumericField::Speechiness),
            acousticness: real(NumericField::Acousticness),
            instrumentalness: real(NumericField::Instrumentalness),
            liveness: real(NumericField::Liveness),
            release_year: self.release_year,
            track_id: self.track_id,
            track_name: self.track_name,
            artists: self.artists,
            album: self.album,
        }
    }
}

/// Everything read from one source file
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub rows: Vec<SourceRow>,
    /// Numeric columns that exist in the source header
    pub numeric_fields: Vec<NumericField>,
    /// Records the CSV reader rejected (wrong field count, bad UTF-8)
    pub malformed: usize,
    /// Records without a `track_id`
    pub missing_id: usize,
}

/// Median of one column after imputation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnMedian {
    pub field: NumericField,
    /// `None` when the column had no values at all
    pub median: Option<f64>,
    /// Number of cells that were filled
    pub filled: usize,
}

/// Read and parse every record of a CSV source
pub fn read_source<R: Read>(reader: R) -> IngestResult<SourceBatch> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::from_headers(headers.iter());

    if !columns.contains(Field::TrackId) {
        return Err(IngestError::MissingColumn("track_id".to_string()));
    }

    let mut batch = SourceBatch {
        numeric_fields: columns.numeric_fields(),
        ..Default::default()
    };

    for (line, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(record = line + 1, error = %e, "Skipping malformed record");
                batch.malformed += 1;
                continue;
            }
        };

        match parse_record(&record, &columns) {
            Some(row) => batch.rows.push(row),
            None => {
                warn!(record = line + 1, "Skipping record without track_id");
                batch.missing_id += 1;
            }
        }
    }

    Ok(batch)
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnMap) -> Option<SourceRow> {
    let cell = |field: Field| -> Option<&str> {
        columns
            .position(field)
            .and_then(|pos| record.get(pos))
            .map(str::trim)
    };
    let text = |field: Field| cell(field).filter(|s| !s.is_empty()).map(str::to_string);

    let track_id = text(Field::TrackId)?;

    let mut row = SourceRow {
        release_year: derive_release_year(cell(Field::ReleaseDate), cell(Field::ReleaseYear)),
        track_name: text(Field::TrackName),
        artists: text(Field::Artists),
        album: text(Field::Album),
        track_id,
        ..Default::default()
    };

    for field in NumericField::ALL {
        let value = cell(Field::Numeric(field)).and_then(|raw| parse_numeric(raw, field, &row.track_id));
        row.set(field, value);
    }

    Some(row)
}

fn parse_numeric(raw: &str, field: NumericField, track_id: &str) -> Option<f64> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("null") {
        return None;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!(track_id, column = field.column(), value = raw, "Unparseable numeric cell treated as null");
            None
        }
    }
}

/// Keep the first occurrence of each `track_id`, in source order.
///
/// Returns the surviving rows and the number of discarded duplicates.
pub fn dedup_keep_first(rows: Vec<SourceRow>) -> (Vec<SourceRow>, usize) {
    let before = rows.len();
    let mut seen = HashSet::with_capacity(before);
    let unique: Vec<SourceRow> = rows
        .into_iter()
        .filter(|row| seen.insert(row.track_id.clone()))
        .collect();
    let duplicates = before - unique.len();
    (unique, duplicates)
}

/// Median of the given values; `None` for an empty slice
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Fill nulls in each listed column with that column's median.
///
/// A column with no values has no median and stays null for every row.
pub fn impute_medians(rows: &mut [SourceRow], fields: &[NumericField]) -> Vec<ColumnMedian> {
    fields
        .iter()
        .map(|&field| {
            let mut observed: Vec<f64> = rows.iter().filter_map(|r| r.get(field)).collect();
            let column_median = median(&mut observed);

            let mut filled = 0;
            match column_median {
                Some(value) => {
                    for row in rows.iter_mut().filter(|r| r.get(field).is_none()) {
                        row.set(field, Some(value));
                        filled += 1;
                    }
                }
                None => warn!(column = field.column(), "Column has no values; nulls left in place"),
            }

            ColumnMedian {
                field,
                median: column_median,
                filled,
            }
        })
        .collect()
}

/// Transformed batch ready for insertion
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub tracks: Vec<Track>,
    pub source_rows: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub medians: Vec<ColumnMedian>,
}

/// Run the whole transform over a CSV source
pub fn normalize<R: Read>(reader: R) -> IngestResult<NormalizedBatch> {
    let batch = read_source(reader)?;
    let source_rows = batch.rows.len() + batch.malformed + batch.missing_id;

    let (mut rows, duplicates) = dedup_keep_first(batch.rows);
    let medians = impute_medians(&mut rows, &batch.numeric_fields);

    for m in &medians {
        debug!(column = m.field.column(), median = ?m.median, filled = m.filled, "Imputed column");
    }
    info!(
        source_rows,
        unique = rows.len(),
        duplicates,
        rejected = batch.malformed + batch.missing_id,
        "Normalized source"
    );

    Ok(NormalizedBatch {
        tracks: rows.into_iter().map(SourceRow::into_track).collect(),
        source_rows,
        duplicates,
        rejected: batch.malformed + batch.missing_id,
        medians,
    })
}
