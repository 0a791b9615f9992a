//! Source column mapping
//!
//! Upstream exports name columns differently from the store (the Spotify
//! songs dump uses `track_artist`, `track_album_name`, `track_popularity`
//! and `track_album_release_date`). Headers are matched case-insensitively
//! through a fixed rename table; anything not in the table is ignored.

use std::collections::HashMap;
use tracing::{debug, warn};

/// A logical field of a source row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    TrackId,
    TrackName,
    Artists,
    Album,
    /// Full release date, reduced to `release_year`
    ReleaseDate,
    /// Already-numeric release year
    ReleaseYear,
    Numeric(NumericField),
}

/// Numeric columns subject to median imputation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericField {
    Popularity,
    Danceability,
    Energy,
    Valence,
    Tempo,
    Loudness,
    Speechiness,
    Acousticness,
    Instrumentalness,
    Liveness,
    DurationMs,
}

impl NumericField {
    pub const ALL: [NumericField; 11] = [
        NumericField::Popularity,
        NumericField::Danceability,
        NumericField::Energy,
        NumericField::Valence,
        NumericField::Tempo,
        NumericField::Loudness,
        NumericField::Speechiness,
        NumericField::Acousticness,
        NumericField::Instrumentalness,
        NumericField::Liveness,
        NumericField::DurationMs,
    ];

    /// Storage column name
    pub fn column(self) -> &'static str {
        match self {
            NumericField::Popularity => "popularity",
            NumericField::Danceability => "danceability",
            NumericField::Energy => "energy",
            NumericField::Valence => "valence",
            NumericField::Tempo => "tempo",
            NumericField::Loudness => "loudness",
            NumericField::Speechiness => "speechiness",
            NumericField::Acousticness => "acousticness",
            NumericField::Instrumentalness => "instrumentalness",
            NumericField::Liveness => "liveness",
            NumericField::DurationMs => "duration_ms",
        }
    }

    /// Position in [`NumericField::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Map a source header to the field it feeds
pub fn field_for_header(header: &str) -> Option<Field> {
    let normalized = header.trim().to_ascii_lowercase();
    let field = match normalized.as_str() {
        "track_id" => Field::TrackId,
        "track_name" => Field::TrackName,
        "artists" | "track_artist" | "artist_name" | "artist" => Field::Artists,
        "album" | "track_album_name" | "album_name" => Field::Album,
        "release_date" | "track_album_release_date" | "album_release_date" => Field::ReleaseDate,
        "release_year" | "year" => Field::ReleaseYear,
        "track_popularity" => Field::Numeric(NumericField::Popularity),
        other => {
            let numeric = NumericField::ALL.into_iter().find(|f| f.column() == other)?;
            Field::Numeric(numeric)
        }
    };
    Some(field)
}

/// Resolved positions of each known field in the source header row
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: HashMap<Field, usize>,
}

impl ColumnMap {
    /// Build from the header row. When two headers map to the same field the
    /// first one wins.
    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut positions = HashMap::new();
        for (position, header) in headers.into_iter().enumerate() {
            match field_for_header(header) {
                Some(field) => {
                    if positions.contains_key(&field) {
                        warn!(header, ?field, "Duplicate source column ignored");
                    } else {
                        positions.insert(field, position);
                    }
                }
                None => debug!(header, "Unmapped source column ignored"),
            }
        }
        Self { positions }
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.positions.contains_key(&field)
    }

    /// Numeric columns present in the source, in [`NumericField::ALL`] order
    pub fn numeric_fields(&self) -> Vec<NumericField> {
        NumericField::ALL
            .into_iter()
            .filter(|f| self.contains(Field::Numeric(*f)))
            .collect()
    }
}
