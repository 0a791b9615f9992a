//! Filter and sort criteria for the track query
//!
//! Sort columns come from a closed enum, never from the request string, so
//! only known column names ever reach the SQL text. Filter values are bound.

use std::fmt;
use std::str::FromStr;

use sqlx::{QueryBuilder, Sqlite};
use tracing::debug;
use trackdb_common::Error;

/// Columns a client may sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Popularity,
    ReleaseYear,
    Danceability,
    Energy,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Popularity,
        SortKey::ReleaseYear,
        SortKey::Danceability,
        SortKey::Energy,
    ];

    /// Column name in `tracks`; also the accepted request value
    pub fn column(self) -> &'static str {
        match self {
            SortKey::Popularity => "popularity",
            SortKey::ReleaseYear => "release_year",
            SortKey::Danceability => "danceability",
            SortKey::Energy => "energy",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.column() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|k| k.column()).collect();
                Error::InvalidInput(format!(
                    "Invalid sort field '{}'. Use one of: {}",
                    s,
                    allowed.join(", ")
                ))
            })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Lenient parse: exactly `asc` is ascending, anything else descending
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("asc") => SortOrder::Asc,
            Some("desc") | None => SortOrder::Desc,
            Some(other) => {
                debug!(order = other, "Unrecognized sort order, using descending");
                SortOrder::Desc
            }
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Optional track predicates, combined with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackFilter {
    /// Substring of `track_name` or `album`
    pub q: Option<String>,
    /// Substring of `artists`
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
}

impl TrackFilter {
    /// Append `WHERE ...` for every active predicate (nothing if none)
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        let mut first = true;

        if let Some(q) = non_empty(&self.q) {
            let pattern = like_pattern(q);
            next_clause(builder, &mut first)
                .push("(LOWER(track_name) LIKE LOWER(")
                .push_bind(pattern.clone())
                .push(") ESCAPE '\\' OR LOWER(album) LIKE LOWER(")
                .push_bind(pattern)
                .push(") ESCAPE '\\')");
        }

        if let Some(artist) = non_empty(&self.artist) {
            next_clause(builder, &mut first)
                .push("LOWER(artists) LIKE LOWER(")
                .push_bind(like_pattern(artist))
                .push(") ESCAPE '\\'");
        }

        let int_bounds = [
            ("release_year", ">=", self.year_min),
            ("release_year", "<=", self.year_max),
            ("popularity", ">=", self.pop_min),
        ];
        for (column, op, value) in int_bounds {
            if let Some(value) = value {
                next_clause(builder, &mut first)
                    .push(format!("{} {} ", column, op))
                    .push_bind(value);
            }
        }

        let real_bounds = [
            ("danceability", ">=", self.dance_min),
            ("danceability", "<=", self.dance_max),
            ("energy", ">=", self.energy_min),
            ("energy", "<=", self.energy_max),
            ("valence", ">=", self.valence_min),
            ("valence", "<=", self.valence_max),
            ("tempo", ">=", self.tempo_min),
            ("tempo", "<=", self.tempo_max),
        ];
        for (column, op, value) in real_bounds {
            if let Some(value) = value {
                next_clause(builder, &mut first)
                    .push(format!("{} {} ", column, op))
                    .push_bind(value);
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn next_clause<'b, 'args>(
    builder: &'b mut QueryBuilder<'args, Sqlite>,
    first: &mut bool,
) -> &'b mut QueryBuilder<'args, Sqlite> {
    builder.push(if *first { " WHERE " } else { " AND " });
    *first = false;
    builder
}

/// `%needle%` with LIKE wildcards in the needle escaped by `\`
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
