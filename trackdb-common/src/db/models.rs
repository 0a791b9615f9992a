//! Database models

use serde::{Deserialize, Serialize};

/// Column list of the `tracks` table, in declaration order
pub const TRACK_COLUMNS: &str = "track_id, track_name, artists, album, release_year, \
    duration_ms, popularity, danceability, energy, valence, tempo, loudness, \
    speechiness, acousticness, instrumentalness, liveness";

/// One row of the `tracks` table
///
/// `artists` is the raw artist string from the source; collaborations stay a
/// single combined value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    pub track_id: String,
    pub track_name: Option<String>,
    pub artists: Option<String>,
    pub album: Option<String>,
    pub release_year: Option<i64>,
    pub duration_ms: Option<i64>,
    pub popularity: Option<i64>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub loudness: Option<f64>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
}
