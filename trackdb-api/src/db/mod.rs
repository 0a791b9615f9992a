//! Read-side queries over the `tracks` table
//!
//! Nothing here writes: the store is populated by trackdb-ingest and only
//! read while serving.

pub mod stats;
pub mod tracks;

pub use stats::{summary, top_artists, ArtistPopularity, ArtistTrackCount, Summary};
pub use tracks::{list_tracks, query_tracks, TrackPage};
