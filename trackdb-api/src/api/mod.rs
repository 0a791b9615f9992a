//! HTTP API handlers for trackdb-api

pub mod health;
pub mod stats;
pub mod tracks;

pub use health::{health_routes, root};
pub use stats::{get_summary, get_top_artists};
pub use tracks::{get_all_tracks, get_tracks};
