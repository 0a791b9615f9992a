//! Shared helpers for trackdb-api integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`
use trackdb_api::{build_router, AppState};
use trackdb_common::db::init_database;

/// Minimal track row for seeding
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub id: &'static str,
    pub name: &'static str,
    pub artists: Option<&'static str>,
    pub album: &'static str,
    pub year: Option<i64>,
    pub popularity: Option<i64>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
}

impl Seed {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            name: id,
            album: "Album",
            ..Default::default()
        }
    }
}

/// Test database in a temp dir; keep the struct alive for the test
pub struct TestDb {
    _dir: TempDir,
    pub pool: SqlitePool,
}

pub async fn setup_test_db(seeds: &[Seed]) -> TestDb {
    let dir = TempDir::new().expect("temp dir");
    let pool = init_database(&dir.path().join("tracks.db"))
        .await
        .expect("Should initialize test database");

    for seed in seeds {
        sqlx::query(
            "INSERT INTO tracks (track_id, track_name, artists, album, release_year, popularity, \
             danceability, energy, valence, tempo) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(seed.id)
        .bind(seed.name)
        .bind(seed.artists)
        .bind(seed.album)
        .bind(seed.year)
        .bind(seed.popularity)
        .bind(seed.danceability)
        .bind(seed.energy)
        .bind(seed.valence)
        .bind(seed.tempo)
        .execute(&pool)
        .await
        .expect("Should seed track");
    }

    TestDb { _dir: dir, pool }
}

/// Issue a GET against a fresh router over `pool`
pub async fn get(pool: &SqlitePool, uri: &str) -> Response<Body> {
    let app = build_router(AppState::new(pool.clone()));
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {}", name))
        .to_str()
        .unwrap()
}

pub fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("body should be an array")
        .iter()
        .map(|t| t["track_id"].as_str().unwrap().to_string())
        .collect()
}
