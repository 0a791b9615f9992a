//! Integration tests for the ingest pipeline against a real SQLite file

use std::path::PathBuf;

use sqlx::SqlitePool;
use tempfile::TempDir;
use trackdb_common::db::init_database;
use trackdb_common::Track;
use trackdb_ingest::{ingest_file, IngestError};

const SOURCE_CSV: &str = "\
track_id,track_name,track_artist,track_popularity,track_album_name,track_album_release_date,danceability,energy,valence,tempo,loudness,speechiness,acousticness,instrumentalness,liveness,duration_ms
a1,First,Solo Artist,10,Debut,2015-03-01,0.5,0.6,0.4,120.0,-5.0,0.05,0.1,0.0,0.1,200000
a2,Second,Solo Artist,,Debut,2016,0.7,0.8,0.5,,-6.0,0.04,0.2,0.0,0.2,
a1,First (remaster),Someone Else,99,Remaster,2020-01-01,0.9,0.9,0.9,90.0,-3.0,0.1,0.3,0.5,0.3,100000
a3,Third,Duo A & Duo B,30,Second Album,not-a-date,,0.4,0.3,100.0,-7.0,0.06,0.3,0.1,0.15,180000
";

/// Test helper: temp dir holding a database and a CSV source
struct Fixture {
    _dir: TempDir,
    csv_path: PathBuf,
    pool: SqlitePool,
}

async fn setup(csv: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("tracks.csv");
    std::fs::write(&csv_path, csv).unwrap();
    let pool = init_database(&dir.path().join("tracks.db")).await.unwrap();
    Fixture {
        _dir: dir,
        csv_path,
        pool,
    }
}

async fn fetch_track(pool: &SqlitePool, id: &str) -> Track {
    sqlx::query_as::<_, Track>("SELECT * FROM tracks WHERE track_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_ingest_counts() {
    let f = setup(SOURCE_CSV).await;

    let report = ingest_file(&f.pool, &f.csv_path).await.unwrap();

    assert_eq!(report.source_rows, 4);
    assert_eq!(report.duplicates_in_source, 1);
    assert_eq!(report.inserted, 3);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);
    assert_eq!(row_count(&f.pool).await, 3);
}

#[tokio::test]
async fn test_ingest_is_idempotent() {
    let f = setup(SOURCE_CSV).await;

    let first = ingest_file(&f.pool, &f.csv_path).await.unwrap();
    let second = ingest_file(&f.pool, &f.csv_path).await.unwrap();

    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 3, "Second run should skip every row");
    assert_eq!(row_count(&f.pool).await, 3);
}

#[tokio::test]
async fn test_duplicate_keeps_first_source_row() {
    let f = setup(SOURCE_CSV).await;
    ingest_file(&f.pool, &f.csv_path).await.unwrap();

    let a1 = fetch_track(&f.pool, "a1").await;
    assert_eq!(a1.track_name.as_deref(), Some("First"));
    assert_eq!(a1.artists.as_deref(), Some("Solo Artist"));
    assert_eq!(a1.popularity, Some(10));
    assert_eq!(a1.release_year, Some(2015));
}

#[tokio::test]
async fn test_existing_rows_are_not_overwritten() {
    let f = setup(SOURCE_CSV).await;
    sqlx::query("INSERT INTO tracks (track_id, track_name, popularity) VALUES ('a2', 'Original', 77)")
        .execute(&f.pool)
        .await
        .unwrap();

    let report = ingest_file(&f.pool, &f.csv_path).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 1);
    let a2 = fetch_track(&f.pool, "a2").await;
    assert_eq!(a2.track_name.as_deref(), Some("Original"));
    assert_eq!(a2.popularity, Some(77));
}

#[tokio::test]
async fn test_nulls_filled_with_deduplicated_median() {
    let f = setup(SOURCE_CSV).await;
    ingest_file(&f.pool, &f.csv_path).await.unwrap();

    // popularity: [10, 30] after dropping the duplicate a1 (99)
    let a2 = fetch_track(&f.pool, "a2").await;
    assert_eq!(a2.popularity, Some(20));
    // tempo: [120, 100]
    assert_eq!(a2.tempo, Some(110.0));
    // duration_ms: [200000, 180000]
    assert_eq!(a2.duration_ms, Some(190000));
    assert_eq!(a2.release_year, Some(2016));

    // danceability: [0.5, 0.7]
    let a3 = fetch_track(&f.pool, "a3").await;
    assert!((a3.danceability.unwrap() - 0.6).abs() < 1e-9);
    assert_eq!(a3.release_year, None, "Unparseable date stores a null year");
    assert_eq!(a3.artists.as_deref(), Some("Duo A & Duo B"));
}

#[tokio::test]
async fn test_empty_column_stays_null() {
    let csv = "track_id,track_name,popularity,energy\nx1,A,,0.5\nx2,B,,0.7\n";
    let f = setup(csv).await;

    ingest_file(&f.pool, &f.csv_path).await.unwrap();

    let nulls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks WHERE popularity IS NULL")
        .fetch_one(&f.pool)
        .await
        .unwrap();
    assert_eq!(nulls, 2);
}

#[tokio::test]
async fn test_bad_rows_are_counted_not_fatal() {
    let csv = "track_id,track_name,popularity\n,Missing Id,5\nok1,Fine,7\nbad,Too,many,fields\nok2,Also Fine,9\n";
    let f = setup(csv).await;

    let report = ingest_file(&f.pool, &f.csv_path).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.errors, 2);
    assert_eq!(row_count(&f.pool).await, 2);
}

#[tokio::test]
async fn test_missing_source_file() {
    let f = setup(SOURCE_CSV).await;
    let missing = f.csv_path.with_file_name("nope.csv");

    let result = ingest_file(&f.pool, &missing).await;
    assert!(matches!(result, Err(IngestError::Source { .. })));
}
