//! Review store tests against a throwaway database

use landmarker_common::matching::MatchPolicy;
use landmarker_common::types::{Coordinate, Review};
use landmarker_web::db;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pool = db::init_database_pool(&dir.path().join("test.db"))
        .await
        .expect("Failed to initialize test database");
    (pool, dir)
}

fn review(username: &str, landmark: &str, lon: f64, lat: f64, score: i64, text: &str) -> Review {
    Review {
        username: username.into(),
        landmark: landmark.into(),
        coordinate: Coordinate {
            longitude: lon,
            latitude: lat,
        },
        score,
        text: text.into(),
    }
}

#[tokio::test]
async fn write_then_read_round_trip_is_unmodified() {
    let (pool, _dir) = test_pool().await;
    let submitted = review(
        "traveler",
        "Maiden Tower",
        49.8371,
        40.3664,
        8,
        "Worth the climb.",
    );

    db::reviews::insert_review(&pool, &submitted).await.unwrap();

    let fetched = db::reviews::reviews_for_landmark(
        &pool,
        MatchPolicy::default(),
        submitted.coordinate,
        &submitted.landmark,
    )
    .await
    .unwrap();

    assert_eq!(fetched, vec![submitted]);
}

#[tokio::test]
async fn nearby_review_matches_by_coordinate() {
    let (pool, _dir) = test_pool().await;
    db::reviews::insert_review(
        &pool,
        &review("a", "Some Other Name", 49.03, 40.05, 5, "Nice."),
    )
    .await
    .unwrap();

    let matched = db::reviews::reviews_for_landmark(
        &pool,
        MatchPolicy::default(),
        Coordinate {
            longitude: 49.0,
            latitude: 40.0,
        },
        "Maiden Tower",
    )
    .await
    .unwrap();

    assert_eq!(matched.len(), 1);
}

#[tokio::test]
async fn distant_review_with_dissimilar_name_does_not_match() {
    let (pool, _dir) = test_pool().await;
    db::reviews::insert_review(
        &pool,
        &review("a", "Eiffel Tower", 50.0, 41.5, 5, "Tall."),
    )
    .await
    .unwrap();

    let matched = db::reviews::reviews_for_landmark(
        &pool,
        MatchPolicy::default(),
        Coordinate {
            longitude: 49.0,
            latitude: 40.0,
        },
        "Maiden Tower",
    )
    .await
    .unwrap();

    assert!(matched.is_empty());
}

#[tokio::test]
async fn fuzzy_name_matches_across_the_map() {
    let (pool, _dir) = test_pool().await;
    db::reviews::insert_review(
        &pool,
        &review("a", "Maiden Tower, Baku", 2.29, 48.87, 5, "Historic."),
    )
    .await
    .unwrap();

    let matched = db::reviews::reviews_for_landmark(
        &pool,
        MatchPolicy::default(),
        Coordinate {
            longitude: 49.8371,
            latitude: 40.3664,
        },
        "Maiden Tower Baku",
    )
    .await
    .unwrap();

    assert_eq!(matched.len(), 1);
}

#[tokio::test]
async fn invalid_reviews_are_rejected_before_the_write() {
    let (pool, _dir) = test_pool().await;

    let bad_score = review("a", "Maiden Tower", 0.0, 0.0, 0, "text");
    assert!(db::reviews::insert_review(&pool, &bad_score).await.is_err());

    let blank_user = review("  ", "Maiden Tower", 0.0, 0.0, 5, "text");
    assert!(db::reviews::insert_review(&pool, &blank_user).await.is_err());

    assert!(db::reviews::all_reviews(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn rows_with_unparsable_coordinates_are_skipped() {
    let (pool, _dir) = test_pool().await;
    db::reviews::insert_review(
        &pool,
        &review("a", "Maiden Tower", 49.8371, 40.3664, 5, "Fine."),
    )
    .await
    .unwrap();

    // Legacy row written by hand with a broken coordinate string.
    sqlx::query(
        "INSERT INTO reviews (id, username, landmark, coordinates, score, review, created_at)
         VALUES ('legacy', 'b', 'Maiden Tower', 'garbage', 5, 'Old.', '2020-01-01T00:00:00Z')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let all = db::reviews::all_reviews(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].username, "a");
}

#[tokio::test]
async fn inserts_are_independent_records() {
    let (pool, _dir) = test_pool().await;
    // Same user, same landmark: both kept, nothing overwritten.
    db::reviews::insert_review(
        &pool,
        &review("a", "Maiden Tower", 49.8371, 40.3664, 5, "First visit."),
    )
    .await
    .unwrap();
    db::reviews::insert_review(
        &pool,
        &review("a", "Maiden Tower", 49.8371, 40.3664, 9, "Second visit."),
    )
    .await
    .unwrap();

    let all = db::reviews::all_reviews(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
}
