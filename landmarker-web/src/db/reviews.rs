//! Review store operations
//!
//! Insert-only persistence: each submission becomes a new independent record
//! (last-write-wins, no transaction or conflict detection) and is never
//! mutated afterwards. Landmark lookup is a full linear scan filtered by the
//! matching policy; no index is used, so record count determines latency.

use chrono::Utc;
use landmarker_common::matching::MatchPolicy;
use landmarker_common::types::{Coordinate, Review};
use landmarker_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use tracing::warn;
use uuid::Uuid;

/// Persist a new review
pub async fn insert_review(db: &SqlitePool, review: &Review) -> Result<()> {
    review.validate()?;

    sqlx::query(
        r#"
        INSERT INTO reviews (id, username, landmark, coordinates, score, review, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&review.username)
    .bind(&review.landmark)
    .bind(review.coordinate.to_string())
    .bind(review.score)
    .bind(&review.text)
    .bind(Utc::now().to_rfc3339())
    .execute(db)
    .await
    .map_err(|e| Error::Persistence(format!("insert review failed: {}", e)))?;

    Ok(())
}

/// All stored reviews in submission order
pub async fn all_reviews(db: &SqlitePool) -> Result<Vec<Review>> {
    let rows = sqlx::query(
        "SELECT username, landmark, coordinates, score, review FROM reviews ORDER BY created_at",
    )
    .fetch_all(db)
    .await
    .map_err(|e| Error::Persistence(format!("fetch reviews failed: {}", e)))?;

    let mut reviews = Vec::with_capacity(rows.len());
    for row in rows {
        let coordinates: String = row.get("coordinates");
        let coordinate: Coordinate = match coordinates.parse() {
            Ok(coordinate) => coordinate,
            Err(e) => {
                // Legacy rows with unparsable coordinates are skipped, not fatal.
                warn!("Skipping review with bad coordinates {:?}: {}", coordinates, e);
                continue;
            }
        };
        reviews.push(Review {
            username: row.get("username"),
            landmark: row.get("landmark"),
            coordinate,
            score: row.get("score"),
            text: row.get("review"),
        });
    }
    Ok(reviews)
}

/// Reviews matching a query landmark by coordinate radius or fuzzy name
pub async fn reviews_for_landmark(
    db: &SqlitePool,
    policy: MatchPolicy,
    coordinate: Coordinate,
    landmark: &str,
) -> Result<Vec<Review>> {
    let reviews = all_reviews(db).await?;
    Ok(reviews
        .into_iter()
        .filter(|review| policy.matches(review, coordinate, landmark))
        .collect())
}
