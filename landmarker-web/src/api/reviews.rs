//! Review endpoints: create, fetch for a landmark, and AI digest
//!
//! Read failures are non-fatal and degrade to an empty result set; write
//! failures surface as persistence errors.

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::services::summary::review_prompt;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use landmarker_common::types::{Coordinate, Review};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/api/reviews", post(create_review).get(get_reviews))
        .route("/api/reviews/summarize", post(summarize_reviews))
}

/// Review as presented to clients: masked username plus rating labels
#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub username: String,
    pub landmark: String,
    pub score: i64,
    pub rating: &'static str,
    pub stars: String,
    pub text: String,
}

impl From<Review> for ReviewView {
    fn from(review: Review) -> Self {
        Self {
            username: mask_username(&review.username),
            landmark: review.landmark,
            score: review.score,
            rating: score_label(review.score),
            stars: score_stars(review.score),
            text: review.text,
        }
    }
}

/// Mask a username for display: words longer than 3 characters keep their
/// first two and last characters
pub fn mask_username(username: &str) -> String {
    username
        .split_whitespace()
        .map(|word| {
            let chars: Vec<char> = word.chars().collect();
            if chars.len() > 3 {
                let first: String = chars[..2].iter().collect();
                let last = chars[chars.len() - 1];
                format!("{}{}{}", first, "*".repeat(chars.len() - 3), last)
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Adjective for a 1-10 score
pub fn score_label(score: i64) -> &'static str {
    if score >= 9 {
        "Excellent"
    } else if score >= 7 {
        "Good"
    } else if score >= 5 {
        "Average"
    } else if score >= 3 {
        "Poor"
    } else {
        "Terrible"
    }
}

/// Star rendering for a 1-10 score, one star per 2-point band
pub fn score_stars(score: i64) -> String {
    let count = if score <= 2 {
        1
    } else if score <= 4 {
        2
    } else if score <= 6 {
        3
    } else if score <= 8 {
        4
    } else {
        5
    };
    "⭐".repeat(count)
}

/// POST /api/reviews
async fn create_review(
    State(state): State<AppState>,
    Json(review): Json<Review>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    db::reviews::insert_review(&state.db, &review).await?;
    Ok((StatusCode::CREATED, Json(json!({"status": "created"}))))
}

#[derive(Debug, Deserialize)]
struct ReviewQuery {
    lat: f64,
    lon: f64,
    name: String,
}

/// GET /api/reviews?lat=..&lon=..&name=..
async fn get_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let coordinate = Coordinate {
        longitude: query.lon,
        latitude: query.lat,
    };
    let reviews = fetch_reviews_degraded(&state, coordinate, &query.name).await;
    let views: Vec<ReviewView> = reviews.into_iter().map(ReviewView::from).collect();
    Ok(Json(json!({ "reviews": views })))
}

#[derive(Debug, Deserialize)]
struct SummarizeRequest {
    landmark: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

/// POST /api/reviews/summarize
///
/// Aggregates matching reviews into an average score and an LLM digest.
/// With no matching reviews, replies without making an LLM call.
async fn summarize_reviews(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let coordinate = Coordinate {
        longitude: request.lon,
        latitude: request.lat,
    };
    let reviews = fetch_reviews_degraded(&state, coordinate, &request.landmark).await;

    if reviews.is_empty() {
        return Ok(Json(json!({
            "review_count": 0,
            "message": "No reviews yet. Be the first one to review this landmark!",
        })));
    }

    let total: i64 = reviews.iter().map(|r| r.score).sum();
    let overall_score = (total as f64 / reviews.len() as f64 * 100.0).round() / 100.0;

    let texts: Vec<String> = reviews.iter().map(|r| r.text.clone()).collect();
    let prompt = review_prompt(&request.landmark, &request.city, &request.country, &texts);
    let summary = state
        .summarizer
        .summarize_reviews(&prompt)
        .await
        .map_err(ApiError::Service)?;

    Ok(Json(json!({
        "review_count": reviews.len(),
        "overall_score": overall_score,
        "summary": summary,
    })))
}

/// Fetch matching reviews, degrading read failures to an empty list
pub async fn fetch_reviews_degraded(
    state: &AppState,
    coordinate: Coordinate,
    landmark: &str,
) -> Vec<Review> {
    match db::reviews::reviews_for_landmark(
        &state.db,
        state.config.review_match,
        coordinate,
        landmark,
    )
    .await
    {
        Ok(reviews) => reviews,
        Err(e) => {
            warn!("Review lookup failed, degrading to empty list: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_words_keeping_edges() {
        assert_eq!(mask_username("Elshad"), "El***d");
        assert_eq!(mask_username("Elshad Sabziyev"), "El***d Sa*****v");
    }

    #[test]
    fn short_words_are_left_alone() {
        assert_eq!(mask_username("Bob"), "Bob");
        assert_eq!(mask_username("Al"), "Al");
    }

    #[test]
    fn labels_follow_score_bands() {
        assert_eq!(score_label(10), "Excellent");
        assert_eq!(score_label(9), "Excellent");
        assert_eq!(score_label(7), "Good");
        assert_eq!(score_label(5), "Average");
        assert_eq!(score_label(3), "Poor");
        assert_eq!(score_label(1), "Terrible");
    }

    #[test]
    fn stars_follow_two_point_bands() {
        assert_eq!(score_stars(1), "⭐");
        assert_eq!(score_stars(2), "⭐");
        assert_eq!(score_stars(4), "⭐⭐");
        assert_eq!(score_stars(6), "⭐⭐⭐");
        assert_eq!(score_stars(8), "⭐⭐⭐⭐");
        assert_eq!(score_stars(10), "⭐⭐⭐⭐⭐");
    }
}
