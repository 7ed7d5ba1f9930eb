//! Image identification endpoint
//!
//! One request drives the whole pipeline in order: recognize the uploaded
//! image, place candidates on the map, reverse-geocode the best candidate,
//! assemble deep links, and attach matching reviews. When recognition
//! returns zero candidates the request short-circuits: no geolocation,
//! summary, or review call is made.

use crate::api::reviews::{fetch_reviews_degraded, ReviewView};
use crate::error::{ApiError, ApiResult};
use crate::map;
use crate::services::wikipedia::fallback_search_url;
use crate::AppState;
use axum::extract::{Multipart, Query, State};
use axum::routing::post;
use axum::{Json, Router};
use landmarker_common::confidence::Bucket;
use landmarker_common::map_state::MapState;
use landmarker_common::types::Candidate;
use landmarker_common::Error;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Accepted upload MIME types
const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Message for the zero-candidate path
const NO_LANDMARKS_MESSAGE: &str = "No landmarks detected. The image may not show a landmark, \
     the landmark may not be famous enough, or the image may not be clear enough.";

pub fn identify_routes() -> Router<AppState> {
    Router::new().route("/api/identify", post(identify))
}

#[derive(Debug, Deserialize)]
struct IdentifyParams {
    #[serde(default)]
    satellite: bool,
}

#[derive(Debug, Serialize)]
struct CandidateView {
    name: String,
    confidence: f64,
    latitude: f64,
    longitude: f64,
    bucket: Bucket,
    glyph: &'static str,
    color: &'static str,
}

#[derive(Debug, Serialize)]
struct BestLandmark {
    name: String,
    confidence: f64,
    latitude: f64,
    longitude: f64,
    city: String,
    country: String,
    google_maps_url: String,
    wikipedia_url: String,
}

#[derive(Debug, Serialize)]
struct IdentifyResponse {
    detected: bool,
    candidates: Vec<CandidateView>,
    best: Option<BestLandmark>,
    reviews: Vec<ReviewView>,
    /// Self-contained map document, directly downloadable
    map_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// POST /api/identify?satellite=bool (multipart, `image` part)
async fn identify(
    State(state): State<AppState>,
    Query(params): Query<IdentifyParams>,
    mut multipart: Multipart,
) -> ApiResult<Json<IdentifyResponse>> {
    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("failed to read image part: {}", e)))?;
            image = Some(bytes);
        }
    }
    let image = image.ok_or_else(|| ApiError::BadRequest("missing 'image' part".into()))?;
    validate_image(&image)?;

    let candidates = state.vision.find_landmarks(&image).await?;

    if candidates.is_empty() {
        info!("No landmarks detected in upload");
        return Ok(Json(IdentifyResponse {
            detected: false,
            candidates: Vec::new(),
            best: None,
            reviews: Vec::new(),
            map_html: None,
            message: Some(NO_LANDMARKS_MESSAGE.to_string()),
        }));
    }

    let mut map_state = MapState::new(state.config.thresholds);
    for candidate in &candidates {
        map_state.add_candidate(candidate.clone());
    }
    let best = map_state
        .best()
        .cloned()
        .ok_or_else(|| Error::MapRender("no best candidate for non-empty map".into()))?;

    let map_html = map::render(&map_state, params.satellite);

    let location = state.geocoder.reverse(best.latitude, best.longitude).await?;

    let wikipedia_url = match state.wikipedia.page_url(&best.name).await {
        Ok(Some(url)) => url,
        Ok(None) => fallback_search_url(&best.name),
        Err(e) => {
            warn!("Wikipedia lookup failed, using search fallback: {}", e);
            fallback_search_url(&best.name)
        }
    };
    let google_maps_url = format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        best.latitude, best.longitude
    );

    let reviews = fetch_reviews_degraded(&state, best.coordinate(), &best.name).await;

    info!(
        best = %best.name,
        confidence = best.confidence,
        candidates = candidates.len(),
        "Identification complete"
    );

    let thresholds = state.config.thresholds;
    Ok(Json(IdentifyResponse {
        detected: true,
        candidates: candidates.into_iter().map(|c| view(c, thresholds)).collect(),
        best: Some(BestLandmark {
            name: best.name,
            confidence: best.confidence,
            latitude: best.latitude,
            longitude: best.longitude,
            city: location.city,
            country: location.country,
            google_maps_url,
            wikipedia_url,
        }),
        reviews: reviews.into_iter().map(ReviewView::from).collect(),
        map_html: Some(map_html),
        message: None,
    }))
}

fn view(candidate: Candidate, thresholds: landmarker_common::confidence::Thresholds) -> CandidateView {
    let bucket = thresholds.bucket(candidate.confidence);
    CandidateView {
        name: candidate.name,
        confidence: candidate.confidence,
        latitude: candidate.latitude,
        longitude: candidate.longitude,
        bucket,
        glyph: bucket.glyph(),
        color: bucket.color(),
    }
}

/// Reject uploads that are not actually png/jpeg/webp bytes
fn validate_image(bytes: &[u8]) -> Result<(), ApiError> {
    let kind = infer::get(bytes)
        .ok_or_else(|| ApiError::BadRequest("unrecognized image format".into()))?;
    if !SUPPORTED_IMAGE_TYPES.contains(&kind.mime_type()) {
        return Err(ApiError::BadRequest(format!(
            "unsupported image format {} (expected png, jpg, jpeg, or webp)",
            kind.mime_type()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal valid PNG signature plus header bytes.
    const PNG_HEADER: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
        0x44, 0x52,
    ];

    #[test]
    fn png_bytes_are_accepted() {
        assert!(validate_image(PNG_HEADER).is_ok());
    }

    #[test]
    fn jpeg_bytes_are_accepted() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00];
        assert!(validate_image(&jpeg).is_ok());
    }

    #[test]
    fn text_bytes_are_rejected() {
        assert!(validate_image(b"just some text, not an image").is_err());
    }

    #[test]
    fn other_binary_formats_are_rejected() {
        // GIF magic: supported by some viewers but not by this service.
        let gif = b"GIF89a\x01\x00\x01\x00";
        assert!(validate_image(gif).is_err());
    }
}
