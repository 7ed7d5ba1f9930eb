//! Landmark recognition client
//!
//! Wraps the Google Vision `images:annotate` REST endpoint: one image in,
//! a list of (name, confidence, coordinate) candidates out. Transport,
//! authentication, and malformed-response failures are all terminal for the
//! current request; there is no retry.

use crate::config::{resolve_api_key, VisionConfig, VISION_API_KEY_ENV};
use base64::Engine;
use landmarker_common::types::Candidate;
use landmarker_common::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default timeout for recognition requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Landmark recognizer backed by the Vision REST API
pub struct VisionClient {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
    max_results: u32,
}

impl VisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::Recognition(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            api_key: resolve_api_key(VISION_API_KEY_ENV, config.api_key.as_deref(), "Vision"),
            max_results: config.max_results,
        })
    }

    /// Detect landmark candidates in an image
    ///
    /// Only the first coordinate per annotation is used; annotations without
    /// a coordinate are dropped.
    pub async fn find_landmarks(&self, image: &[u8]) -> Result<Vec<Candidate>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Credential(format!(
                "vision API key not configured (set {})",
                VISION_API_KEY_ENV
            ))
        })?;

        debug!(image_bytes = image.len(), "Requesting landmark detection");

        let content = base64::engine::general_purpose::STANDARD.encode(image);
        let body = serde_json::json!({
            "requests": [{
                "image": { "content": content },
                "features": [{
                    "type": "LANDMARK_DETECTION",
                    "maxResults": self.max_results,
                }],
            }],
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Recognition(format!("vision request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Credential(format!(
                "vision API rejected the key ({})",
                status
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Recognition(format!(
                "vision API returned {}: {}",
                status, body
            )));
        }

        let annotate: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| Error::Recognition(format!("failed to parse vision response: {}", e)))?;

        let candidates = parse_annotations(annotate)?;
        debug!(count = candidates.len(), "Landmark detection complete");
        Ok(candidates)
    }
}

/// Convert the annotate response tree into candidates
fn parse_annotations(response: AnnotateResponse) -> Result<Vec<Candidate>> {
    let Some(first) = response.responses.into_iter().next() else {
        return Err(Error::Recognition("empty annotate response".into()));
    };

    if let Some(err) = first.error {
        return Err(Error::Recognition(format!(
            "vision API error: {}",
            err.message
        )));
    }

    let candidates = first
        .landmark_annotations
        .into_iter()
        .filter_map(|annotation| {
            let location = annotation.locations.into_iter().next()?;
            Some(Candidate {
                name: annotation.description,
                confidence: annotation.score.clamp(0.0, 1.0),
                latitude: location.lat_lng.latitude,
                longitude: location.lat_lng.longitude,
            })
        })
        .collect();
    Ok(candidates)
}

// ============================================================================
// Vision API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
struct AnnotateImageResponse {
    #[serde(default, rename = "landmarkAnnotations")]
    landmark_annotations: Vec<LandmarkAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct LandmarkAnnotation {
    description: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    locations: Vec<LocationInfo>,
}

#[derive(Debug, Deserialize)]
struct LocationInfo {
    #[serde(rename = "latLng")]
    lat_lng: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}
