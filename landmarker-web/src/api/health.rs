//! Health check endpoint

use crate::AppState;
use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "landmarker-web",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
