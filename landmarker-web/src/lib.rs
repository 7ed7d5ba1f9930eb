//! landmarker-web library interface
//!
//! Exposes the application state and router for the binary and for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod map;
pub mod services;

pub use crate::config::Config;
pub use crate::error::{ApiError, ApiResult};

use crate::services::{GeocodingClient, SummaryClient, VisionClient, WikipediaClient};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
///
/// Each external client is constructed independently and injected here; no
/// handler builds its own client.
#[derive(Clone)]
pub struct AppState {
    /// Review store connection pool
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub vision: Arc<VisionClient>,
    pub geocoder: Arc<GeocodingClient>,
    pub summarizer: Arc<SummaryClient>,
    pub wikipedia: Arc<WikipediaClient>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> landmarker_common::Result<Self> {
        let vision = VisionClient::new(&config.vision)?;
        let geocoder = GeocodingClient::new(&config.geocoding)?;
        let summarizer = SummaryClient::new(&config.summary)?;
        let wikipedia = WikipediaClient::new(
            config.wikipedia_endpoint.clone(),
            &config.geocoding.user_agent,
        )?;
        Ok(Self {
            db,
            config: Arc::new(config),
            vision: Arc::new(vision),
            geocoder: Arc::new(geocoder),
            summarizer: Arc::new(summarizer),
            wikipedia: Arc::new(wikipedia),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI routes (HTML pages)
        .merge(api::ui_routes())
        // API routes
        .merge(api::identify_routes())
        .merge(api::summary_routes())
        .merge(api::review_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
