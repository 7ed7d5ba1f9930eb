//! landmarker-web - Landmark Identification Service
//!
//! Accepts a photograph, recognizes landmark candidates via an external
//! vision API, plots them on an interactive map, reverse-geocodes the best
//! match, and serves LLM summaries and crowd-sourced reviews over
//! HTTP REST + SSE.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use landmarker_web::{AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting landmarker-web");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::var("LANDMARKER_CONFIG").ok().map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    info!("Database: {}", config.database_path.display());
    let db_pool = landmarker_web::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    let bind_address = config.bind_address.clone();
    let state = AppState::new(db_pool, config)?;

    let app = landmarker_web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
