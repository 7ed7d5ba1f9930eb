//! HTTP API handlers for landmarker-web

pub mod health;
pub mod identify;
pub mod reviews;
pub mod summary;
pub mod ui;

pub use health::health_routes;
pub use identify::identify_routes;
pub use reviews::review_routes;
pub use summary::summary_routes;
pub use ui::ui_routes;
