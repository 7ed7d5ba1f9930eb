//! External service clients for landmarker-web
//!
//! Each client is a stateless wrapper: one request in, one parsed response
//! out (or, for the summary client, a sequence of text deltas). Clients are
//! constructed independently and injected into handlers through `AppState`.

pub mod geocoding;
pub mod summary;
pub mod vision;
pub mod wikipedia;

pub use geocoding::{GeocodingClient, ResolvedLocation};
pub use summary::SummaryClient;
pub use vision::VisionClient;
pub use wikipedia::WikipediaClient;
