//! Common error types for Landmarker

use thiserror::Error;

/// Common result type for Landmarker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the Landmarker service
///
/// Every fatal category aborts the current request; `Persistence` failures on
/// the read path degrade to an empty result set instead.
#[derive(Error, Debug)]
pub enum Error {
    /// API key or credential material missing or rejected
    #[error("Credential error: {0}")]
    Credential(String),

    /// Vision call failed or the image was unreadable
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// Reverse geocoding failed (including rate limiting after retries)
    #[error("Geolocation error: {0}")]
    Geolocation(String),

    /// LLM completion call failed
    #[error("Summary error: {0}")]
    Summary(String),

    /// Review store read/write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Map document could not be produced
    #[error("Map render error: {0}")]
    MapRender(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Stable numeric code carried in user-facing error payloads
    pub fn code(&self) -> u16 {
        match self {
            Error::Credential(_) => 1,
            Error::Recognition(_) => 4,
            Error::Geolocation(_) => 7,
            Error::MapRender(_) => 16,
            Error::Summary(_) => 24,
            Error::Persistence(_) => 101,
            Error::InvalidInput(_) => 400,
        }
    }
}
