//! API error type for landmarker-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Domain error with a stable numeric code
    #[error(transparent)]
    Service(#[from] landmarker_common::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, 400, msg),
            ApiError::Service(err) => {
                use landmarker_common::Error;
                let status = match err {
                    Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    // Upstream service failures are terminal for the request.
                    Error::Credential(_)
                    | Error::Recognition(_)
                    | Error::Geolocation(_)
                    | Error::Summary(_)
                    | Error::Persistence(_)
                    | Error::MapRender(_) => StatusCode::BAD_GATEWAY,
                };
                (status, err.code(), err.to_string())
            }
            ApiError::Other(err) => (StatusCode::INTERNAL_SERVER_ERROR, 0, err.to_string()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
