//! Summary endpoints: synchronous completion and SSE streaming
//!
//! Streaming is request-scoped: clients choose it by calling the stream
//! endpoint, not by flipping session state. A started stream runs to
//! completion or failure; there is no cancellation path.

use crate::error::{ApiError, ApiResult};
use crate::services::summary::landmark_prompt;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{info, warn};

pub fn summary_routes() -> Router<AppState> {
    Router::new()
        .route("/api/summary", post(generate_summary))
        .route("/api/summary/stream", get(stream_summary))
}

#[derive(Debug, Deserialize)]
struct SummaryRequest {
    landmark: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
}

/// POST /api/summary
async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let prompt = landmark_prompt(&request.landmark, &request.city, &request.country);
    let summary = state
        .summarizer
        .generate_summary(&prompt)
        .await
        .map_err(ApiError::Service)?;
    Ok(Json(json!({ "summary": summary })))
}

/// GET /api/summary/stream?landmark=..&city=..&country=..
///
/// SSE stream of `delta` events, one text fragment at a time, terminated by
/// a `done` event. Delta failures surface as an `error` event and end the
/// stream.
async fn stream_summary(
    State(state): State<AppState>,
    Query(request): Query<SummaryRequest>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    info!(landmark = %request.landmark, "New SSE client for summary stream");

    let prompt = landmark_prompt(&request.landmark, &request.city, &request.country);
    let deltas = state
        .summarizer
        .stream_summary(prompt)
        .await
        .map_err(ApiError::Service)?;

    let stream = async_stream::stream! {
        futures::pin_mut!(deltas);
        while let Some(item) = deltas.next().await {
            match item {
                Ok(text) => yield Ok(Event::default().event("delta").data(text)),
                Err(e) => {
                    warn!("Summary stream failed: {}", e);
                    yield Ok(Event::default().event("error").data(e.to_string()));
                    return;
                }
            }
        }
        yield Ok(Event::default().event("done").data(""));
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    ))
}
