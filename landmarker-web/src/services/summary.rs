//! LLM summary generation client
//!
//! Wraps an OpenAI-compatible chat-completions endpoint (Together AI) for
//! three operations: a synchronous landmark summary, a streamed landmark
//! summary (sequence of text deltas), and a review digest. Synchronous
//! completions are memoized in a single-level in-process cache keyed by
//! prompt. A started stream runs to completion or failure; there is no
//! cancellation.

use crate::config::{resolve_api_key, SummaryConfig, LLM_API_KEY_ENV};
use futures::{Stream, StreamExt};
use landmarker_common::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default timeout for completion requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// System message for landmark summaries
const LANDMARK_SYSTEM_PROMPT: &str =
    "Your job is to provide a short, concise, and informative summary about the landmark.";

/// System message for review digests
const REVIEW_SYSTEM_PROMPT: &str = "Your job is to summarize the reviews for a given landmark. \
     You must focus on the reviews and extract as much info as possible and analyze the reviews \
     to write a conclusion with upsides and downsides of the landmark with some key points.";

/// Prompt for the landmark summary
pub fn landmark_prompt(landmark: &str, city: &str, country: &str) -> String {
    format!(
        "Craft a professional and concise 80-word summary about {} in {}, {}. \
         Include the origin of its name, historical significance, and cultural impact. \
         Share fascinating facts that make it a must-visit for tourists.",
        landmark, city, country
    )
}

/// Prompt for the review digest
pub fn review_prompt(landmark: &str, city: &str, country: &str, reviews: &[String]) -> String {
    format!(
        "Craft a professional and concise 2-3 sentence review summary about {} in {}, {} \
         considering the reviews: {}.",
        landmark,
        city,
        country,
        reviews.join(", ")
    )
}

/// Chat-completions client with prompt-keyed memoization
pub struct SummaryClient {
    http_client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    cache: Arc<Mutex<HashMap<String, String>>>,
}

impl SummaryClient {
    pub fn new(config: &SummaryConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::Summary(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: resolve_api_key(LLM_API_KEY_ENV, config.api_key.as_deref(), "LLM"),
            cache: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::Credential(format!(
                "LLM API key not configured (set {})",
                LLM_API_KEY_ENV
            ))
        })
    }

    /// Generate a landmark summary synchronously (memoized)
    pub async fn generate_summary(&self, prompt: &str) -> Result<String> {
        self.cached_chat(Some(LANDMARK_SYSTEM_PROMPT), prompt).await
    }

    /// Digest a set of reviews synchronously (memoized)
    pub async fn summarize_reviews(&self, prompt: &str) -> Result<String> {
        self.cached_chat(Some(REVIEW_SYSTEM_PROMPT), prompt).await
    }

    async fn cached_chat(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        {
            let cache = self.cache.lock().await;
            if let Some(hit) = cache.get(prompt) {
                debug!("Summary cache hit");
                return Ok(hit.clone());
            }
        }
        debug!("Summary cache miss");
        let completion = self.chat(system, prompt).await?;
        self.cache
            .lock()
            .await
            .insert(prompt.to_string(), completion.clone());
        Ok(completion)
    }

    async fn chat(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(system, prompt),
            stream: false,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.api_key()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Summary(format!("completion request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Credential("LLM API rejected the key".into()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Summary(format!(
                "completion API returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Summary(format!("failed to parse completion: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|message| message.content)
            .ok_or_else(|| Error::Summary("completion had no choices".into()))
    }

    /// Stream a landmark summary as a sequence of text deltas
    ///
    /// The initial request error surfaces from this call; per-delta failures
    /// surface as an `Err` item that ends the stream.
    pub async fn stream_summary(
        &self,
        prompt: String,
    ) -> Result<impl Stream<Item = Result<String>>> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: build_messages(Some(LANDMARK_SYSTEM_PROMPT), &prompt),
            stream: true,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(self.api_key()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Summary(format!("streaming request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Summary(format!(
                "streaming API returned {}: {}",
                status, body
            )));
        }

        let mut bytes = response.bytes_stream();
        let stream = async_stream::stream! {
            let mut buffer = String::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(Error::Summary(format!("stream transport failed: {}", e)));
                        return;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));
                while let Some(newline) = buffer.find('\n') {
                    let line = buffer[..newline].trim().to_string();
                    buffer.drain(..=newline);
                    match parse_stream_line(&line) {
                        StreamLine::Delta(text) => yield Ok(text),
                        StreamLine::Done => return,
                        StreamLine::Skip => {}
                    }
                }
            }
        };
        Ok(stream)
    }
}

fn build_messages(system: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::new();
    if let Some(system) = system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: prompt.to_string(),
    });
    messages
}

/// One parsed line of the provider's SSE stream
#[derive(Debug, PartialEq)]
enum StreamLine {
    Delta(String),
    Done,
    Skip,
}

fn parse_stream_line(line: &str) -> StreamLine {
    let Some(data) = line.strip_prefix("data:") else {
        return StreamLine::Skip;
    };
    let data = data.trim();
    if data == "[DONE]" {
        return StreamLine::Done;
    }
    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            warn!("Unparseable stream chunk ({}): {}", e, data);
            return StreamLine::Skip;
        }
    };
    let Some(choice) = chunk.choices.into_iter().next() else {
        return StreamLine::Skip;
    };
    let text = choice
        .delta
        .and_then(|delta| delta.content)
        .or(choice.text);
    match text {
        Some(text) if !text.is_empty() => StreamLine::Delta(text),
        _ => StreamLine::Skip,
    }
}

// ============================================================================
// Chat Completion Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<StreamDelta>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_prompt_mentions_place() {
        let prompt = landmark_prompt("Maiden Tower", "Baku", "Azerbaijan");
        assert!(prompt.contains("Maiden Tower in Baku, Azerbaijan"));
        assert!(prompt.contains("80-word"));
    }

    #[test]
    fn review_prompt_joins_reviews() {
        let prompt = review_prompt(
            "Maiden Tower",
            "Baku",
            "Azerbaijan",
            &["Great view.".to_string(), "Crowded at noon.".to_string()],
        );
        assert!(prompt.contains("Great view., Crowded at noon."));
    }

    #[test]
    fn parses_delta_stream_lines() {
        let line = r#"data: {"choices":[{"delta":{"content":"The Maiden"}}]}"#;
        assert_eq!(
            parse_stream_line(line),
            StreamLine::Delta("The Maiden".to_string())
        );
    }

    #[test]
    fn parses_legacy_text_stream_lines() {
        let line = r#"data: {"choices":[{"text":" Tower"}]}"#;
        assert_eq!(parse_stream_line(line), StreamLine::Delta(" Tower".to_string()));
    }

    #[test]
    fn done_sentinel_ends_the_stream() {
        assert_eq!(parse_stream_line("data: [DONE]"), StreamLine::Done);
    }

    #[test]
    fn comments_blanks_and_garbage_are_skipped() {
        assert_eq!(parse_stream_line(""), StreamLine::Skip);
        assert_eq!(parse_stream_line(": keep-alive"), StreamLine::Skip);
        assert_eq!(parse_stream_line("data: not-json"), StreamLine::Skip);
        assert_eq!(
            parse_stream_line(r#"data: {"choices":[{"delta":{}}]}"#),
            StreamLine::Skip
        );
    }

    #[test]
    fn chat_response_parses_message_content() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"A 12th-century monument."}}]}"#,
        )
        .unwrap();
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .map(|m| m.content)
            .unwrap();
        assert_eq!(content, "A 12th-century monument.");
    }

    #[test]
    fn message_order_puts_system_first() {
        let messages = build_messages(Some("sys"), "user prompt");
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
        let messages = build_messages(None, "user prompt");
        assert_eq!(messages.len(), 1);
    }
}
