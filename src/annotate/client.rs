//! HTTP annotation client.
//!
//! Talks to an OpenRouter-compatible chat completions API. One request per
//! review, low temperature so the model's pipe-delimited formatting stays
//! consistent within a run.

use super::prompt::{build_prompt, SYSTEM_PROMPT};
use super::schema::AnnotationFields;
use crate::config::AnnotatorSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default OpenRouter chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Attribution headers expected by OpenRouter.
const HTTP_REFERER: &str = "https://github.com/actions";
const APP_TITLE: &str = "Review Annotator";

/// Delay before retrying after a transport-level failure.
const TRANSPORT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Cap on the rate-limit backoff exponent (2^6 = 64 seconds).
const MAX_BACKOFF_EXP: u32 = 6;

/// Errors from annotating a single review.
///
/// The retry policy is a function of the variant: `RateLimited` and
/// `Transport` are only produced once the configured retries are exhausted,
/// the other variants are returned immediately.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Non-success, non-rate-limit HTTP status. Not retried.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit responses outlasted every backoff attempt.
    #[error("rate limited after {0} attempts")]
    RateLimited(u32),

    /// Network failure or timeout, retries exhausted.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API replied successfully but with no completion text. Not retried.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The completion did not hold exactly the expected field count. Not
    /// retried.
    #[error("malformed model response: expected {expected} fields, found {found}")]
    SchemaMismatch { expected: usize, found: usize },
}

/// Source of annotations for a single review.
///
/// The batch scheduler only depends on this trait, so tests can drive it
/// with a scripted implementation instead of a live endpoint.
#[async_trait]
pub trait Annotator: Send + Sync {
    async fn annotate(
        &self,
        review_text: &str,
        customer_name: &str,
    ) -> Result<AnnotationFields, AnnotationError>;
}

/// [`Annotator`] backed by an OpenRouter-compatible HTTP endpoint.
///
/// Holds no cross-call state beyond the static headers, so a single
/// instance can be shared freely.
pub struct HttpAnnotator {
    client: Client,
    api_url: String,
    model: String,
    api_key: String,
    max_retries: u32,
    temperature: f32,
    max_tokens: u32,
}

impl HttpAnnotator {
    pub fn new(api_key: impl Into<String>, settings: &AnnotatorSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
            api_key: api_key.into(),
            max_retries: settings.max_retries,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Annotator for HttpAnnotator {
    async fn annotate(
        &self,
        review_text: &str,
        customer_name: &str,
    ) -> Result<AnnotationFields, AnnotationError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(review_text, customer_name),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let mut attempt = 0u32;
        loop {
            debug!(model = %self.model, attempt, "Sending annotation request");

            let response = match self
                .client
                .post(&self.api_url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("HTTP-Referer", HTTP_REFERER)
                .header("X-Title", APP_TITLE)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        return Err(AnnotationError::Transport(e.to_string()));
                    }
                    warn!(error = %e, attempt, "Request failed, retrying");
                    tokio::time::sleep(TRANSPORT_RETRY_DELAY).await;
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 {
                attempt += 1;
                if attempt >= self.max_retries {
                    return Err(AnnotationError::RateLimited(self.max_retries));
                }
                let delay = rate_limit_backoff(attempt - 1);
                warn!(
                    delay_secs = delay.as_secs(),
                    attempt, "Rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(AnnotationError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: ChatResponse = match response.json().await {
                Ok(body) => body,
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        return Err(AnnotationError::Transport(e.to_string()));
                    }
                    warn!(error = %e, attempt, "Undecodable response body, retrying");
                    tokio::time::sleep(TRANSPORT_RETRY_DELAY).await;
                    continue;
                }
            };

            let content = body
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default();

            if content.trim().is_empty() {
                return Err(AnnotationError::EmptyResponse);
            }

            return parse_completion(&content);
        }
    }
}

/// Backoff duration before the next attempt after `attempt` rate-limit
/// responses: `2^attempt` seconds, capped.
fn rate_limit_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.min(MAX_BACKOFF_EXP))
}

/// Split the completion text into the schema's fields.
fn parse_completion(content: &str) -> Result<AnnotationFields, AnnotationError> {
    let payload = extract_payload(content);
    let values: Vec<String> = payload.split('|').map(|v| v.trim().to_string()).collect();
    AnnotationFields::new(values)
}

/// Models occasionally wrap the answer in a markdown code fence; take the
/// first line that contains a delimiter and is not a fence marker.
fn extract_payload(content: &str) -> &str {
    if content.contains("```") {
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.contains('|') && !trimmed.starts_with("```") {
                return trimmed;
            }
        }
    }
    content.trim()
}

// OpenRouter API types (OpenAI chat completions shape)

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}
