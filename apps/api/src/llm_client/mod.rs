//! LLM Client: the single point of entry for all model calls in the scoring service.
//!
//! ARCHITECTURAL RULE: No other module may call the model provider directly.
//! Scoring code depends on the [`StructuredModel`] trait; [`LlmClient`] is the
//! production implementation against an OpenAI-compatible Chat Completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// Default model for resume scoring. Overridable via `SCORING_MODEL`.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Model refused: {0}")]
    Refusal(String),
}

/// Token accounting reported by the provider for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn add(&mut self, other: &Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// One schema-constrained generation: system prompt, user input, and the
/// JSON Schema the output object must follow.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRequest<'a> {
    pub schema_name: &'a str,
    pub system: &'a str,
    pub prompt: &'a str,
    pub schema: &'a Value,
}

/// Raw (not yet validated) object returned by the model plus usage.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectResponse {
    pub object: Value,
    pub usage: Usage,
}

/// The model boundary. Implement this to swap providers (or stub the model
/// in tests) without touching the scoring pipeline.
#[async_trait]
pub trait StructuredModel: Send + Sync {
    async fn generate_object(&self, request: ObjectRequest<'_>) -> Result<ObjectResponse, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a Value,
    strict: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
    #[serde(default)]
    pub refusal: Option<String>,
}

impl ChatResponse {
    /// Extracts the text content of the first choice.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    fn refusal(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.refusal.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single LLM client used by the scoring service.
/// Wraps the Chat Completions API with retry logic and structured output.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    /// Bound on each HTTP attempt. Matches the per-aspect timeout.
    request_timeout: Duration,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: String,
        model: String,
        request_timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            request_timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, body: &ChatRequest<'_>) -> Result<Request, LlmError> {
        Ok(self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .timeout(self.request_timeout)
            .json(body)
            .build()?)
    }

    /// Makes a raw schema-constrained completion call, returning the full response.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, request: ObjectRequest<'_>) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: request.schema_name,
                    schema: request.schema,
                    // Local validation is authoritative; the provider's strict
                    // mode rejects several keywords schemars emits.
                    strict: false,
                },
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .execute(self.build_request(&request_body)?)
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            debug!(
                "LLM call succeeded: schema={}, prompt_tokens={}, completion_tokens={}",
                request.schema_name,
                chat_response.usage.prompt_tokens,
                chat_response.usage.completion_tokens
            );

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl StructuredModel for LlmClient {
    async fn generate_object(&self, request: ObjectRequest<'_>) -> Result<ObjectResponse, LlmError> {
        let response = self.call(request).await?;
        parse_object_response(&response)
    }
}

/// Turns a chat response into an unvalidated JSON object.
fn parse_object_response(response: &ChatResponse) -> Result<ObjectResponse, LlmError> {
    if let Some(refusal) = response.refusal() {
        return Err(LlmError::Refusal(refusal.to_string()));
    }

    let text = response.text().ok_or(LlmError::EmptyContent)?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(text);

    Ok(ObjectResponse {
        object: serde_json::from_str(text)?,
        usage: response.usage,
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
