//! Chat completion model trait and the OpenAI client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embeddings::{DEFAULT_BASE_URL, ErrorResponse};
use crate::error::{ProviderError, Result};

/// A model that completes a prompt in one blocking call.
///
/// Each call is stateless: no conversation memory is kept between calls,
/// so any context must be supplied with every request. Implementations do
/// not retry and do not stream.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for a system instruction and a user prompt.
    ///
    /// Returns the trimmed response text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// The model identifier, for logging.
    fn name(&self) -> &str;
}

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default completion length cap.
const DEFAULT_MAX_TOKENS: u32 = 500;

/// A [`CompletionModel`] backed by the OpenAI chat completions endpoint.
///
/// Non-streaming, single attempt, no retry. Defaults: `gpt-4o-mini`,
/// temperature 0.3, max 500 completion tokens.
///
/// # Example
///
/// ```rust,ignore
/// use paperqa_openai::{CompletionModel, OpenAiChat};
///
/// let model = OpenAiChat::from_env()?;
/// let text = model.complete("You are concise.", "Summarize RAG.").await?;
/// ```
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChat {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::InvalidConfig("API key must not be empty".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Create a new client from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ProviderError::MissingApiKey)?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gpt-4o`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion length cap in tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the API base URL (for proxies and compatible servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl CompletionModel for OpenAiChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let endpoint = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, prompt_len = user.len(), "requesting completion");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %endpoint, error = %e, "completion request failed");
                ProviderError::Request { endpoint: endpoint.clone(), message: e.to_string() }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(status, "chat completions API error");
            return Err(ProviderError::Api { status, message });
        }

        let decoded: ChatResponse =
            response.json().await.map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = decoded
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))?;

        Ok(content.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        assert!(matches!(OpenAiChat::new(""), Err(ProviderError::InvalidConfig(_))));
    }

    #[test]
    fn decodes_chat_response() {
        let raw = r#"{
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  The answer.  "}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3}
        }"#;
        let decoded: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.choices[0].message.content.as_deref(), Some("  The answer.  "));
    }

    #[test]
    fn serializes_request_shape() {
        let body = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage { role: "user", content: "hi" }],
            temperature: 0.3,
            max_tokens: 500,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 500);
    }
}
