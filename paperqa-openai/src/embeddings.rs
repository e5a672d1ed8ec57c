//! OpenAI embedding provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use paperqa_index::{EmbeddingProvider, IndexError};

use crate::error::{ProviderError, Result};

/// The default base URL for the OpenAI API.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default embedding model.
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings endpoint.
///
/// # Configuration
///
/// - `model` — defaults to `text-embedding-3-small`
/// - `dimensions` — optional Matryoshka dimension override
/// - `api_key` — from the constructor or the `OPENAI_API_KEY` environment
///   variable
///
/// # Example
///
/// ```rust,ignore
/// use paperqa_openai::OpenAiEmbeddings;
///
/// let provider = OpenAiEmbeddings::from_env()?;
/// let embedding = provider.embed("hello world").await?;
/// ```
#[derive(Debug)]
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for Matryoshka dimension truncation.
    request_dimensions: Option<usize>,
}

impl OpenAiEmbeddings {
    /// Create a new provider with the given API key.
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
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Create a new provider from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ProviderError::MissingApiKey)?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensions (Matryoshka truncation).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    /// Override the API base URL (for proxies and compatible servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn request_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let endpoint = format!("{}/embeddings", self.base_url);
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts.to_vec(),
            dimensions: self.request_dimensions,
        };

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %endpoint, error = %e, "embedding request failed");
                ProviderError::Request { endpoint: endpoint.clone(), message: e.to_string() }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(status, "embeddings API error");
            return Err(ProviderError::Api { status, message });
        }

        let decoded: EmbeddingResponse =
            response.json().await.map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(decoded.data.into_iter().map(|d| d.embedding).collect())
    }
}

fn embedding_error(e: ProviderError) -> IndexError {
    IndexError::Embedding { provider: "OpenAI".to_string(), message: e.to_string() }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> paperqa_index::Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| {
            embedding_error(ProviderError::Parse("API returned no embeddings".to_string()))
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> paperqa_index::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");
        self.request_embeddings(texts).await.map_err(embedding_error)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorDetail,
}

#[derive(Deserialize)]
pub(crate) struct ErrorDetail {
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let err = OpenAiEmbeddings::new("").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidConfig(_)));
    }

    #[test]
    fn decodes_embedding_response() {
        let raw = r#"{"data":[{"embedding":[0.1,0.2]},{"embedding":[0.3,0.4]}]}"#;
        let decoded: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.data.len(), 2);
        assert_eq!(decoded.data[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn decodes_error_response() {
        let raw = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let decoded: ErrorResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(decoded.error.message, "Incorrect API key provided");
    }

    #[test]
    fn dimensions_follow_matryoshka_override() {
        let provider = OpenAiEmbeddings::new("sk-test").unwrap().with_dimensions(256);
        assert_eq!(provider.dimensions(), 256);
    }
}
