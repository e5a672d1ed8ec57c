//! Error types for the `paperqa-openai` crate.

use thiserror::Error;

/// Errors from the OpenAI-backed providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The `OPENAI_API_KEY` environment variable is not set.
    #[error("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,

    /// A configuration value failed validation.
    #[error("invalid provider configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request did not complete (network failure, timeout).
    #[error("request to {endpoint} failed: {message}")]
    Request {
        /// The endpoint that was called.
        endpoint: String,
        /// A description of the failure.
        message: String,
    },

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The error message decoded from the response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse provider response: {0}")]
    Parse(String),
}

/// A convenience result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
