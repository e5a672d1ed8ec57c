//! Error types for the `paperqa-index` crate.

use thiserror::Error;

/// Errors that can occur while splitting, embedding, or searching.
#[derive(Debug, Error)]
pub enum IndexError {
    /// An error occurred during embedding generation.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector index backend.
    #[error("vector index error ({backend}): {message}")]
    Index {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred while splitting text into chunks.
    #[error("splitter error: {0}")]
    Splitter(String),

    /// A configuration validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An error in the search service orchestration.
    #[error("search service error: {0}")]
    Service(String),
}

/// A convenience result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
