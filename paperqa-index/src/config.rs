//! Configuration for the search service.

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Parameters governing chunking and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Maximum chunk size in characters (or tokens, for the token strategy).
    pub chunk_size: usize,
    /// Overlap between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of top results returned by a search.
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { chunk_size: 250, chunk_overlap: 50, top_k: 5 }
    }
}

impl SearchConfig {
    /// Create a new builder for constructing a [`SearchConfig`].
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

/// Builder for a validated [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Set the maximum chunk size.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of top results returned by a search.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`SearchConfig`], validating parameter consistency.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if `chunk_overlap >= chunk_size` or
    /// `top_k == 0`.
    pub fn build(self) -> Result<SearchConfig> {
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(IndexError::Config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        if self.config.top_k == 0 {
            return Err(IndexError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.chunk_overlap < config.chunk_size);
        assert!(config.top_k > 0);
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        let err = SearchConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, IndexError::Config(_)));
    }

    #[test]
    fn rejects_zero_top_k() {
        let err = SearchConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, IndexError::Config(_)));
    }
}
