//! The search service: build an index from one document, query it.
//!
//! [`SearchService`] composes a [`TextSplitter`], an [`EmbeddingProvider`],
//! and a [`VectorIndex`] into the split → embed → index → search workflow.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use paperqa_index::{FixedSizeSplitter, InMemoryIndex, SearchConfig, SearchService};
//!
//! let service = SearchService::builder()
//!     .config(SearchConfig::default())
//!     .splitter(Arc::new(FixedSizeSplitter::new(250, 50)))
//!     .embedding_provider(Arc::new(my_embedder))
//!     .index(Arc::new(InMemoryIndex::new()))
//!     .build()?;
//!
//! service.build_index(&document).await?;
//! let results = service.search("what is the main contribution?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::SearchConfig;
use crate::document::{Chunk, Document, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{IndexError, Result};
use crate::index::VectorIndex;
use crate::splitter::TextSplitter;

/// Retrieval over the chunks of the most recently indexed document.
///
/// The index build is one-shot and expensive (one embedding call per
/// chunk); it stays cached in process memory until the next
/// [`build_index`](SearchService::build_index) call, which discards it
/// wholesale. Construct via [`SearchService::builder()`].
pub struct SearchService {
    config: SearchConfig,
    splitter: Arc<dyn TextSplitter>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl SearchService {
    /// Create a new [`SearchServiceBuilder`].
    pub fn builder() -> SearchServiceBuilder {
        SearchServiceBuilder::default()
    }

    /// Return a reference to the service configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return a reference to the vector index.
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Build the index for `document`: split → embed → store.
    ///
    /// Any previously indexed chunks are discarded, even when `document`
    /// has no text — the index always reflects exactly the most recent
    /// build. Returns the chunks that were stored, embeddings attached.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Service`] if splitting, embedding, or storage
    /// fails, naming the document id in the message.
    pub async fn build_index(&self, document: &Document) -> Result<Vec<Chunk>> {
        let mut chunks = self.splitter.split(document).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "splitting failed");
            IndexError::Service(format!("splitting failed for document '{}': {e}", document.id))
        })?;

        if chunks.is_empty() {
            self.index.replace(Vec::new()).await?;
            info!(document.id = %document.id, chunk_count = 0, "indexed document (no text)");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during indexing");
            IndexError::Service(format!("embedding failed for document '{}': {e}", document.id))
        })?;
        if embeddings.len() != chunks.len() {
            return Err(IndexError::Service(format!(
                "provider returned {} embeddings for {} chunks of document '{}'",
                embeddings.len(),
                chunks.len(),
                document.id
            )));
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.index.replace(chunks.clone()).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "index replace failed");
            IndexError::Service(format!("indexing failed for document '{}': {e}", document.id))
        })?;

        info!(document.id = %document.id, chunk_count = chunks.len(), "indexed document");
        Ok(chunks)
    }

    /// Search the index: embed the query, return the top-K chunks.
    ///
    /// Results are ordered by descending similarity; never more than
    /// `top_k`, and only chunks from the indexed set.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Service`] if embedding or search fails.
    pub async fn search(&self, query: &str) -> Result<Vec<ScoredChunk>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            IndexError::Service(format!("query embedding failed: {e}"))
        })?;

        let results = self.index.search(&query_embedding, self.config.top_k).await.map_err(|e| {
            error!(error = %e, "vector index search failed");
            IndexError::Service(format!("search failed: {e}"))
        })?;

        info!(result_count = results.len(), "search completed");
        Ok(results)
    }

    /// Like [`search`](Self::search), but failures degrade to an empty
    /// result set after logging, so an interactive flow keeps going.
    pub async fn search_or_empty(&self, query: &str) -> Vec<ScoredChunk> {
        match self.search(query).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "search failed, returning no results");
                Vec::new()
            }
        }
    }
}

/// Builder for constructing a [`SearchService`].
///
/// All fields are required; [`build()`](SearchServiceBuilder::build)
/// validates and produces the service.
#[derive(Default)]
pub struct SearchServiceBuilder {
    config: Option<SearchConfig>,
    splitter: Option<Arc<dyn TextSplitter>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl SearchServiceBuilder {
    /// Set the service configuration.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the text splitting strategy.
    pub fn splitter(mut self, splitter: Arc<dyn TextSplitter>) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`SearchService`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Config`] if any required field is missing.
    pub fn build(self) -> Result<SearchService> {
        let config =
            self.config.ok_or_else(|| IndexError::Config("config is required".to_string()))?;
        let splitter =
            self.splitter.ok_or_else(|| IndexError::Config("splitter is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| IndexError::Config("embedding_provider is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| IndexError::Config("index is required".to_string()))?;

        Ok(SearchService { config, splitter, embedding_provider, index })
    }
}
