//! Vector index trait and the in-memory cosine-similarity index.

use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, ScoredChunk};
use crate::error::Result;

/// A nearest-neighbor index over the chunks of one document.
///
/// The index holds embeddings for exactly the chunks of the most recently
/// indexed document: [`replace`](VectorIndex::replace) swaps the whole
/// chunk set, so stale entries from a prior document cannot survive a
/// rebuild.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Replace the indexed chunk set. Chunks must have embeddings attached.
    async fn replace(&self, chunks: Vec<Chunk>) -> Result<()>;

    /// Return the `top_k` chunks most similar to `embedding`, ordered by
    /// descending score. Never returns more than `top_k` results.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Number of chunks currently indexed.
    async fn len(&self) -> usize;

    /// Whether the index holds no chunks.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// An in-memory [`VectorIndex`] scoring by cosine similarity.
///
/// Chunks live in a `Vec` behind a `tokio::sync::RwLock`. Sized for the
/// single-document, per-session workload: a rebuild is a whole-set swap,
/// and a search is a linear scan.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    chunks: RwLock<Vec<Chunk>>,
}

impl InMemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn replace(&self, chunks: Vec<Chunk>) -> Result<()> {
        let mut guard = self.chunks.write().await;
        *guard = chunks;
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredChunk>> {
        let chunks = self.chunks.read().await;

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(&chunk.embedding, embedding),
                chunk: chunk.clone(),
            })
            .collect();

        // Descending score; equal scores order by ascending chunk index so
        // results are deterministic.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.chunk.index.cmp(&b.chunk.index))
        });
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn len(&self) -> usize {
        self.chunks.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.6f32, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
