//! Text splitting strategies.
//!
//! This module provides the [`TextSplitter`] trait and four implementations:
//!
//! - [`FixedSizeSplitter`] — character windows with configurable overlap
//! - [`RecursiveSplitter`] — hierarchical splitting on a priority list of
//!   separators (paragraphs, sentences, words)
//! - [`TokenSplitter`] — token-count windows driven by a `tokenizers` model
//! - [`SemanticSplitter`] — sentence grouping at embedding-similarity
//!   breakpoints
//!
//! All strategies are pure functions of the input text: the same document
//! always produces the same chunks, in document order.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokenizers::Tokenizer;

use crate::document::{Chunk, Document};
use crate::embedding::EmbeddingProvider;
use crate::error::{IndexError, Result};
use crate::index::cosine_similarity;

/// A strategy for splitting a document into chunks.
///
/// Implementations produce [`Chunk`]s with text and position but no
/// embeddings; embeddings are attached later by the search service. The
/// trait is async because the semantic strategy calls an
/// [`EmbeddingProvider`] while splitting.
#[async_trait]
pub trait TextSplitter: Send + Sync {
    /// Split a document into chunks, preserving document order.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    async fn split(&self, document: &Document) -> Result<Vec<Chunk>>;
}

/// Character-based windows over `text`, safe on UTF-8 boundaries.
///
/// `chunk_size` and `chunk_overlap` are in characters, not bytes.
fn char_windows(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    bounds.push(text.len());
    let char_len = bounds.len() - 1;

    let mut windows = Vec::new();
    let mut start = 0;
    while start < char_len {
        let end = (start + chunk_size).min(char_len);
        windows.push(text[bounds[start]..bounds[end]].to_string());
        let step = chunk_size.saturating_sub(chunk_overlap);
        if step == 0 {
            break;
        }
        start += step;
    }
    windows
}

/// Split `text` at `separator`, keeping the separator attached to the
/// preceding segment so that concatenating the segments reproduces the
/// input exactly.
fn split_with_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut segments = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        segments.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }
    segments
}

/// Split by the first separator, then merge segments into chunks that
/// respect `chunk_size`. Oversized segments are split further with the
/// remaining separators, falling back to character windows.
fn merge_segments(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if text.len() <= chunk_size || separators.is_empty() {
        return char_windows(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let remaining = &separators[1..];
    let segments = split_with_separator(text, separator);

    let mut chunks = Vec::new();
    let mut current = String::new();

    let flush = |chunks: &mut Vec<String>, current: String| {
        if current.len() > chunk_size {
            chunks.extend(merge_segments(&current, chunk_size, chunk_overlap, remaining));
        } else {
            chunks.push(current);
        }
    };

    for segment in segments {
        if current.is_empty() {
            current = segment.to_string();
        } else if current.len() + segment.len() <= chunk_size {
            current.push_str(segment);
        } else {
            flush(&mut chunks, std::mem::take(&mut current));
            current = segment.to_string();
        }
    }
    if !current.is_empty() {
        flush(&mut chunks, current);
    }

    chunks
}

/// Splits text into fixed-size character windows with overlap.
///
/// # Example
///
/// ```rust,ignore
/// use paperqa_index::FixedSizeSplitter;
///
/// let splitter = FixedSizeSplitter::new(250, 50);
/// let chunks = splitter.split(&document).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeSplitter {
    /// Create a splitter producing windows of at most `chunk_size`
    /// characters, with `chunk_overlap` characters shared between
    /// consecutive windows.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

#[async_trait]
impl TextSplitter for FixedSizeSplitter {
    async fn split(&self, document: &Document) -> Result<Vec<Chunk>> {
        Ok(char_windows(&document.text, self.chunk_size, self.chunk_overlap)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(document, i, text))
            .collect())
    }
}

/// Separator priority for recursive splitting: paragraphs, then sentence
/// boundaries, then words.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

/// Splits text hierarchically on natural boundaries.
///
/// Paragraphs are preferred; a paragraph exceeding `chunk_size` is split
/// at sentence boundaries, then at word boundaries, and only as a last
/// resort at character windows. Separators stay attached to the preceding
/// segment, so the chunks partition the input text exactly.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveSplitter {
    /// Create a splitter with the given size and overlap in characters.
    ///
    /// Overlap only applies at the character-window fallback level; at the
    /// separator levels the chunks partition the text.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

#[async_trait]
impl TextSplitter for RecursiveSplitter {
    async fn split(&self, document: &Document) -> Result<Vec<Chunk>> {
        if document.text.is_empty() {
            return Ok(Vec::new());
        }

        Ok(merge_segments(&document.text, self.chunk_size, self.chunk_overlap, &SEPARATORS)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(document, i, text))
            .collect())
    }
}

/// Splits text into token-count windows.
///
/// Tokenization is delegated to a [`tokenizers::Tokenizer`]; windows are
/// mapped back to byte ranges of the source text via the encoder offsets,
/// so every chunk is a substring of the input. Each window extends to the
/// start of the next window's first token, which keeps inter-token
/// whitespace covered.
pub struct TokenSplitter {
    tokenizer: Tokenizer,
    max_tokens: usize,
    overlap_tokens: usize,
}

impl TokenSplitter {
    /// Create a splitter producing windows of at most `max_tokens` tokens,
    /// with `overlap_tokens` tokens shared between consecutive windows.
    pub fn new(tokenizer: Tokenizer, max_tokens: usize, overlap_tokens: usize) -> Self {
        Self { tokenizer, max_tokens, overlap_tokens }
    }

    /// Load the tokenizer from a `tokenizer.json` file.
    pub fn from_file(
        path: impl AsRef<Path>,
        max_tokens: usize,
        overlap_tokens: usize,
    ) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path.as_ref()).map_err(|e| {
            IndexError::Splitter(format!(
                "failed to load tokenizer from {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(Self::new(tokenizer, max_tokens, overlap_tokens))
    }
}

#[async_trait]
impl TextSplitter for TokenSplitter {
    async fn split(&self, document: &Document) -> Result<Vec<Chunk>> {
        if document.text.is_empty() {
            return Ok(Vec::new());
        }

        let encoding = self
            .tokenizer
            .encode(document.text.as_str(), false)
            .map_err(|e| IndexError::Splitter(format!("tokenization failed: {e}")))?;
        let offsets = encoding.get_offsets();
        if offsets.is_empty() {
            return Ok(Vec::new());
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        let mut index = 0;
        while start < offsets.len() {
            let end = (start + self.max_tokens).min(offsets.len());
            let byte_start = if start == 0 { 0 } else { offsets[start].0 };
            let byte_end =
                if end == offsets.len() { document.text.len() } else { offsets[end].0 };

            chunks.push(Chunk::new(document, index, document.text[byte_start..byte_end].to_string()));
            index += 1;

            let step = self.max_tokens.saturating_sub(self.overlap_tokens);
            if step == 0 {
                break;
            }
            start += step;
        }

        Ok(chunks)
    }
}

/// Split `text` into sentences, keeping terminal punctuation and trailing
/// whitespace attached so the sentences partition the input exactly.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut after_terminal = false;
    let mut boundary = false;

    for (i, c) in text.char_indices() {
        if boundary && !c.is_whitespace() {
            sentences.push(&text[start..i]);
            start = i;
            boundary = false;
        }
        if c.is_whitespace() {
            if after_terminal {
                boundary = true;
            }
        } else {
            after_terminal = matches!(c, '.' | '!' | '?');
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Nearest-rank percentile of `values` (not interpolated).
fn percentile(values: &[f32], pct: f64) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let rank = ((pct / 100.0) * (sorted.len() as f64 - 1.0)).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Groups sentences into chunks at embedding-similarity breakpoints.
///
/// Every sentence is embedded; the cosine distance between consecutive
/// sentences is computed, and a chunk boundary is placed wherever the
/// distance exceeds the configured percentile of all distances. Topically
/// coherent runs of sentences therefore stay in one chunk.
pub struct SemanticSplitter {
    provider: Arc<dyn EmbeddingProvider>,
    breakpoint_percentile: f64,
}

impl SemanticSplitter {
    /// Default breakpoint percentile, matching the common "95th percentile
    /// of consecutive-sentence distances" heuristic.
    const DEFAULT_PERCENTILE: f64 = 95.0;

    /// Create a splitter backed by `provider`.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider, breakpoint_percentile: Self::DEFAULT_PERCENTILE }
    }

    /// Set the breakpoint percentile (0–100). Lower values produce more,
    /// smaller chunks.
    pub fn with_breakpoint_percentile(mut self, percentile: f64) -> Self {
        self.breakpoint_percentile = percentile;
        self
    }
}

#[async_trait]
impl TextSplitter for SemanticSplitter {
    async fn split(&self, document: &Document) -> Result<Vec<Chunk>> {
        if document.text.is_empty() {
            return Ok(Vec::new());
        }

        let sentences = split_sentences(&document.text);
        if sentences.len() <= 1 {
            return Ok(vec![Chunk::new(document, 0, document.text.clone())]);
        }

        let embeddings = self.provider.embed_batch(&sentences).await?;
        if embeddings.len() != sentences.len() {
            return Err(IndexError::Splitter(format!(
                "provider returned {} embeddings for {} sentences",
                embeddings.len(),
                sentences.len()
            )));
        }

        let distances: Vec<f32> = embeddings
            .windows(2)
            .map(|pair| 1.0 - cosine_similarity(&pair[0], &pair[1]))
            .collect();
        let threshold = percentile(&distances, self.breakpoint_percentile);

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut index = 0;
        for (i, sentence) in sentences.iter().enumerate() {
            current.push_str(sentence);
            if i < distances.len() && distances[i] > threshold {
                chunks.push(Chunk::new(document, index, std::mem::take(&mut current)));
                index += 1;
            }
        }
        if !current.is_empty() {
            chunks.push(Chunk::new(document, index, current));
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokenizers::models::wordlevel::WordLevel;
    use tokenizers::pre_tokenizers::PreTokenizerWrapper;
    use tokenizers::pre_tokenizers::whitespace::Whitespace;

    use super::*;

    fn doc(text: &str) -> Document {
        Document::new("paper", text)
    }

    /// Strip `overlap` characters from the front of every chunk after the
    /// first, then concatenate.
    fn reassemble(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                out.extend(chunk.text.chars().skip(overlap));
            }
        }
        out
    }

    #[tokio::test]
    async fn fixed_splitter_reconstructs_without_overlap() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let chunks = FixedSizeSplitter::new(10, 0).split(&doc(text)).await.unwrap();
        assert_eq!(reassemble(&chunks, 0), text);
        assert!(chunks.iter().all(|c| c.text.chars().count() <= 10));
    }

    #[tokio::test]
    async fn fixed_splitter_reconstructs_with_overlap() {
        let text = "the quick brown fox jumps over the lazy dog";
        let chunks = FixedSizeSplitter::new(12, 4).split(&doc(text)).await.unwrap();
        assert!(chunks.len() > 1);
        assert_eq!(reassemble(&chunks, 4), text);
    }

    #[tokio::test]
    async fn fixed_splitter_is_char_boundary_safe() {
        let text = "딥러닝 모델은 문서를 청크 단위로 나눈다";
        let chunks = FixedSizeSplitter::new(5, 2).split(&doc(text)).await.unwrap();
        assert!(!chunks.is_empty());
        assert_eq!(reassemble(&chunks, 2), text);
    }

    #[tokio::test]
    async fn fixed_splitter_empty_text_yields_no_chunks() {
        let chunks = FixedSizeSplitter::new(10, 2).split(&doc("")).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn chunk_ids_follow_document_order() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = FixedSizeSplitter::new(8, 0).split(&doc(text)).await.unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.id, format!("paper_{i}"));
            assert!(chunk.embedding.is_empty());
        }
    }

    #[tokio::test]
    async fn recursive_splitter_partitions_exactly() {
        let text = "First paragraph about retrieval. It has two sentences.\n\n\
                    Second paragraph here! Short words only. And a question? Yes.";
        let chunks = RecursiveSplitter::new(40, 0).split(&doc(text)).await.unwrap();
        assert!(chunks.len() > 1);
        let concatenated: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(concatenated, text);
    }

    #[tokio::test]
    async fn recursive_splitter_prefers_paragraph_boundaries() {
        let text = "Alpha beta gamma.\n\nDelta epsilon zeta.";
        let chunks = RecursiveSplitter::new(25, 0).split(&doc(text)).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "Alpha beta gamma.\n\n");
        assert_eq!(chunks[1].text, "Delta epsilon zeta.");
    }

    fn unk_tokenizer() -> Tokenizer {
        let vocab: HashMap<String, u32> = HashMap::from([("<unk>".to_string(), 0)]);
        let model = WordLevel::builder().vocab(vocab).unk_token("<unk>".to_string()).build().unwrap();
        let mut tokenizer = Tokenizer::new(model);
        tokenizer.with_pre_tokenizer(PreTokenizerWrapper::Whitespace(Whitespace {}));
        tokenizer
    }

    #[tokio::test]
    async fn token_splitter_windows_by_token_count() {
        let text = "one two three four five six seven";
        let splitter = TokenSplitter::new(unk_tokenizer(), 3, 0);
        let chunks = splitter.split(&doc(text)).await.unwrap();
        assert_eq!(chunks.len(), 3);
        let concatenated: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(concatenated, text);
        assert!(chunks.iter().all(|c| text.contains(c.text.trim_end())));
    }

    #[tokio::test]
    async fn token_splitter_overlap_repeats_tokens() {
        let text = "a b c d e f";
        let splitter = TokenSplitter::new(unk_tokenizer(), 4, 2);
        let chunks = splitter.split(&doc(text)).await.unwrap();
        assert!(chunks.len() > 1);
        // The second window starts two tokens back from the end of the first.
        assert!(chunks[1].text.starts_with("c"));
    }

    struct TopicEmbedder;

    #[async_trait]
    impl EmbeddingProvider for TopicEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            // Two orthogonal topics, keyed by content.
            if text.contains("cat") { Ok(vec![1.0, 0.0]) } else { Ok(vec![0.0, 1.0]) }
        }

        fn dimensions(&self) -> usize {
            2
        }
    }

    #[tokio::test]
    async fn semantic_splitter_breaks_at_topic_shift() {
        let text = "The cat purrs. The cat naps. Rust compiles fast. Rust checks borrows.";
        let splitter =
            SemanticSplitter::new(Arc::new(TopicEmbedder)).with_breakpoint_percentile(50.0);
        let chunks = splitter.split(&doc(text)).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.contains("cat purrs"));
        assert!(chunks[1].text.starts_with("Rust"));
        let concatenated: String = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(concatenated, text);
    }

    #[tokio::test]
    async fn semantic_splitter_single_sentence_is_one_chunk() {
        let text = "Only one sentence here";
        let splitter = SemanticSplitter::new(Arc::new(TopicEmbedder));
        let chunks = splitter.split(&doc(text)).await.unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);
    }

    #[test]
    fn sentences_partition_text() {
        let text = "First one. Second, with 3.14 inside! Third? Trailing";
        let sentences = split_sentences(text);
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences.concat(), text);
        assert_eq!(sentences[1], "Second, with 3.14 inside! ");
    }
}
