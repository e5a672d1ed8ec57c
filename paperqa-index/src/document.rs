//! Data types for documents, chunks, and search results.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A source document with its extracted text.
///
/// Documents are transient: they exist long enough to be split and indexed,
/// after which only their chunks live on in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier for the document (typically the sanitized filename).
    pub id: String,
    /// The full extracted text.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
    /// Path of the file the text was extracted from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl Document {
    /// Create a document with the given id and text and no metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new(), source_path: None }
    }
}

/// A span of document text used as a retrieval unit.
///
/// Chunks have no identity beyond their position: `id` is derived as
/// `{document_id}_{index}`, and `index` reflects document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Identifier derived from the parent document id and the chunk index.
    pub id: String,
    /// Zero-based position of this chunk within the document.
    pub index: usize,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text (empty until embedded).
    pub embedding: Vec<f32>,
    /// The id of the parent [`Document`].
    pub document_id: String,
}

impl Chunk {
    /// Create an unembedded chunk at `index` within `document`.
    pub(crate) fn new(document: &Document, index: usize, text: String) -> Self {
        Self {
            id: format!("{}_{index}", document.id),
            index,
            text,
            embedding: Vec::new(),
            document_id: document.id.clone(),
        }
    }
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}
