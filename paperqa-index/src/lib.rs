//! # paperqa-index
//!
//! Text splitting, embedding, and in-memory vector search for the paperqa
//! workspace.
//!
//! The crate is organized around three seams:
//!
//! - [`TextSplitter`] — turns a [`Document`] into ordered [`Chunk`]s;
//!   four strategies are provided ([`FixedSizeSplitter`],
//!   [`RecursiveSplitter`], [`TokenSplitter`], [`SemanticSplitter`])
//! - [`EmbeddingProvider`] — turns text into vectors
//! - [`VectorIndex`] — stores the chunks of the most recently indexed
//!   document and answers top-K similarity queries ([`InMemoryIndex`])
//!
//! [`SearchService`] composes the three into the build-once / query-many
//! workflow.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod search;
pub mod splitter;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use document::{Chunk, Document, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{IndexError, Result};
pub use index::{InMemoryIndex, VectorIndex};
pub use search::{SearchService, SearchServiceBuilder};
pub use splitter::{
    FixedSizeSplitter, RecursiveSplitter, SemanticSplitter, TextSplitter, TokenSplitter,
};
