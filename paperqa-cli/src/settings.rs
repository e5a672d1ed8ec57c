//! Environment-driven application settings.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

/// Runtime settings, read from the environment.
///
/// | Variable | Default |
/// |----------|---------|
/// | `OPENAI_API_KEY` | required |
/// | `PAPERQA_BASE_DIR` | `data` |
/// | `PAPERQA_EMBEDDING_MODEL` | provider default |
/// | `PAPERQA_CHAT_MODEL` | provider default |
/// | `PAPERQA_CHUNK_SIZE` | `250` |
/// | `PAPERQA_CHUNK_OVERLAP` | `50` |
/// | `PAPERQA_TOP_K` | `5` |
///
/// Log verbosity is controlled separately via `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct Settings {
    /// OpenAI API key.
    pub api_key: String,
    /// Directory papers and question sets are loaded from.
    pub base_dir: PathBuf,
    /// Embedding model override.
    pub embedding_model: Option<String>,
    /// Chat model override.
    pub chat_model: Option<String>,
    /// Maximum chunk size.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

fn env_or<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().with_context(|| format!("invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Settings {
    /// Read settings from the environment.
    ///
    /// Fails when `OPENAI_API_KEY` is unset or a numeric override does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            base_dir: PathBuf::from(
                std::env::var("PAPERQA_BASE_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            embedding_model: std::env::var("PAPERQA_EMBEDDING_MODEL").ok(),
            chat_model: std::env::var("PAPERQA_CHAT_MODEL").ok(),
            chunk_size: env_or("PAPERQA_CHUNK_SIZE", 250)?,
            chunk_overlap: env_or("PAPERQA_CHUNK_OVERLAP", 50)?,
            top_k: env_or("PAPERQA_TOP_K", 5)?,
        })
    }
}
