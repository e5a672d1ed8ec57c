//! Wiring: build the search and answer services from settings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use paperqa_index::{
    Document, EmbeddingProvider, FixedSizeSplitter, InMemoryIndex, RecursiveSplitter,
    SearchConfig, SearchService, SemanticSplitter, TextSplitter, TokenSplitter,
};
use paperqa_loader::{SecureFileLoader, sanitize_filename};
use paperqa_openai::{AnswerService, OpenAiChat, OpenAiEmbeddings};

use crate::cli::Strategy;
use crate::settings::Settings;

/// Build the OpenAI embedding provider from settings.
pub fn embedding_provider(settings: &Settings) -> anyhow::Result<Arc<dyn EmbeddingProvider>> {
    let mut provider = OpenAiEmbeddings::new(settings.api_key.as_str())?;
    if let Some(model) = &settings.embedding_model {
        provider = provider.with_model(model.as_str());
    }
    Ok(Arc::new(provider))
}

/// Build the splitter for the selected strategy.
pub fn splitter_for(
    strategy: Strategy,
    settings: &Settings,
    tokenizer: Option<&Path>,
    provider: &Arc<dyn EmbeddingProvider>,
) -> anyhow::Result<Arc<dyn TextSplitter>> {
    let splitter: Arc<dyn TextSplitter> = match strategy {
        Strategy::Fixed => {
            Arc::new(FixedSizeSplitter::new(settings.chunk_size, settings.chunk_overlap))
        }
        Strategy::Recursive => {
            Arc::new(RecursiveSplitter::new(settings.chunk_size, settings.chunk_overlap))
        }
        Strategy::Token => {
            let path = tokenizer.context("--tokenizer is required for the token strategy")?;
            Arc::new(TokenSplitter::from_file(path, settings.chunk_size, settings.chunk_overlap)?)
        }
        Strategy::Semantic => Arc::new(SemanticSplitter::new(provider.clone())),
    };
    Ok(splitter)
}

/// Build the answer service from settings.
pub fn answer_service(settings: &Settings) -> anyhow::Result<AnswerService> {
    let mut chat = OpenAiChat::new(settings.api_key.as_str())?;
    if let Some(model) = &settings.chat_model {
        chat = chat.with_model(model.as_str());
    }
    Ok(AnswerService::new(Arc::new(chat)))
}

/// Make `paper` loadable: a bare filename is used as-is, while a path with
/// directory components is copied into the base directory under a
/// sanitized name.
pub fn stage_paper(loader: &SecureFileLoader, paper: &str) -> anyhow::Result<String> {
    let source = Path::new(paper);
    if source.components().count() <= 1 {
        return Ok(paper.to_string());
    }

    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("paper path '{paper}' has no filename"))?;
    let filename = sanitize_filename(name);

    std::fs::create_dir_all(loader.base_dir())
        .with_context(|| format!("cannot create base directory {}", loader.base_dir().display()))?;
    let target = loader.base_dir().join(&filename);
    std::fs::copy(source, &target)
        .with_context(|| format!("cannot copy '{paper}' into {}", target.display()))?;
    info!(from = %paper, to = %target.display(), "staged paper into base directory");

    Ok(filename)
}

/// Load a paper through the secure loader and build its search index.
pub async fn indexed_service(
    settings: &Settings,
    loader: &SecureFileLoader,
    paper: &str,
    strategy: Strategy,
    tokenizer: Option<PathBuf>,
) -> anyhow::Result<SearchService> {
    let filename = stage_paper(loader, paper)?;
    let text = loader.load_pdf_text(&filename)?;

    let mut document = Document::new(filename.clone(), text);
    document.metadata = HashMap::from([("filename".to_string(), filename.clone())]);
    document.source_path = Some(loader.base_dir().join(&filename));

    let provider = embedding_provider(settings)?;
    let splitter = splitter_for(strategy, settings, tokenizer.as_deref(), &provider)?;
    let config = SearchConfig::builder()
        .chunk_size(settings.chunk_size)
        .chunk_overlap(settings.chunk_overlap)
        .top_k(settings.top_k)
        .build()?;

    let service = SearchService::builder()
        .config(config)
        .splitter(splitter)
        .embedding_provider(provider)
        .index(Arc::new(InMemoryIndex::new()))
        .build()?;

    let chunks = service.build_index(&document).await?;
    println!("Indexed {} chunks from {filename}", chunks.len());

    Ok(service)
}
