//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Ask questions about a research paper from your terminal.
#[derive(Debug, Parser)]
#[command(name = "paperqa", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index a paper and answer questions interactively.
    Ask {
        /// PDF to load: a filename inside the base directory, or a path
        /// that will be copied in under a sanitized name.
        paper: String,

        /// Text splitting strategy.
        #[arg(long, value_enum, default_value = "recursive")]
        strategy: Strategy,

        /// Tokenizer file (`tokenizer.json`), required for `--strategy token`.
        #[arg(long)]
        tokenizer: Option<PathBuf>,
    },

    /// Answer a YAML question set and write a markdown report.
    Qna {
        /// Question set filename inside the base directory.
        questions: String,

        /// Paper to retrieve context from; without it, questions are
        /// answered from the model alone.
        #[arg(long)]
        paper: Option<String>,

        /// Output path for the markdown report.
        #[arg(long, default_value = "QnA.markdown")]
        out: PathBuf,
    },
}

/// Text splitting strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Fixed-size character windows.
    Fixed,
    /// Hierarchical splitting on paragraph/sentence/word boundaries.
    Recursive,
    /// Token-count windows (requires `--tokenizer`).
    Token,
    /// Embedding-similarity breakpoints.
    Semantic,
}
