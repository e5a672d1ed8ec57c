//! # paperqa-cli
//!
//! Command-line interface for the paperqa workspace. Two subcommands:
//!
//! - `paperqa ask <paper.pdf>` — index a paper once, then answer
//!   questions interactively
//! - `paperqa qna <questions.yaml>` — answer a YAML question set and
//!   write a markdown report
//!
//! Settings come from the environment (see [`Settings`]); a `.env` file is
//! honored, and `RUST_LOG` controls log verbosity.

pub mod ask;
pub mod cli;
pub mod pipeline;
pub mod qna;
pub mod settings;

pub use cli::{Cli, Command, Strategy};
pub use settings::Settings;
