use clap::Parser;
use tracing_subscriber::EnvFilter;

use paperqa_cli::{Cli, Command, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Ask { paper, strategy, tokenizer } => {
            paperqa_cli::ask::run(&settings, &paper, strategy, tokenizer).await
        }
        Command::Qna { questions, paper, out } => {
            paperqa_cli::qna::run(&settings, &questions, paper.as_deref(), &out).await
        }
    }
}
