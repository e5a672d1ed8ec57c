//! Interactive question loop over an indexed paper.

use std::path::PathBuf;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use paperqa_loader::SecureFileLoader;

use crate::cli::Strategy;
use crate::pipeline;
use crate::settings::Settings;

/// Normalize a question before retrieval and answering.
fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase()
}

/// Run the `ask` subcommand: index the paper once, then loop reading
/// questions until EOF, interrupt, or `exit`.
pub async fn run(
    settings: &Settings,
    paper: &str,
    strategy: Strategy,
    tokenizer: Option<PathBuf>,
) -> anyhow::Result<()> {
    let loader = SecureFileLoader::new(&settings.base_dir);
    let service = pipeline::indexed_service(settings, &loader, paper, strategy, tokenizer).await?;
    let answerer = pipeline::answer_service(settings)?;

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("question> ") {
            Ok(line) => {
                let question = normalize_question(&line);
                if question.is_empty() {
                    continue;
                }
                if question == "exit" || question == "quit" {
                    break;
                }
                let _ = editor.add_history_entry(line.as_str());

                let results = service.search_or_empty(&question).await;
                if results.is_empty() {
                    println!("No relevant passages found.");
                }
                let context: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
                let answer = answerer.answer_or_fallback(&question, &context.join("\n")).await;
                println!("{answer}\n");
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_lowercases_and_trims() {
        assert_eq!(normalize_question("  What Is RAG?  "), "what is rag?");
        assert_eq!(normalize_question(""), "");
    }
}
