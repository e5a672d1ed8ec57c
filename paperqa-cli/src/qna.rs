//! Batch question answering from a YAML question set.
//!
//! The input shape is:
//!
//! ```yaml
//! questions:
//!   - id: 1
//!     question: What problem does the paper address?
//!   - id: 2
//!     question: How is the method evaluated?
//! ```
//!
//! Answers are written as a markdown report with one section per question.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use paperqa_loader::SecureFileLoader;

use crate::cli::Strategy;
use crate::pipeline;
use crate::settings::Settings;

/// A YAML question set.
#[derive(Debug, Deserialize)]
pub struct QuestionSet {
    /// The questions to answer, in order.
    #[serde(default)]
    pub questions: Vec<QuestionEntry>,
}

/// One entry of a [`QuestionSet`].
#[derive(Debug, Deserialize)]
pub struct QuestionEntry {
    /// Optional numeric id, echoed into the report headings.
    #[serde(default)]
    pub id: Option<u32>,
    /// The question text.
    #[serde(default)]
    pub question: String,
}

/// One answered question.
#[derive(Debug)]
pub struct QaRecord {
    /// Id copied from the question entry.
    pub id: Option<u32>,
    /// The question as asked.
    pub question: String,
    /// The generated answer (or the designated failure message).
    pub answer: String,
}

/// Render answered questions as a markdown report.
pub fn render_markdown(records: &[QaRecord]) -> String {
    let mut out = String::from("# QnA Results\n\n");
    for record in records {
        match record.id {
            Some(id) => out.push_str(&format!("## Q{id}. {}\n", record.question)),
            None => out.push_str(&format!("## Q. {}\n", record.question)),
        }
        out.push_str(&format!("- **Answer**: {}\n\n", record.answer));
    }
    out
}

/// Run the `qna` subcommand.
///
/// Questions with empty text are skipped with a warning; a provider
/// failure on one question records the designated failure message and
/// continues with the rest.
pub async fn run(
    settings: &Settings,
    questions_file: &str,
    paper: Option<&str>,
    out: &Path,
) -> anyhow::Result<()> {
    let loader = SecureFileLoader::new(&settings.base_dir);
    let set: QuestionSet = loader.load_yaml(questions_file)?;
    if set.questions.is_empty() {
        warn!(file = questions_file, "question set is empty");
        println!("No questions found in {questions_file}.");
        return Ok(());
    }

    let service = match paper {
        Some(paper) => Some(
            pipeline::indexed_service(settings, &loader, paper, Strategy::Recursive, None).await?,
        ),
        None => None,
    };
    let answerer = pipeline::answer_service(settings)?;

    let mut records = Vec::new();
    for entry in &set.questions {
        let question = entry.question.trim();
        if question.is_empty() {
            warn!(id = ?entry.id, "skipping entry with empty question");
            continue;
        }

        let context = match &service {
            Some(service) => {
                let results = service.search_or_empty(question).await;
                results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n")
            }
            None => String::new(),
        };

        let answer = answerer.answer_or_fallback(question, &context).await;
        records.push(QaRecord { id: entry.id, question: question.to_string(), answer });
    }

    std::fs::write(out, render_markdown(&records))?;
    println!("Wrote {} answers to {}", records.len(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_question_set_yaml() {
        let raw = "questions:\n  - id: 1\n    question: What is studied?\n  - question: And how?\n";
        let set: QuestionSet = serde_yaml::from_str(raw).unwrap();
        assert_eq!(set.questions.len(), 2);
        assert_eq!(set.questions[0].id, Some(1));
        assert_eq!(set.questions[1].id, None);
        assert_eq!(set.questions[1].question, "And how?");
    }

    #[test]
    fn renders_report_with_and_without_ids() {
        let records = vec![
            QaRecord { id: Some(1), question: "What?".into(), answer: "This.".into() },
            QaRecord { id: None, question: "Why?".into(), answer: "Because.".into() },
        ];
        let report = render_markdown(&records);
        assert!(report.starts_with("# QnA Results\n\n"));
        assert!(report.contains("## Q1. What?\n- **Answer**: This.\n\n"));
        assert!(report.contains("## Q. Why?\n- **Answer**: Because.\n\n"));
    }
}
