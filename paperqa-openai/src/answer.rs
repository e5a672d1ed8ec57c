//! Answer generation from retrieved paper context.

use std::sync::Arc;

use tracing::{error, info};

use crate::chat::CompletionModel;
use crate::error::Result;

/// The designated reply when the completion provider fails.
pub const ANSWER_FAILURE_MESSAGE: &str = "Error generating response.";

/// System instructions sent with every question.
const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions about a research paper. \
     Base your answers only on the provided paper content.";

/// Answers questions by pairing retrieved paper context with one
/// completion call.
///
/// Each call is independent: the service keeps no conversation memory, so
/// the caller re-supplies context on every question.
pub struct AnswerService {
    model: Arc<dyn CompletionModel>,
}

impl AnswerService {
    /// Create a service backed by the given completion model.
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Assemble the single prompt sent to the model.
    fn prompt(question: &str, context: &str) -> String {
        format!(
            "Answer the question based on the following paper content.\n\n\
             Paper content:\n{context}\n\n\
             Question: {question}\n\
             Answer:"
        )
    }

    /// Ask one question against the given context.
    ///
    /// Formats a single prompt (system instructions + context + question)
    /// and calls the completion model once — no retry, no streaming.
    /// Returns the trimmed response text.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure unchanged.
    pub async fn answer(&self, question: &str, context: &str) -> Result<String> {
        let answer = self.model.complete(SYSTEM_PROMPT, &Self::prompt(question, context)).await?;
        info!(model = self.model.name(), answer_len = answer.len(), "generated answer");
        Ok(answer.trim().to_string())
    }

    /// Like [`answer`](Self::answer), but a provider failure degrades to
    /// [`ANSWER_FAILURE_MESSAGE`] after logging, so an interactive flow
    /// keeps going.
    pub async fn answer_or_fallback(&self, question: &str, context: &str) -> String {
        match self.answer(question, context).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "answer generation failed");
                ANSWER_FAILURE_MESSAGE.to_string()
            }
        }
    }
}
