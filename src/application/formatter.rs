//! Natural-language rendering of downstream payloads.
//!
//! A presentation step, not a correctness-critical one: if the backend call
//! fails, the dispatcher's raw string (which already carries any failure
//! diagnostic) is returned verbatim instead of retried.

use std::sync::Arc;

use tracing::warn;

use crate::domain::Intent;
use crate::ports::{ChatRole, CompletionRequest, LlmProvider};

const FORMATTER_PROMPT: &str = "You are a strict response formatter for an IRCTC train assistant.\n\
Use ONLY the data present in the JSON.\n\
Do NOT invent or assume any values.\n\
Produce a short, clear answer.";

/// Converts a raw downstream result into user-facing text.
pub struct ResponseFormatter {
    llm: Arc<dyn LlmProvider>,
}

impl ResponseFormatter {
    /// Creates a formatter backed by the given provider.
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Render `raw_result` for the user. Best-effort: falls back to the raw
    /// string on backend failure.
    pub async fn format(&self, intent: Intent, raw_result: &str) -> String {
        let request = CompletionRequest::new()
            .with_system_prompt(FORMATTER_PROMPT)
            .with_message(
                ChatRole::User,
                format!("question intent:\n{intent}\n\nAPI JSON:\n{raw_result}"),
            );

        match self.llm.complete(request).await {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!(%intent, error = %err, "response formatting failed, returning raw result");
                raw_result.to_string()
            }
        }
    }
}
