//! Schema-driven parameter extraction.
//!
//! One backend call per message, instructed to return a JSON object with
//! exactly the intent's slot keys and `null` for anything absent. The result
//! is filtered down to slots the model was confident about; a corrupt parse
//! yields an empty map, never a partial one.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::{schema_for, Intent, SlotSchema, SlotValues};
use crate::ports::{ChatRole, CompletionRequest, LlmProvider};

use super::llm_output;

/// Extracts slot values from a single user message.
pub struct ParamExtractor {
    llm: Arc<dyn LlmProvider>,
}

impl ParamExtractor {
    /// Creates an extractor backed by the given provider.
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Extract whatever slot values of `intent` appear in `message`.
    ///
    /// The returned map contains only schema slots with resolved values;
    /// it may be empty and never contains `null`-ish entries.
    pub async fn extract(&self, intent: Intent, message: &str) -> SlotValues {
        let schema = schema_for(intent);
        let request = CompletionRequest::new()
            .with_system_prompt(extraction_prompt(intent, schema))
            .with_message(ChatRole::User, message);

        let raw = match self.llm.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(%intent, error = %err, "extraction backend call failed");
                return SlotValues::new();
            }
        };

        match llm_output::parse_object(&raw) {
            Ok(obj) => filter_extracted(schema, obj),
            Err(err) => {
                warn!(%intent, error = %err, "extractor returned unparseable output");
                SlotValues::new()
            }
        }
    }
}

/// Build the extraction instruction for an intent's schema.
fn extraction_prompt(intent: Intent, schema: &SlotSchema) -> String {
    let slot_docs: Map<String, Value> = schema
        .all_slots()
        .map(|spec| (spec.name.to_string(), Value::String(spec.description.to_string())))
        .collect();
    let slot_docs = serde_json::to_string_pretty(&Value::Object(slot_docs))
        .unwrap_or_else(|_| "{}".to_string());
    let keys: Vec<&str> = schema.all_slots().map(|spec| spec.name).collect();
    let today = chrono::Local::now().format("%Y-%m-%d");

    format!(
        r#"You are a parameter extraction assistant for an Indian Railways chatbot.

Intent: {intent}
Parameters to extract: {keys:?}

Extract these parameters from the user's message:
{slot_docs}

Return ONLY a valid JSON object with exactly these keys. Use null for parameters not found in the message.
Example: {{"train_no": "12345", "date": "2024-01-15", "source": null}}
Important:
- Station names must be mapped to station codes (e.g., "NDLS" for New Delhi)
- Dates may appear in formats such as DD/MM/YYYY, YYYY-MM-DD, DD/MM/YY or YY-MM-DD
- Always convert extracted dates to YYYY-MM-DD format
- If the year has 2 digits (e.g., 25), interpret it as 20YY -> 2025
- Today's date is {today}
- Train numbers without spaces
- PNR as a 10-digit string"#
    )
}

/// Keep only schema slots whose value is a resolved scalar.
///
/// `null`, the literal string "null", and empty values are dropped; numbers
/// are stringified; embedded whitespace around values is trimmed.
fn filter_extracted(schema: &SlotSchema, obj: Map<String, Value>) -> SlotValues {
    obj.into_iter()
        .filter(|(key, _)| schema.contains(key))
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let value = value.trim().to_string();
            if crate::domain::slots::is_unresolved(&value) {
                None
            } else {
                Some((key, value))
            }
        })
        .collect()
}
