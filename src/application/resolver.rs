//! Intent resolution for incoming messages.
//!
//! One backend call with a fixed instruction prompt enumerating every legal
//! (category, intent) pair. Classification never fails: malformed output,
//! unknown tokens, and backend errors all collapse to out-of-scope, pushing
//! ambiguity downstream instead of failing the turn.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::domain::IntentClassification;
use crate::ports::{ChatRole, CompletionRequest, LlmProvider};

use super::llm_output;

const CLASSIFIER_PROMPT: &str = r#"You are an intent classifier for an IRCTC chatbot.

Return a JSON with:
{
"category": "domain" | "small_talk" | "out_of_scope",
"intent": "<intent_name or null>"
}

====================
SMALL TALK INTENTS:
- greeting (hi, hello, good morning, hey)
- farewell (bye, good night)
- thanks (thanks, thank you)
- how_are_you (how are you?)

====================
DOMAIN INTENTS:
- train_between_stations
- live_status
- train_schedule
- seat_availability
- pnr_status
- live_station
- search_train
- search_station

====================
OUT OF SCOPE:
Anything unrelated to trains or IRCTC.

STRICT RULES:
- Return ONLY JSON.
- No markdown. No explanation."#;

/// Classifies a message into a category and intent.
pub struct IntentResolver {
    llm: Arc<dyn LlmProvider>,
}

impl IntentResolver {
    /// Creates a resolver backed by the given provider.
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Classify one user message.
    ///
    /// Always returns a value from the fixed category/intent enumeration;
    /// the backend is non-deterministic and nothing more is guaranteed.
    pub async fn classify(&self, message: &str) -> IntentClassification {
        let request = CompletionRequest::new()
            .with_system_prompt(CLASSIFIER_PROMPT)
            .with_message(ChatRole::User, message);

        let raw = match self.llm.complete(request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "classification backend call failed");
                return IntentClassification::OutOfScope;
            }
        };

        match llm_output::parse_object(&raw) {
            Ok(obj) => {
                let category = obj.get("category").and_then(Value::as_str).unwrap_or("");
                let intent = obj.get("intent").and_then(Value::as_str);
                IntentClassification::from_tokens(category, intent)
            }
            Err(err) => {
                warn!(error = %err, "classifier returned unparseable output");
                IntentClassification::OutOfScope
            }
        }
    }
}
