//! Per-conversation slot-filling state.
//!
//! A session exists only while a domain request is incomplete or about to
//! dispatch; it is deleted from the store as soon as the dispatch+format
//! cycle finishes, so a conversation always returns to a fresh start.

use serde::{Deserialize, Serialize};

use super::intent::Intent;
use super::slots::{schema_for, SlotValues};

/// Position in the slot-filling lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// No session record exists yet; never persisted.
    #[default]
    New,
    /// Intent fixed, at least one required slot unresolved.
    AwaitingParams,
    /// All required slots resolved; dispatch is imminent.
    Ready,
}

/// Slot-filling state for one conversation.
///
/// `intent` is always present: a session is only ever created once a message
/// has classified to a domain intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    /// The domain intent being filled.
    pub intent: Intent,
    /// Collected slot values.
    pub params: SlotValues,
    /// Lifecycle stage.
    pub stage: Stage,
}

impl ConversationSession {
    /// Start a session for a freshly classified intent.
    pub fn new(intent: Intent, params: SlotValues, stage: Stage) -> Self {
        let mut session = Self {
            intent,
            params,
            stage,
        };
        session.retain_schema_slots();
        session
    }

    /// Merge newly extracted values into the session; later input wins on
    /// key collision. Runs schema validation after the merge.
    pub fn merge(&mut self, extracted: SlotValues) {
        self.params.extend(extracted);
        self.retain_schema_slots();
    }

    /// Drop any key outside the intent's slot schema.
    ///
    /// Keeps the invariant that `params` keys are a subset of the schema even
    /// when the extractor or a stored record carries stray keys.
    fn retain_schema_slots(&mut self) {
        let schema = schema_for(self.intent);
        self.params.retain(|key, _| schema.contains(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SlotValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn merge_adds_new_keys() {
        let mut session = ConversationSession::new(
            Intent::TrainBetweenStations,
            params(&[("source", "NDLS")]),
            Stage::AwaitingParams,
        );

        session.merge(params(&[("destination", "BVI")]));

        assert_eq!(session.params, params(&[("source", "NDLS"), ("destination", "BVI")]));
    }

    #[test]
    fn merge_later_input_wins() {
        let mut session = ConversationSession::new(
            Intent::TrainBetweenStations,
            params(&[("source", "NDLS"), ("destination", "BVI")]),
            Stage::AwaitingParams,
        );

        session.merge(params(&[("source", "CSTM")]));

        assert_eq!(
            session.params,
            params(&[("source", "CSTM"), ("destination", "BVI")])
        );
    }

    #[test]
    fn merge_drops_keys_outside_schema() {
        let mut session = ConversationSession::new(
            Intent::PnrStatus,
            SlotValues::new(),
            Stage::AwaitingParams,
        );

        session.merge(params(&[("pnr", "1234567890"), ("mood", "hopeful")]));

        assert_eq!(session.params, params(&[("pnr", "1234567890")]));
    }

    #[test]
    fn new_validates_initial_params() {
        let session = ConversationSession::new(
            Intent::SearchTrain,
            params(&[("query", "rajdhani"), ("source", "NDLS")]),
            Stage::Ready,
        );

        assert_eq!(session.params, params(&[("query", "rajdhani")]));
    }

    #[test]
    fn stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::AwaitingParams).unwrap(),
            "\"awaiting_params\""
        );
        assert_eq!(serde_json::to_string(&Stage::Ready).unwrap(), "\"ready\"");
    }

    #[test]
    fn session_round_trips_through_json() {
        let session = ConversationSession::new(
            Intent::LiveStatus,
            params(&[("train_no", "12951"), ("date", "2025-11-02")]),
            Stage::Ready,
        );

        let json = serde_json::to_string(&session).unwrap();
        let restored: ConversationSession = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, session);
    }
}
