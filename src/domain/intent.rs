//! Intent taxonomy for the dialogue engine.
//!
//! Messages are classified into one of three categories: a domain intent that
//! maps to a travel-data operation, a small-talk intent with a canned reply,
//! or out of scope. The category/intent sets are closed; anything the
//! classifier cannot place in them is treated as out of scope.

use serde::{Deserialize, Serialize};

/// A domain intent: one supported travel-data operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Trains running between two stations on a date.
    TrainBetweenStations,
    /// Live running status of a train.
    LiveStatus,
    /// Full schedule of a train.
    TrainSchedule,
    /// Seat availability on a train between two stations.
    SeatAvailability,
    /// PNR booking status lookup.
    PnrStatus,
    /// Departure board for upcoming hours.
    LiveStation,
    /// Free-text train search.
    SearchTrain,
    /// Free-text station search.
    SearchStation,
}

impl Intent {
    /// All domain intents, in classifier-prompt order.
    pub const ALL: [Intent; 8] = [
        Intent::TrainBetweenStations,
        Intent::LiveStatus,
        Intent::TrainSchedule,
        Intent::SeatAvailability,
        Intent::PnrStatus,
        Intent::LiveStation,
        Intent::SearchTrain,
        Intent::SearchStation,
    ];

    /// Wire token for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TrainBetweenStations => "train_between_stations",
            Intent::LiveStatus => "live_status",
            Intent::TrainSchedule => "train_schedule",
            Intent::SeatAvailability => "seat_availability",
            Intent::PnrStatus => "pnr_status",
            Intent::LiveStation => "live_station",
            Intent::SearchTrain => "search_train",
            Intent::SearchStation => "search_station",
        }
    }

    /// Parse a classifier token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Intent> {
        Intent::ALL.iter().copied().find(|i| i.as_str() == token)
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small-talk intent with a fixed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallTalkIntent {
    Greeting,
    Farewell,
    Thanks,
    HowAreYou,
}

impl SmallTalkIntent {
    /// All small-talk intents, in classifier-prompt order.
    pub const ALL: [SmallTalkIntent; 4] = [
        SmallTalkIntent::Greeting,
        SmallTalkIntent::Farewell,
        SmallTalkIntent::Thanks,
        SmallTalkIntent::HowAreYou,
    ];

    /// Wire token for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            SmallTalkIntent::Greeting => "greeting",
            SmallTalkIntent::Farewell => "farewell",
            SmallTalkIntent::Thanks => "thanks",
            SmallTalkIntent::HowAreYou => "how_are_you",
        }
    }

    /// Parse a classifier token. Unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<SmallTalkIntent> {
        SmallTalkIntent::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == token)
    }

    /// Canned reply for this intent.
    pub fn reply(&self) -> &'static str {
        match self {
            SmallTalkIntent::Greeting => "👋 Hello! How can I assist you with IRCTC today?",
            SmallTalkIntent::Farewell => "👋 Goodbye! Have a safe journey!",
            SmallTalkIntent::Thanks => "😊 You're welcome!",
            SmallTalkIntent::HowAreYou => {
                "I'm doing great! How can I help you with IRCTC services?"
            }
        }
    }
}

/// Fixed redirect for messages outside the travel domain.
pub const OUT_OF_SCOPE_REPLY: &str = "I can help you with IRCTC train services. \
    Please ask me if you have any questions related to trains, bookings, or PNR status.";

/// Result of classifying one user message.
///
/// Produced fresh for the first message of a conversation only; never
/// persisted beyond the session's `intent` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentClassification {
    /// Message maps to a travel-data operation.
    Domain(Intent),
    /// Conversational filler with a canned reply.
    SmallTalk(SmallTalkIntent),
    /// Anything else.
    OutOfScope,
}

impl IntentClassification {
    /// Build a classification from raw category/intent tokens.
    ///
    /// Any combination that does not name a known category and intent
    /// collapses to `OutOfScope`; classification never fails.
    pub fn from_tokens(category: &str, intent: Option<&str>) -> IntentClassification {
        match (category, intent) {
            ("domain", Some(token)) => Intent::parse(token)
                .map(IntentClassification::Domain)
                .unwrap_or(IntentClassification::OutOfScope),
            ("small_talk", Some(token)) => SmallTalkIntent::parse(token)
                .map(IntentClassification::SmallTalk)
                .unwrap_or(IntentClassification::OutOfScope),
            _ => IntentClassification::OutOfScope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_tokens_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
    }

    #[test]
    fn intent_parse_unknown_token() {
        assert_eq!(Intent::parse("book_flight"), None);
        assert_eq!(Intent::parse(""), None);
    }

    #[test]
    fn intent_serializes_snake_case() {
        let json = serde_json::to_string(&Intent::PnrStatus).unwrap();
        assert_eq!(json, "\"pnr_status\"");

        let json = serde_json::to_string(&Intent::TrainBetweenStations).unwrap();
        assert_eq!(json, "\"train_between_stations\"");
    }

    #[test]
    fn small_talk_every_variant_has_reply() {
        for intent in SmallTalkIntent::ALL {
            assert!(!intent.reply().is_empty());
        }
    }

    #[test]
    fn small_talk_greeting_reply() {
        assert_eq!(
            SmallTalkIntent::Greeting.reply(),
            "👋 Hello! How can I assist you with IRCTC today?"
        );
    }

    #[test]
    fn classification_domain_tokens() {
        assert_eq!(
            IntentClassification::from_tokens("domain", Some("pnr_status")),
            IntentClassification::Domain(Intent::PnrStatus)
        );
    }

    #[test]
    fn classification_small_talk_tokens() {
        assert_eq!(
            IntentClassification::from_tokens("small_talk", Some("greeting")),
            IntentClassification::SmallTalk(SmallTalkIntent::Greeting)
        );
    }

    #[test]
    fn classification_unknown_intent_is_out_of_scope() {
        assert_eq!(
            IntentClassification::from_tokens("domain", Some("teleport")),
            IntentClassification::OutOfScope
        );
    }

    #[test]
    fn classification_missing_intent_is_out_of_scope() {
        assert_eq!(
            IntentClassification::from_tokens("domain", None),
            IntentClassification::OutOfScope
        );
        assert_eq!(
            IntentClassification::from_tokens("out_of_scope", None),
            IntentClassification::OutOfScope
        );
    }

    #[test]
    fn classification_unknown_category_is_out_of_scope() {
        assert_eq!(
            IntentClassification::from_tokens("weather", Some("forecast")),
            IntentClassification::OutOfScope
        );
    }
}
