//! Session Store Port - Conversation state and history persistence.
//!
//! Each conversation owns two records: an ordered message history and a
//! structured slot-filling session. Both live under a sliding idle TTL that
//! every mutating call refreshes, so an abandoned conversation vanishes as a
//! whole after the idle window.
//!
//! The store is the only error source allowed to fail a whole turn: without
//! readable/writable state the orchestrator cannot proceed safely.

use async_trait::async_trait;

use crate::domain::ConversationSession;

use super::llm_provider::ChatMessage;

/// Port for per-conversation state and history.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a message to the conversation history.
    ///
    /// Atomically enforces the history cap: after insertion the list holds at
    /// most the configured number of most recent entries (FIFO eviction).
    /// Refreshes the TTL of both conversation records.
    async fn append_message(
        &self,
        conversation_id: &str,
        message: ChatMessage,
    ) -> Result<(), StoreError>;

    /// Retrieve the conversation history, oldest first.
    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError>;

    /// Retrieve the slot-filling session, if one exists.
    async fn state(&self, conversation_id: &str)
        -> Result<Option<ConversationSession>, StoreError>;

    /// Persist the slot-filling session. Refreshes the TTL of both records.
    async fn set_state(
        &self,
        conversation_id: &str,
        session: &ConversationSession,
    ) -> Result<(), StoreError>;

    /// Delete the slot-filling session record.
    ///
    /// History is left to expire via the sliding TTL so the transcript
    /// outlives a completed request.
    async fn clear(&self, conversation_id: &str) -> Result<(), StoreError>;

    /// Health probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Session store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store is unreachable or refused the operation.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be encoded or decoded.
    #[error("session record corrupt: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}
