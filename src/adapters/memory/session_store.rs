//! In-memory session store.
//!
//! Mirrors the Redis adapter's contract — sliding TTL, history cap, state
//! record deleted on clear — without a running Redis. Useful for testing
//! and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::ConversationSession;
use crate::ports::{ChatMessage, SessionStore, StoreError};

#[derive(Debug, Clone, Default)]
struct ConversationRecord {
    messages: Vec<ChatMessage>,
    session: Option<ConversationSession>,
}

/// In-memory storage for conversation state and history.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    conversations: Arc<Mutex<HashMap<String, (ConversationRecord, Instant)>>>,
    ttl: Duration,
    history_cap: usize,
}

impl InMemorySessionStore {
    /// Creates a store with the default TTL (1 hour) and history cap (15).
    pub fn new() -> Self {
        Self {
            conversations: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::from_secs(3600),
            history_cap: 15,
        }
    }

    /// Sets the sliding idle TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the history cap.
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }

    /// Number of live (unexpired) conversations.
    pub fn conversation_count(&self) -> usize {
        let now = Instant::now();
        self.conversations
            .lock()
            .unwrap()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    /// Run `f` against the live record for `id`, evicting it first if the
    /// idle window has passed.
    fn with_record<T>(
        &self,
        id: &str,
        f: impl FnOnce(Option<&ConversationRecord>) -> T,
    ) -> T {
        let mut conversations = self.conversations.lock().unwrap();
        let expired = conversations
            .get(id)
            .map_or(false, |(_, expires_at)| *expires_at <= Instant::now());
        if expired {
            conversations.remove(id);
        }
        f(conversations.get(id).map(|(record, _)| record))
    }

    /// Mutate the record for `id`, refreshing its TTL.
    fn mutate_record(&self, id: &str, f: impl FnOnce(&mut ConversationRecord)) {
        let mut conversations = self.conversations.lock().unwrap();
        let now = Instant::now();
        let entry = conversations
            .entry(id.to_string())
            .and_modify(|(record, expires_at)| {
                if *expires_at <= now {
                    *record = ConversationRecord::default();
                }
            })
            .or_insert_with(|| (ConversationRecord::default(), now));
        f(&mut entry.0);
        entry.1 = now + self.ttl;
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append_message(
        &self,
        conversation_id: &str,
        message: ChatMessage,
    ) -> Result<(), StoreError> {
        let cap = self.history_cap;
        self.mutate_record(conversation_id, |record| {
            record.messages.push(message);
            if record.messages.len() > cap {
                let excess = record.messages.len() - cap;
                record.messages.drain(..excess);
            }
        });
        Ok(())
    }

    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.with_record(conversation_id, |record| {
            record.map(|r| r.messages.clone()).unwrap_or_default()
        }))
    }

    async fn state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationSession>, StoreError> {
        Ok(self.with_record(conversation_id, |record| {
            record.and_then(|r| r.session.clone())
        }))
    }

    async fn set_state(
        &self,
        conversation_id: &str,
        session: &ConversationSession,
    ) -> Result<(), StoreError> {
        self.mutate_record(conversation_id, |record| {
            record.session = Some(session.clone());
        });
        Ok(())
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), StoreError> {
        self.mutate_record(conversation_id, |record| {
            record.session = None;
        });
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Intent, Stage};
    use proptest::prelude::*;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new()
    }

    fn session() -> ConversationSession {
        ConversationSession::new(
            Intent::PnrStatus,
            [("pnr".to_string(), "1234567890".to_string())].into(),
            Stage::AwaitingParams,
        )
    }

    #[tokio::test]
    async fn history_cap_keeps_most_recent_in_order() {
        let store = store().with_history_cap(15);

        for i in 0..20 {
            store
                .append_message("c1", ChatMessage::user(format!("message {i}")))
                .await
                .unwrap();
        }

        let history = store.history("c1").await.unwrap();
        assert_eq!(history.len(), 15);
        assert_eq!(history[0].content, "message 5");
        assert_eq!(history[14].content, "message 19");
    }

    #[tokio::test]
    async fn state_round_trips() {
        let store = store();
        let session = session();

        store.set_state("c1", &session).await.unwrap();

        assert_eq!(store.state("c1").await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn state_is_none_for_unknown_conversation() {
        assert_eq!(store().state("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clear_removes_state_but_keeps_history() {
        let store = store();
        store
            .append_message("c1", ChatMessage::user("hello"))
            .await
            .unwrap();
        store.set_state("c1", &session()).await.unwrap();

        store.clear("c1").await.unwrap();

        assert_eq!(store.state("c1").await.unwrap(), None);
        assert_eq!(store.history("c1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn idle_conversation_expires_as_a_whole() {
        let store = store().with_ttl(Duration::from_millis(10));
        store
            .append_message("c1", ChatMessage::user("hello"))
            .await
            .unwrap();
        store.set_state("c1", &session()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.state("c1").await.unwrap(), None);
        assert!(store.history("c1").await.unwrap().is_empty());
        assert_eq!(store.conversation_count(), 0);
    }

    #[tokio::test]
    async fn writes_refresh_the_idle_window() {
        let store = store().with_ttl(Duration::from_millis(60));
        store
            .append_message("c1", ChatMessage::user("first"))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        store
            .append_message("c1", ChatMessage::user("second"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        // Still alive: the second write restarted the window.
        assert_eq!(store.history("c1").await.unwrap().len(), 2);
    }

    proptest! {
        #[test]
        fn history_always_holds_the_most_recent_entries(total in 0usize..40, cap in 1usize..20) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            rt.block_on(async {
                let store = InMemorySessionStore::new().with_history_cap(cap);
                for i in 0..total {
                    store
                        .append_message("c1", ChatMessage::user(format!("m{i}")))
                        .await
                        .unwrap();
                }

                let history = store.history("c1").await.unwrap();
                prop_assert_eq!(history.len(), total.min(cap));
                let first_kept = total.saturating_sub(cap);
                for (offset, message) in history.iter().enumerate() {
                    prop_assert_eq!(&message.content, &format!("m{}", first_kept + offset));
                }
                Ok(())
            })?;
        }
    }
}
