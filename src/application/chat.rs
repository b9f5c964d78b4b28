//! The dialogue orchestrator.
//!
//! Drives one conversation turn through the state machine:
//!
//! `NEW` (no session) -> classify; small talk and out-of-scope short-circuit
//! statelessly, a domain intent extracts parameters and either asks for the
//! missing ones (`AWAITING_PARAMS`) or dispatches in the same turn (`READY`).
//! `AWAITING_PARAMS` -> re-extract against the stored intent (never
//! re-classified), merge with later-input-wins, re-prompt or dispatch.
//! `READY` -> dispatch, format, clear the session unconditionally.
//!
//! Every turn appends the incoming user message to history first and the
//! produced assistant reply last, whichever branch runs. Only session-store
//! failures escape; everything else becomes chat text.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info};

use crate::domain::{
    clarification_prompt, missing_slots, ConversationSession, IntentClassification, Stage,
    OUT_OF_SCOPE_REPLY,
};
use crate::ports::{ChatMessage, SessionStore, StoreError};

use super::dispatcher::Dispatcher;
use super::extractor::ParamExtractor;
use super::formatter::ResponseFormatter;
use super::resolver::IntentResolver;

/// Errors that can fail a whole turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The session store is unreachable; no reply was produced.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a turn produced and whether it finished a request.
struct TurnOutcome {
    reply: String,
    /// True after a dispatch+format cycle; the session is cleared.
    terminal: bool,
}

impl TurnOutcome {
    fn reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            terminal: false,
        }
    }
}

/// Per-conversation dialogue orchestration service.
///
/// Turns on the same conversation are serialized by a keyed mutex held for
/// the whole turn; turns on different conversations share no lock.
pub struct ChatService {
    store: Arc<dyn SessionStore>,
    resolver: IntentResolver,
    extractor: ParamExtractor,
    dispatcher: Dispatcher,
    formatter: ResponseFormatter,
    turn_locks: Mutex<HashMap<String, Arc<TokioMutex<()>>>>,
}

impl ChatService {
    /// Creates the service from its injected collaborators.
    pub fn new(
        store: Arc<dyn SessionStore>,
        resolver: IntentResolver,
        extractor: ParamExtractor,
        dispatcher: Dispatcher,
        formatter: ResponseFormatter,
    ) -> Self {
        Self {
            store,
            resolver,
            extractor,
            dispatcher,
            formatter,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one user message and produce the assistant reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Store` if the session store is unreachable; in
    /// that case no partial reply is produced and the session is untouched
    /// beyond whatever writes already succeeded (safe to retry).
    pub async fn handle_message(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> Result<String, ChatError> {
        let lock = self.turn_lock(conversation_id);
        let result = {
            let _turn = lock.lock().await;
            self.run_turn(conversation_id, message).await
        };
        self.release_turn_lock(conversation_id, &lock);
        result
    }

    /// Conversation history, oldest first.
    pub async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, ChatError> {
        Ok(self.store.history(conversation_id).await?)
    }

    /// Session-store health probe.
    pub async fn ping(&self) -> Result<(), ChatError> {
        Ok(self.store.ping().await?)
    }

    async fn run_turn(&self, conversation_id: &str, message: &str) -> Result<String, ChatError> {
        self.store
            .append_message(conversation_id, ChatMessage::user(message))
            .await?;

        let outcome = match self.store.state(conversation_id).await? {
            None => self.first_turn(conversation_id, message).await?,
            Some(session) => self.continue_turn(conversation_id, session, message).await?,
        };

        self.store
            .append_message(conversation_id, ChatMessage::assistant(&outcome.reply))
            .await?;
        if outcome.terminal {
            self.store.clear(conversation_id).await?;
        }

        Ok(outcome.reply)
    }

    /// First message of a conversation: classify, then branch.
    async fn first_turn(
        &self,
        conversation_id: &str,
        message: &str,
    ) -> Result<TurnOutcome, ChatError> {
        match self.resolver.classify(message).await {
            IntentClassification::SmallTalk(intent) => {
                debug!(conversation_id, intent = intent.as_str(), "small talk");
                Ok(TurnOutcome::reply(intent.reply()))
            }
            IntentClassification::OutOfScope => {
                debug!(conversation_id, "out of scope");
                Ok(TurnOutcome::reply(OUT_OF_SCOPE_REPLY))
            }
            IntentClassification::Domain(intent) => {
                info!(conversation_id, %intent, "domain intent resolved");
                let params = self.extractor.extract(intent, message).await;
                let session = ConversationSession::new(intent, params, Stage::AwaitingParams);
                self.fill_or_dispatch(conversation_id, session).await
            }
        }
    }

    /// Follow-up message: re-extract against the stored intent and merge.
    async fn continue_turn(
        &self,
        conversation_id: &str,
        mut session: ConversationSession,
        message: &str,
    ) -> Result<TurnOutcome, ChatError> {
        if session.stage == Stage::Ready {
            // A previous turn persisted READY but was interrupted before
            // clearing; finish its dispatch instead of re-extracting.
            return Ok(self.dispatch_and_format(&session).await);
        }

        let extracted = self.extractor.extract(session.intent, message).await;
        session.merge(extracted);
        self.fill_or_dispatch(conversation_id, session).await
    }

    /// Persist the session and either ask for missing slots or dispatch.
    async fn fill_or_dispatch(
        &self,
        conversation_id: &str,
        mut session: ConversationSession,
    ) -> Result<TurnOutcome, ChatError> {
        let missing = missing_slots(session.intent, &session.params);
        if !missing.is_empty() {
            session.stage = Stage::AwaitingParams;
            self.store.set_state(conversation_id, &session).await?;
            info!(conversation_id, intent = %session.intent, ?missing, "awaiting parameters");
            return Ok(TurnOutcome::reply(clarification_prompt(&missing)));
        }

        session.stage = Stage::Ready;
        self.store.set_state(conversation_id, &session).await?;
        Ok(self.dispatch_and_format(&session).await)
    }

    /// Terminal step: one downstream dispatch, then best-effort formatting.
    async fn dispatch_and_format(&self, session: &ConversationSession) -> TurnOutcome {
        info!(intent = %session.intent, "dispatching");
        let raw = self.dispatcher.dispatch(session.intent, &session.params).await;
        let reply = self.formatter.format(session.intent, &raw).await;
        TurnOutcome {
            reply,
            terminal: true,
        }
    }

    /// Get or create the turn lock for a conversation.
    fn turn_lock(&self, conversation_id: &str) -> Arc<TokioMutex<()>> {
        let mut locks = self.turn_locks.lock().expect("turn lock map poisoned");
        locks
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the map entry once no other turn holds or awaits the lock.
    ///
    /// Strong count is read under the map mutex; clones are only handed out
    /// under the same mutex, so a count of 2 (map + caller) means no waiters.
    fn release_turn_lock(&self, conversation_id: &str, lock: &Arc<TokioMutex<()>>) {
        let mut locks = self.turn_locks.lock().expect("turn lock map poisoned");
        if let Some(entry) = locks.get(conversation_id) {
            if Arc::ptr_eq(entry, lock) && Arc::strong_count(entry) == 2 {
                locks.remove(conversation_id);
            }
        }
    }

    #[cfg(test)]
    fn turn_lock_count(&self) -> usize {
        self.turn_locks.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::llm::MockLlmProvider;
    use crate::adapters::memory::InMemorySessionStore;
    use crate::adapters::rail::MockTravelApi;
    use serde_json::json;

    fn service(llm: MockLlmProvider, api: MockTravelApi) -> ChatService {
        let llm: Arc<dyn crate::ports::LlmProvider> = Arc::new(llm);
        ChatService::new(
            Arc::new(InMemorySessionStore::new()),
            IntentResolver::new(llm.clone()),
            ParamExtractor::new(llm.clone()),
            Dispatcher::new(Arc::new(api)),
            ResponseFormatter::new(llm),
        )
    }

    #[tokio::test]
    async fn small_talk_leaves_no_turn_lock_behind() {
        let llm = MockLlmProvider::new()
            .with_response(r#"{"category": "small_talk", "intent": "greeting"}"#);
        let service = service(llm, MockTravelApi::new());

        let reply = service.handle_message("c1", "hello").await.unwrap();

        assert_eq!(reply, "👋 Hello! How can I assist you with IRCTC today?");
        assert_eq!(service.turn_lock_count(), 0);
    }

    #[tokio::test]
    async fn interrupted_ready_session_dispatches_without_extraction() {
        // Only the formatter response is queued: neither classifier nor
        // extractor may run when a READY session is found.
        let llm = MockLlmProvider::new().with_response("Your ticket is confirmed.");
        let api = MockTravelApi::new().with_response(json!({"status": "CNF"}));
        let service = service(llm, api);

        let session = ConversationSession::new(
            crate::domain::Intent::PnrStatus,
            [("pnr".to_string(), "1234567890".to_string())].into(),
            Stage::Ready,
        );
        service.store.set_state("c1", &session).await.unwrap();

        let reply = service.handle_message("c1", "any update?").await.unwrap();

        assert_eq!(reply, "Your ticket is confirmed.");
        assert!(service.store.state("c1").await.unwrap().is_none());
    }
}
