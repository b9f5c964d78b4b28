//! Redis-backed session store for production deployments.
//!
//! Per conversation, two keys: `chat:{id}:messages`, a list of JSON-encoded
//! messages trimmed to the history cap on every append, and `chat:{id}:state`,
//! the JSON-encoded slot-filling session. Every mutating call refreshes the
//! sliding TTL on both keys so an abandoned conversation's state and history
//! vanish together after the idle window.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::config::RedisConfig;
use crate::domain::ConversationSession;
use crate::ports::{ChatMessage, SessionStore, StoreError};

/// Redis-backed session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: i64,
    history_cap: isize,
}

impl RedisSessionStore {
    /// Creates a store over an existing connection.
    pub fn new(conn: MultiplexedConnection, ttl: Duration, history_cap: usize) -> Self {
        Self {
            conn,
            ttl_secs: ttl.as_secs() as i64,
            history_cap: history_cap as isize,
        }
    }

    /// Connects to Redis using the application config section.
    pub async fn connect(config: &RedisConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        let conn = tokio::time::timeout(
            config.timeout(),
            client.get_multiplexed_tokio_connection(),
        )
        .await
        .map_err(|_| StoreError::unavailable("connection timed out"))?
        .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(Self::new(conn, config.session_ttl(), config.history_cap))
    }

    fn messages_key(conversation_id: &str) -> String {
        format!("chat:{conversation_id}:messages")
    }

    fn state_key(conversation_id: &str) -> String {
        format!("chat:{conversation_id}:state")
    }

    /// Restart the idle window on both conversation keys.
    ///
    /// EXPIRE on a missing key is a no-op, so this is safe whichever of the
    /// two records exists.
    async fn refresh_ttl(
        &self,
        conn: &mut MultiplexedConnection,
        conversation_id: &str,
    ) -> Result<(), StoreError> {
        conn.expire::<_, ()>(Self::messages_key(conversation_id), self.ttl_secs)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;
        conn.expire::<_, ()>(Self::state_key(conversation_id), self.ttl_secs)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn append_message(
        &self,
        conversation_id: &str,
        message: ChatMessage,
    ) -> Result<(), StoreError> {
        let key = Self::messages_key(conversation_id);
        let entry =
            serde_json::to_string(&message).map_err(|e| StoreError::serialization(e.to_string()))?;

        let mut conn = self.conn.clone();

        conn.rpush::<_, _, ()>(&key, entry)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;

        // Keep only the most recent entries
        conn.ltrim::<_, ()>(&key, -self.history_cap, -1)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;

        self.refresh_ttl(&mut conn, conversation_id).await
    }

    async fn history(&self, conversation_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let key = Self::messages_key(conversation_id);
        let mut conn = self.conn.clone();

        let raw: Vec<String> = conn
            .lrange(&key, 0, -1)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;

        raw.iter()
            .map(|entry| {
                serde_json::from_str(entry).map_err(|e| StoreError::serialization(e.to_string()))
            })
            .collect()
    }

    async fn state(
        &self,
        conversation_id: &str,
    ) -> Result<Option<ConversationSession>, StoreError> {
        let key = Self::state_key(conversation_id);
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;

        match raw {
            None => Ok(None),
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| StoreError::serialization(e.to_string())),
        }
    }

    async fn set_state(
        &self,
        conversation_id: &str,
        session: &ConversationSession,
    ) -> Result<(), StoreError> {
        let key = Self::state_key(conversation_id);
        let json =
            serde_json::to_string(session).map_err(|e| StoreError::serialization(e.to_string()))?;

        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(&key, json)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;

        self.refresh_ttl(&mut conn, conversation_id).await
    }

    async fn clear(&self, conversation_id: &str) -> Result<(), StoreError> {
        let key = Self::state_key(conversation_id);
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(&key)
            .await
            .map_err(|e: redis::RedisError| StoreError::unavailable(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSessionStore")
            .field("ttl_secs", &self.ttl_secs)
            .field("history_cap", &self.history_cap)
            .finish_non_exhaustive()
    }
}
