//! Redis-backed [`HistoryStore`].
//!
//! Keys:
//! - `chat:{id}` holds the history as a JSON array, with an expiry.
//! - `session:meta:{id}` is the activity marker, with an expiry.
//! - `chat:sessions` is the set of session ids, pruned on listing.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use advisor_common::SessionId;

use super::store::{HistoryStore, StoreError};
use super::ConversationMessage;

const ACTIVE_SET: &str = "chat:sessions";

fn history_key(id: &SessionId) -> String {
    format!("chat:{id}")
}

fn meta_key(id: &SessionId) -> String {
    format!("session:meta:{id}")
}

/// `EX` rejects zero.
fn expiry_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Shared store for multi-instance deployments. Histories survive restarts.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Open a managed connection to `url` (`redis://host:port/db`).
    /// Dropped connections are re-established on the next command.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        info!("connected to redis");
        Ok(Self { conn })
    }
}

#[async_trait]
impl HistoryStore for RedisStore {
    async fn set_history(
        &self,
        id: &SessionId,
        history: &[ConversationMessage],
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(history)
            .map_err(|e| StoreError::Unavailable(format!("cannot encode history: {e}")))?;
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(history_key(id), json, expiry_secs(ttl)).await?;
        Ok(())
    }

    async fn get_history(
        &self,
        id: &SessionId,
    ) -> Result<Option<Vec<ConversationMessage>>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(history_key(id)).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(|e| StoreError::Unavailable(format!("corrupt history for {id}: {e}")))
    }

    async fn add_active_session(&self, id: &SessionId, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .sadd(ACTIVE_SET, id.as_str())
            .ignore()
            .set_ex(meta_key(id), "active", expiry_secs(ttl))
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn list_active_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = conn.smembers(ACTIVE_SET).await?;

        let mut active = Vec::with_capacity(members.len());
        for member in members {
            let id = SessionId::new(member);
            let live: bool = conn.exists(meta_key(&id)).await?;
            if live {
                active.push(id);
            } else {
                debug!(session = %id, "pruning expired session");
                let _: () = conn.srem(ACTIVE_SET, id.as_str()).await?;
            }
        }
        active.sort();
        Ok(active)
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = redis::pipe()
            .atomic()
            .del(history_key(id))
            .ignore()
            .del(meta_key(id))
            .ignore()
            .srem(ACTIVE_SET, id.as_str())
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn session_exists(&self, id: &SessionId) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let (history, meta): (bool, bool) = redis::pipe()
            .exists(history_key(id))
            .exists(meta_key(id))
            .query_async(&mut conn)
            .await?;
        Ok(history && meta)
    }
}
