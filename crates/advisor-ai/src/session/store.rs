//! Session history storage.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use advisor_common::SessionId;

use super::ConversationMessage;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed storage for session histories.
///
/// Every session has a history entry and a companion activity marker,
/// each with its own expiry. The active set is pruned lazily: ids whose
/// marker has expired are dropped the next time the set is listed.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Replace the whole history of `id`.
    async fn set_history(
        &self,
        id: &SessionId,
        history: &[ConversationMessage],
        ttl: Duration,
    ) -> Result<(), StoreError>;

    /// `None` when the session was never created or has expired.
    async fn get_history(&self, id: &SessionId)
        -> Result<Option<Vec<ConversationMessage>>, StoreError>;

    /// Add `id` to the active set and (re)start its activity marker.
    async fn add_active_session(&self, id: &SessionId, ttl: Duration) -> Result<(), StoreError>;

    async fn list_active_sessions(&self) -> Result<Vec<SessionId>, StoreError>;

    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError>;

    /// Both the history and the activity marker are live.
    async fn session_exists(&self, id: &SessionId) -> Result<bool, StoreError>;
}

struct Expiring<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Expiring<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Key layout, by analogy with a key-value server:
/// `chat:{id}` → `histories`, `session:meta:{id}` → `meta`,
/// `chat:sessions` → `active`.
#[derive(Default)]
struct Inner {
    histories: HashMap<SessionId, Expiring<Vec<ConversationMessage>>>,
    meta: HashMap<SessionId, Expiring<()>>,
    active: BTreeSet<SessionId>,
}

impl Inner {
    /// Drop expired histories and markers, and active ids whose marker
    /// is gone.
    fn sweep(&mut self, now: Instant) {
        self.histories.retain(|_, h| h.is_live(now));
        self.meta.retain(|_, m| m.is_live(now));
        let meta = &self.meta;
        self.active.retain(|id| {
            let live = meta.contains_key(id);
            if !live {
                debug!(session = %id, "pruning expired session");
            }
            live
        });
    }
}

/// In-process [`HistoryStore`]. Expiry follows `tokio::time`, so paused
/// test clocks apply.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Histories currently held, live or not yet swept.
    #[cfg(test)]
    pub(crate) async fn held_histories(&self) -> usize {
        self.inner.read().await.histories.len()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    async fn set_history(
        &self,
        id: &SessionId,
        history: &[ConversationMessage],
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.sweep(Instant::now());
        inner
            .histories
            .insert(id.clone(), Expiring::new(history.to_vec(), ttl));
        Ok(())
    }

    async fn get_history(
        &self,
        id: &SessionId,
    ) -> Result<Option<Vec<ConversationMessage>>, StoreError> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        match inner.histories.get(id) {
            Some(entry) if entry.is_live(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                inner.histories.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn add_active_session(&self, id: &SessionId, ttl: Duration) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.active.insert(id.clone());
        inner.meta.insert(id.clone(), Expiring::new((), ttl));
        Ok(())
    }

    async fn list_active_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.sweep(now);
        Ok(inner.active.iter().cloned().collect())
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.histories.remove(id);
        inner.meta.remove(id);
        inner.active.remove(id);
        Ok(())
    }

    async fn session_exists(&self, id: &SessionId) -> Result<bool, StoreError> {
        let now = Instant::now();
        let inner = self.inner.read().await;
        let history = inner.histories.get(id).is_some_and(|h| h.is_live(now));
        let meta = inner.meta.get(id).is_some_and(|m| m.is_live(now));
        Ok(history && meta)
    }
}
