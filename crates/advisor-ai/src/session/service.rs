//! Session service: history in, one exchange, history out.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, OwnedMutexGuard};
use tracing::{error, info, warn};

use advisor_common::SessionId;

use crate::orchestrator::{ChatError, ChatEvent, EventSink, Orchestrator};
use crate::tools::ToolContext;

use super::{ConversationMessage, HistoryStore, SessionLocks, StoreError};

const EVENT_BUFFER: usize = 32;

/// Round ceilings and retention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_rounds: u32,
    pub max_stream_rounds: u32,
    pub ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            max_stream_rounds: 5,
            ttl: Duration::from_secs(24 * 3600),
        }
    }
}

/// Result of a non-streamed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub capped: bool,
    pub rounds: u32,
}

pub struct SessionService {
    store: Arc<dyn HistoryStore>,
    orchestrator: Orchestrator,
    limits: SessionLimits,
    locks: Option<SessionLocks>,
}

impl SessionService {
    pub fn new(store: Arc<dyn HistoryStore>, orchestrator: Orchestrator) -> Self {
        Self {
            store,
            orchestrator,
            limits: SessionLimits::default(),
            locks: None,
        }
    }

    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Run exchanges on the same session one at a time.
    pub fn with_serialized_sessions(mut self) -> Self {
        self.locks = Some(SessionLocks::new());
        self
    }

    /// Start `id` with an empty history. Recreating an existing id wipes
    /// its history.
    pub async fn create(&self, id: &SessionId) -> Result<(), StoreError> {
        self.store.set_history(id, &[], self.limits.ttl).await?;
        self.store.add_active_session(id, self.limits.ttl).await?;
        info!(session = %id, "session created");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<SessionId>, StoreError> {
        self.store.list_active_sessions().await
    }

    pub async fn exists(&self, id: &SessionId) -> Result<bool, StoreError> {
        self.store.session_exists(id).await
    }

    pub async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        self.store.delete_session(id).await?;
        info!(session = %id, "session deleted");
        Ok(())
    }

    /// Stored history, if any.
    pub async fn history(
        &self,
        id: &SessionId,
    ) -> Result<Option<Vec<ConversationMessage>>, StoreError> {
        self.store.get_history(id).await
    }

    /// One exchange, returning the final text. History is only written
    /// when the exchange succeeds.
    pub async fn send(
        &self,
        id: &SessionId,
        message: &str,
        credential: &str,
    ) -> Result<Reply, ChatError> {
        let _guard = self.lock(id).await;
        let (mut history, _) = self.load_or_create(id).await?;
        let ctx = ToolContext::new(credential, id.clone());

        let mut conversation = self.orchestrator.conversation(&history);
        let completion = self
            .orchestrator
            .run(&mut conversation, message, &ctx, self.limits.max_rounds)
            .await?;

        history.push(ConversationMessage::user(message));
        history.push(ConversationMessage::model(completion.text.clone()));
        self.persist(id, &history).await?;

        info!(
            session = %id,
            rounds = completion.rounds,
            tool_calls = completion.tool_calls,
            capped = completion.capped,
            tokens = completion.usage.total_tokens(),
            "exchange complete"
        );
        Ok(Reply {
            text: completion.text,
            capped: completion.capped,
            rounds: completion.rounds,
        })
    }

    /// One exchange reported as a stream of events.
    ///
    /// The exchange runs on its own task. Dropping the receiver stops it at
    /// the next event and leaves the stored history untouched. Every
    /// stream that is read to the end finishes with `complete` or `error`.
    pub fn send_stream(
        self: &Arc<Self>,
        id: SessionId,
        message: String,
        credential: String,
    ) -> mpsc::Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let service = Arc::clone(self);

        tokio::spawn(async move {
            let sink = EventSink::new(tx);
            match service.stream_exchange(&id, &message, &credential, &sink).await {
                Ok(()) => {}
                Err(ChatError::Disconnected) => {
                    info!(session = %id, "client disconnected, history not saved");
                }
                // Already reported to the client by the orchestrator.
                Err(ChatError::Model(e)) => {
                    warn!(session = %id, error = %e, "streamed exchange failed");
                }
                Err(ChatError::Store(e)) => {
                    error!(session = %id, error = %e, "session store failed during stream");
                    let _ = sink.emit(ChatEvent::error(e.to_string())).await;
                }
            }
        });

        rx
    }

    async fn stream_exchange(
        &self,
        id: &SessionId,
        message: &str,
        credential: &str,
        sink: &EventSink,
    ) -> Result<(), ChatError> {
        let _guard = self.lock(id).await;
        let (mut history, created) = self.load_or_create(id).await?;
        if created {
            sink.emit(ChatEvent::Status {
                message: "Session created, processing message...".into(),
            })
            .await?;
        }

        let ctx = ToolContext::new(credential, id.clone());
        let mut conversation = self.orchestrator.conversation(&history);
        let completion = self
            .orchestrator
            .run_streaming(
                &mut conversation,
                message,
                &ctx,
                self.limits.max_stream_rounds,
                sink,
            )
            .await?;

        if sink.is_closed() {
            return Err(ChatError::Disconnected);
        }

        history.push(ConversationMessage::user(message));
        history.push(ConversationMessage::model(completion.text));
        self.persist(id, &history).await?;

        info!(
            session = %id,
            rounds = completion.rounds,
            tool_calls = completion.tool_calls,
            capped = completion.capped,
            "streamed exchange complete"
        );
        sink.emit(ChatEvent::Complete {
            message: "Conversation saved".into(),
        })
        .await
    }

    /// Stored history, creating the session when it has none. The flag is
    /// set when the session was created here.
    async fn load_or_create(
        &self,
        id: &SessionId,
    ) -> Result<(Vec<ConversationMessage>, bool), StoreError> {
        match self.store.get_history(id).await? {
            Some(history) => Ok((history, false)),
            None => {
                self.create(id).await?;
                Ok((Vec::new(), true))
            }
        }
    }

    /// Write the history and restart both expiry clocks.
    async fn persist(
        &self,
        id: &SessionId,
        history: &[ConversationMessage],
    ) -> Result<(), StoreError> {
        self.store.set_history(id, history, self.limits.ttl).await?;
        self.store.add_active_session(id, self.limits.ttl).await
    }

    pub(crate) async fn lock(&self, id: &SessionId) -> Option<OwnedMutexGuard<()>> {
        match &self.locks {
            Some(locks) => Some(locks.acquire(id).await),
            None => None,
        }
    }
}
