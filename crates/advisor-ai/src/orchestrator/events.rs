//! Progress events of a streamed exchange.

use serde::Serialize;
use tokio::sync::mpsc;

use super::ChatError;

/// One client-visible step. Serialized as `{"type": ..., ...fields}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Status {
        message: String,
    },
    MessageStart {
        message: String,
    },
    FunctionCall {
        function_name: String,
        message: String,
    },
    FunctionExecuting {
        function_name: String,
        message: String,
    },
    FunctionCompleted {
        function_name: String,
        message: String,
    },
    GeneratingResponse {
        message: String,
    },
    Error {
        message: String,
    },
    Response {
        content: String,
        message: String,
    },
    Complete {
        message: String,
    },
}

impl ChatEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ChatEvent::Error {
            message: message.into(),
        }
    }

    /// The `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::Status { .. } => "status",
            ChatEvent::MessageStart { .. } => "message_start",
            ChatEvent::FunctionCall { .. } => "function_call",
            ChatEvent::FunctionExecuting { .. } => "function_executing",
            ChatEvent::FunctionCompleted { .. } => "function_completed",
            ChatEvent::GeneratingResponse { .. } => "generating_response",
            ChatEvent::Error { .. } => "error",
            ChatEvent::Response { .. } => "response",
            ChatEvent::Complete { .. } => "complete",
        }
    }

    /// Whether a stream may end after this event.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChatEvent::Error { .. } | ChatEvent::Response { .. } | ChatEvent::Complete { .. }
        )
    }
}

/// Sending half of an event stream.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<ChatEvent>,
}

impl EventSink {
    pub fn new(tx: mpsc::Sender<ChatEvent>) -> Self {
        Self { tx }
    }

    /// Deliver one event. Fails once the receiving side is gone.
    pub async fn emit(&self, event: ChatEvent) -> Result<(), ChatError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| ChatError::Disconnected)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
