//! The tool-calling loop.
//!
//! One user message goes to the model; every function call the model
//! proposes is executed and the whole batch of results is sent back, until
//! the model answers with plain text or the round ceiling is reached.

mod chat;
mod events;
mod run;
mod stream;


use std::sync::Arc;

use crate::session::{ConversationMessage, StoreError};
use crate::tools::ToolRegistry;
use crate::{AiClient, AiError, TokenUsage};

pub use chat::Conversation;
pub use events::{ChatEvent, EventSink};

/// Request-level failure of one exchange. Per-tool failures never surface
/// here; they are fed back to the model as error results.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("model request failed: {0}")]
    Model(#[from] AiError),
    #[error("session store failed: {0}")]
    Store(#[from] StoreError),
    #[error("client disconnected")]
    Disconnected,
}

/// Outcome of one user message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Final model text. Empty when the ceiling was hit before any text.
    pub text: String,
    /// Tool rounds executed.
    pub rounds: u32,
    /// The ceiling stopped the loop while calls were still pending.
    pub capped: bool,
    pub tool_calls: usize,
    pub usage: TokenUsage,
}

/// Builds conversations and drives the loop over them.
pub struct Orchestrator {
    client: Arc<dyn AiClient>,
    registry: Arc<ToolRegistry>,
    system_instruction: Option<String>,
}

impl Orchestrator {
    pub fn new(client: Arc<dyn AiClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            registry,
            system_instruction: None,
        }
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// A fresh conversation seeded with persisted history.
    pub fn conversation(&self, history: &[ConversationMessage]) -> Conversation {
        Conversation::new(
            Arc::clone(&self.client),
            self.system_instruction.clone(),
            self.registry.definitions(),
        )
        .with_history(history)
    }
}
