//! Per-request conversation state.

use std::sync::Arc;

use tracing::debug;

use crate::session::ConversationMessage;
use crate::{AiClient, AiError, AiResponse, Content, Part, Role, TokenUsage, ToolDefinition};

/// The model-side view of one exchange.
///
/// Rebuilt from stored history for every request. Function call and
/// function response turns accumulate here but are never persisted.
pub struct Conversation {
    client: Arc<dyn AiClient>,
    system_instruction: Option<String>,
    tools: Vec<ToolDefinition>,
    contents: Vec<Content>,
    usage: TokenUsage,
}

impl Conversation {
    pub fn new(
        client: Arc<dyn AiClient>,
        system_instruction: Option<String>,
        tools: Vec<ToolDefinition>,
    ) -> Self {
        Self {
            client,
            system_instruction,
            tools,
            contents: Vec::new(),
            usage: TokenUsage::default(),
        }
    }

    pub fn with_history(mut self, history: &[ConversationMessage]) -> Self {
        self.contents.extend(
            history
                .iter()
                .map(|m| Content::text(m.role, m.content.clone())),
        );
        self
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Tokens used by every `send` so far.
    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    /// Append a user turn and ask the model for the next one.
    ///
    /// On failure the user turn is removed again, leaving the conversation
    /// as it was before the call.
    pub async fn send(&mut self, parts: Vec<Part>) -> Result<AiResponse, AiError> {
        self.contents.push(Content {
            role: Role::User,
            parts,
        });

        debug!(turns = self.contents.len(), "sending conversation to model");
        let result = self
            .client
            .send_message(
                self.system_instruction.as_deref(),
                &self.contents,
                &self.tools,
            )
            .await;

        match result {
            Ok(response) => {
                self.usage.add(&response.usage);
                self.contents.push(Content {
                    role: Role::Model,
                    parts: response.parts.clone(),
                });
                Ok(response)
            }
            Err(e) => {
                self.contents.pop();
                Err(e)
            }
        }
    }
}
