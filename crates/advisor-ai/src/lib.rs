//! Conversational engine for the academic scheduling assistant.
//!
//! Provides:
//! - A Gemini API client behind the `AiClient` trait
//! - The scheduling backend client and the tools wrapping it
//! - The tool-calling orchestration loop (batch and streaming)
//! - Session history storage and the per-request session service

pub mod backend;
pub mod gemini;
pub mod orchestrator;
pub mod prompt;
pub mod session;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use backend::{BackendError, HttpScheduleBackend, ScheduleBackend};
pub use gemini::{GeminiClient, GeminiConfig};
pub use orchestrator::{ChatError, ChatEvent, Completion, Conversation, EventSink, Orchestrator};
pub use session::{
    ConversationMessage, HistoryStore, MemoryStore, RedisStore, Reply, SessionLimits,
    SessionService, StoreError,
};
pub use tools::{ToolContext, ToolError, ToolRegistry};

#[async_trait]
pub trait AiClient: Send + Sync {
    /// Run one model turn over the full conversation so far.
    async fn send_message(
        &self,
        system_instruction: Option<&str>,
        contents: &[Content],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

/// A function invocation proposed by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

/// The result of a function invocation, fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

/// One piece of a conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    FunctionCall(FunctionCall),
    FunctionResponse(FunctionResponse),
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
pub struct AiResponse {
    pub parts: Vec<Part>,
    pub usage: TokenUsage,
}

impl AiResponse {
    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Function calls in the order the model listed them.
    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::FunctionCall(fc) => Some(fc.clone()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    pub fn add(&mut self, other: &TokenUsage) {
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_text_skips_function_calls() {
        let response = AiResponse {
            parts: vec![
                Part::Text("Checking ".into()),
                Part::FunctionCall(FunctionCall {
                    name: "get_schedule".into(),
                    args: Default::default(),
                }),
                Part::Text("your schedule".into()),
            ],
            usage: TokenUsage::default(),
        };
        assert_eq!(response.text(), "Checking your schedule");
        assert_eq!(response.function_calls().len(), 1);
    }

    #[test]
    fn function_calls_keep_model_order() {
        let call = |name: &str| {
            Part::FunctionCall(FunctionCall {
                name: name.into(),
                args: Default::default(),
            })
        };
        let response = AiResponse {
            parts: vec![call("b"), call("a"), call("c")],
            usage: TokenUsage::default(),
        };
        let names: Vec<_> = response
            .function_calls()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn function_call_args_default_to_empty() {
        let fc: FunctionCall = serde_json::from_value(json!({"name": "get_pensum"})).unwrap();
        assert!(fc.args.is_empty());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Model).unwrap(), "\"model\"");
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn usage_accumulates() {
        let mut total = TokenUsage::default();
        total.add(&TokenUsage {
            input_tokens: 10,
            output_tokens: 5,
        });
        total.add(&TokenUsage {
            input_tokens: 1,
            output_tokens: 2,
        });
        assert_eq!(total.total_tokens(), 18);
    }
}
