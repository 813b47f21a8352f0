//! Tools the model can call to read and edit the student's schedule.
//!
//! Each tool declares a static parameter schema. Arguments proposed by the
//! model are merged with the per-request [`ToolContext`], validated and
//! coerced against that schema, and only then forwarded to the backend.

mod backend_tool;
mod definitions;
mod registry;
mod schema;

#[cfg(test)]
mod tests;

use std::fmt;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use advisor_common::SessionId;

use crate::{FunctionResponse, ToolDefinition};

pub use backend_tool::{BackendTool, Operation};
pub use definitions::{schedule_tool_specs, schedule_tools};
pub use registry::ToolRegistry;
pub use schema::{ParamSource, ParamSpec, ParamType, ToolSpec};

/// Context key carrying the forwarded bearer credential.
pub const CREDENTIAL_KEY: &str = "jwt";
/// Context key carrying the schedule correlation id.
pub const SCHEDULE_ID_KEY: &str = "schedule_id";

/// Per-request data injected into every tool call. Never persisted.
#[derive(Clone)]
pub struct ToolContext {
    pub credential: String,
    pub schedule_id: SessionId,
}

impl ToolContext {
    pub fn new(credential: impl Into<String>, schedule_id: SessionId) -> Self {
        Self {
            credential: credential.into(),
            schedule_id,
        }
    }

    /// Context values as tool arguments.
    pub(crate) fn fields(&self) -> [(&'static str, Value); 2] {
        [
            (CREDENTIAL_KEY, Value::String(self.credential.clone())),
            (
                SCHEDULE_ID_KEY,
                Value::String(self.schedule_id.as_str().to_string()),
            ),
        ]
    }
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext")
            .field("credential", &"[REDACTED]")
            .field("schedule_id", &self.schedule_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("missing required parameter: {0}")]
    MissingParameter(String),
    #[error("invalid type for parameter {name}, expected {expected}")]
    InvalidType { name: String, expected: ParamType },
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("{0}")]
    Backend(String),
}

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> &ToolSpec;

    async fn invoke(&self, ctx: &ToolContext, args: &Map<String, Value>)
        -> Result<Value, ToolError>;
}

/// Result of one tool call within a round.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub name: String,
    pub result: Result<Value, ToolError>,
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    /// `{"content": ...}` on success, `{"error": "..."}` on failure.
    pub fn into_response(self) -> FunctionResponse {
        let response = match self.result {
            Ok(content) => json!({ "content": content }),
            Err(e) => json!({ "error": e.to_string() }),
        };
        FunctionResponse {
            name: self.name,
            response,
        }
    }
}

/// Convert a tool definition to the Gemini API format.
///
/// Parameterless tools are declared without a `parameters` object.
pub fn to_gemini_tool(tool: &ToolDefinition) -> Value {
    let has_params = tool.parameters["properties"]
        .as_object()
        .is_some_and(|p| !p.is_empty());
    if has_params {
        json!({
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        })
    } else {
        json!({
            "name": tool.name,
            "description": tool.description,
        })
    }
}
