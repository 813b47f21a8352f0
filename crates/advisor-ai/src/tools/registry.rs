//! Name-indexed tool table.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{FunctionCall, ToolDefinition};

use super::{Tool, ToolContext, ToolError, ToolOutcome};

/// Maps tool names to tools, keeping registration order for declarations.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.spec().name;
        match self.by_name.get(name) {
            Some(&idx) => self.tools[idx] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&idx| &self.tools[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations for the model, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.spec().definition()).collect()
    }

    /// Run one model-proposed call. Never fails: unknown names and tool
    /// errors come back as an error outcome.
    pub async fn invoke(&self, call: &FunctionCall, ctx: &ToolContext) -> ToolOutcome {
        let result = match self.get(&call.name) {
            Some(tool) => {
                debug!(tool = %call.name, "executing tool");
                tool.invoke(ctx, &call.args).await
            }
            None => {
                warn!(tool = %call.name, "model requested an unregistered tool");
                Err(ToolError::UnknownTool(call.name.clone()))
            }
        };

        if let Err(ref e) = result {
            warn!(tool = %call.name, error = %e, "tool call failed");
        }

        ToolOutcome {
            name: call.name.clone(),
            result,
        }
    }
}
