//! Adapter exposing scheduling backend operations as tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::backend::{BackendError, ScheduleBackend};

use super::{Tool, ToolContext, ToolError, ToolSpec, CREDENTIAL_KEY, SCHEDULE_ID_KEY};

/// Backend operation a tool forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetPensum,
    GetSchedule,
    AddGroup,
    DeleteGroup,
    ChangeGroup,
}

pub struct BackendTool {
    spec: ToolSpec,
    operation: Operation,
    backend: Arc<dyn ScheduleBackend>,
}

impl BackendTool {
    pub fn new(spec: ToolSpec, operation: Operation, backend: Arc<dyn ScheduleBackend>) -> Self {
        Self {
            spec,
            operation,
            backend,
        }
    }

    async fn dispatch(&self, args: &Map<String, Value>) -> Result<Value, BackendError> {
        let arg = |name: &'static str| string_arg(args, name);
        let credential = arg(CREDENTIAL_KEY);
        let schedule_id = arg(SCHEDULE_ID_KEY);

        match self.operation {
            Operation::GetPensum => self.backend.get_pensum(credential).await,
            Operation::GetSchedule => self.backend.get_schedule(credential, schedule_id).await,
            Operation::AddGroup => {
                self.backend
                    .add_group(credential, schedule_id, arg("group_code"))
                    .await
            }
            Operation::DeleteGroup => {
                self.backend
                    .delete_group(credential, schedule_id, arg("group_code"))
                    .await
            }
            Operation::ChangeGroup => {
                self.backend
                    .change_group(
                        credential,
                        schedule_id,
                        arg("old_group_code"),
                        arg("new_group_code"),
                    )
                    .await
            }
        }
    }
}

/// `bind` guarantees declared parameters are present as strings; an absent
/// one reads as empty here.
fn string_arg<'a>(args: &'a Map<String, Value>, name: &str) -> &'a str {
    args.get(name).and_then(Value::as_str).unwrap_or_default()
}

#[async_trait]
impl Tool for BackendTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(
        &self,
        ctx: &ToolContext,
        args: &Map<String, Value>,
    ) -> Result<Value, ToolError> {
        let bound = self.spec.bind(ctx, args)?;
        debug!(tool = self.spec.name, operation = ?self.operation, "calling backend");

        match self.dispatch(&bound).await {
            Ok(value) => Ok(value),
            // The model reads backend error text as part of the conversation.
            Err(BackendError::Status { status, body }) => {
                warn!(tool = self.spec.name, status, "backend rejected tool call");
                Ok(Value::String(body))
            }
            Err(e) => Err(ToolError::Backend(e.to_string())),
        }
    }
}
