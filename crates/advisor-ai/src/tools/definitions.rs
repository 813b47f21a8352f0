//! The scheduling tools exposed to the model.

use std::sync::Arc;

use crate::backend::ScheduleBackend;

use super::{
    BackendTool, Operation, ParamSpec, ParamType, ToolRegistry, ToolSpec, CREDENTIAL_KEY,
    SCHEDULE_ID_KEY,
};

/// Specs for the five scheduling tools, paired with their backend operation.
pub fn schedule_tool_specs() -> Vec<(ToolSpec, Operation)> {
    vec![
        (
            ToolSpec {
                name: "get_pensum",
                description: "Retrieve the complete curriculum, including all available courses \
                              and subjects, along with the user's progress.",
                params: vec![ParamSpec::context(CREDENTIAL_KEY)],
            },
            Operation::GetPensum,
        ),
        (
            ToolSpec {
                name: "get_schedule",
                description: "Retrieve the user's current draft schedule, including all added \
                              subjects and groups.",
                params: vec![
                    ParamSpec::context(CREDENTIAL_KEY),
                    ParamSpec::context(SCHEDULE_ID_KEY),
                ],
            },
            Operation::GetSchedule,
        ),
        (
            ToolSpec {
                name: "add_group",
                description: "Adds a specific subject group to the user's draft schedule. \
                              Returns the updated schedule.",
                params: vec![
                    ParamSpec::context(CREDENTIAL_KEY),
                    ParamSpec::context(SCHEDULE_ID_KEY),
                    ParamSpec::model(
                        "group_code",
                        ParamType::String,
                        "The unique code of the group to add (e.g., '1155503-A').",
                    ),
                ],
            },
            Operation::AddGroup,
        ),
        (
            ToolSpec {
                name: "delete_group",
                description: "Remove a group from the schedule draft. This also removes the \
                              associated subject. Returns the updated schedule.",
                params: vec![
                    ParamSpec::context(CREDENTIAL_KEY),
                    ParamSpec::context(SCHEDULE_ID_KEY),
                    ParamSpec::model(
                        "group_code",
                        ParamType::String,
                        "The unique code of the group to delete (e.g., '1155501-A').",
                    ),
                ],
            },
            Operation::DeleteGroup,
        ),
        (
            ToolSpec {
                name: "change_group",
                description: "Change a group in the schedule draft to another group. Returns the \
                              updated schedule.",
                params: vec![
                    ParamSpec::context(CREDENTIAL_KEY),
                    ParamSpec::context(SCHEDULE_ID_KEY),
                    ParamSpec::model(
                        "old_group_code",
                        ParamType::String,
                        "The code of the current group to replace (e.g., '1155501-A').",
                    ),
                    ParamSpec::model(
                        "new_group_code",
                        ParamType::String,
                        "The code of the new group to assign (e.g., '1155501-B').",
                    ),
                ],
            },
            Operation::ChangeGroup,
        ),
    ]
}

/// Registry holding every scheduling tool, backed by `backend`.
pub fn schedule_tools(backend: Arc<dyn ScheduleBackend>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for (spec, operation) in schedule_tool_specs() {
        registry.register(Arc::new(BackendTool::new(
            spec,
            operation,
            Arc::clone(&backend),
        )));
    }
    registry
}
