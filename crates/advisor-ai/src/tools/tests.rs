use std::sync::Arc;

use serde_json::{json, Value};

use advisor_common::SessionId;

use super::*;
use crate::backend::BackendError;
use crate::test_support::{args, RecordingBackend};
use crate::FunctionCall;

fn ctx() -> ToolContext {
    ToolContext::new("token-123", SessionId::from("s1"))
}

fn tool_spec(name: &str) -> ToolSpec {
    schedule_tool_specs()
        .into_iter()
        .find(|(spec, _)| spec.name == name)
        .map(|(spec, _)| spec)
        .unwrap()
}

fn fc(name: &str, a: Value) -> FunctionCall {
    FunctionCall {
        name: name.into(),
        args: args(a),
    }
}

// -- binding --

#[test]
fn bind_injects_context_values() {
    let bound = tool_spec("get_schedule").bind(&ctx(), &args(json!({}))).unwrap();
    assert_eq!(bound["jwt"], "token-123");
    assert_eq!(bound["schedule_id"], "s1");
}

#[test]
fn bind_context_wins_over_model_value() {
    let bound = tool_spec("add_group")
        .bind(
            &ctx(),
            &args(json!({"jwt": "forged", "schedule_id": "other", "group_code": "G1"})),
        )
        .unwrap();
    assert_eq!(bound["jwt"], "token-123");
    assert_eq!(bound["schedule_id"], "s1");
    assert_eq!(bound["group_code"], "G1");
}

#[test]
fn bind_missing_model_parameter() {
    let err = tool_spec("add_group").bind(&ctx(), &args(json!({}))).unwrap_err();
    assert_eq!(err, ToolError::MissingParameter("group_code".into()));
    assert_eq!(err.to_string(), "missing required parameter: group_code");
}

#[test]
fn bind_null_counts_as_missing() {
    let err = tool_spec("delete_group")
        .bind(&ctx(), &args(json!({"group_code": null})))
        .unwrap_err();
    assert_eq!(err, ToolError::MissingParameter("group_code".into()));
}

#[test]
fn bind_coerces_number_to_string() {
    let bound = tool_spec("add_group")
        .bind(&ctx(), &args(json!({"group_code": 1155503})))
        .unwrap();
    assert_eq!(bound["group_code"], "1155503");
}

#[test]
fn bind_rejects_uncoercible_value() {
    let err = tool_spec("add_group")
        .bind(&ctx(), &args(json!({"group_code": ["A", "B"]})))
        .unwrap_err();
    assert_eq!(
        err,
        ToolError::InvalidType {
            name: "group_code".into(),
            expected: ParamType::String,
        }
    );
}

#[test]
fn bind_drops_undeclared_keys() {
    let bound = tool_spec("get_pensum")
        .bind(&ctx(), &args(json!({"verbose": true})))
        .unwrap();
    assert!(!bound.contains_key("verbose"));
    // get_pensum declares only the credential.
    assert!(!bound.contains_key("schedule_id"));
    assert_eq!(bound.len(), 1);
}

#[test]
fn coerce_integer_from_string_and_whole_float() {
    assert_eq!(ParamType::Integer.coerce(json!("42")), Some(json!(42)));
    assert_eq!(ParamType::Integer.coerce(json!(3.0)), Some(json!(3)));
    assert_eq!(ParamType::Integer.coerce(json!(3.5)), None);
    assert_eq!(ParamType::Boolean.coerce(json!("true")), Some(json!(true)));
    assert_eq!(ParamType::Boolean.coerce(json!(1)), None);
}

// -- declarations --

#[test]
fn definitions_hide_context_parameters() {
    let def = tool_spec("change_group").definition();
    let props = def.parameters["properties"].as_object().unwrap();
    assert!(props.contains_key("old_group_code"));
    assert!(props.contains_key("new_group_code"));
    assert!(!props.contains_key("jwt"));
    assert!(!props.contains_key("schedule_id"));
    assert_eq!(
        def.parameters["required"],
        json!(["old_group_code", "new_group_code"])
    );
}

#[test]
fn parameterless_tool_has_no_required_list() {
    let def = tool_spec("get_pensum").definition();
    assert!(def.parameters.get("required").is_none());
    let gemini = to_gemini_tool(&def);
    assert!(gemini.get("parameters").is_none());
    assert_eq!(gemini["name"], "get_pensum");
}

#[test]
fn registry_lists_tools_in_order() {
    let registry = schedule_tools(RecordingBackend::new());
    let names: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        ["get_pensum", "get_schedule", "add_group", "delete_group", "change_group"]
    );
    assert!(registry.contains("add_group"));
    assert!(!registry.contains("drop_table"));
}

#[test]
fn register_replaces_same_name() {
    let backend = RecordingBackend::new();
    let mut registry = schedule_tools(backend.clone());
    let (spec, op) = schedule_tool_specs().remove(0);
    registry.register(Arc::new(BackendTool::new(spec, op, backend)));
    assert_eq!(registry.len(), 5);
}

// -- invocation --

#[tokio::test]
async fn invoke_forwards_credential_and_schedule_id() {
    let backend = RecordingBackend::new();
    let registry = schedule_tools(backend.clone());

    let outcome = registry.invoke(&fc("get_pensum", json!({})), &ctx()).await;
    assert!(!outcome.is_error());

    let outcome = registry
        .invoke(&fc("add_group", json!({"group_code": "1155503-A"})), &ctx())
        .await;
    assert!(!outcome.is_error());

    let calls = backend.calls();
    assert_eq!(calls[0].op, "get_pensum");
    assert_eq!(calls[0].args, ["token-123"]);
    assert_eq!(calls[1].op, "add_group");
    assert_eq!(calls[1].args, ["token-123", "s1", "1155503-A"]);
}

#[tokio::test]
async fn invoke_unknown_tool_is_error_outcome() {
    let backend = RecordingBackend::new();
    let registry = schedule_tools(backend.clone());
    let outcome = registry.invoke(&fc("drop_table", json!({})), &ctx()).await;
    assert_eq!(
        outcome.result.clone().unwrap_err(),
        ToolError::UnknownTool("drop_table".into())
    );
    assert_eq!(
        outcome.into_response().response,
        json!({"error": "unknown tool: drop_table"})
    );
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn invoke_missing_parameter_never_reaches_backend() {
    let backend = RecordingBackend::new();
    let registry = schedule_tools(backend.clone());
    let outcome = registry.invoke(&fc("add_group", json!({})), &ctx()).await;
    let response = outcome.into_response();
    assert_eq!(response.name, "add_group");
    assert_eq!(
        response.response,
        json!({"error": "missing required parameter: group_code"})
    );
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn backend_status_becomes_result_text() {
    let backend = RecordingBackend::new();
    backend.fail(
        "add_group",
        BackendError::Status {
            status: 409,
            body: "group is full".into(),
        },
    );
    let registry = schedule_tools(backend.clone());
    let outcome = registry
        .invoke(&fc("add_group", json!({"group_code": "FULL-A"})), &ctx())
        .await;
    assert!(!outcome.is_error());
    assert_eq!(
        outcome.into_response().response,
        json!({"content": "group is full"})
    );
}

#[tokio::test]
async fn backend_network_failure_is_error_outcome() {
    let backend = RecordingBackend::new();
    backend.fail("get_schedule", BackendError::Network("connection refused".into()));
    let registry = schedule_tools(backend);
    let outcome = registry.invoke(&fc("get_schedule", json!({})), &ctx()).await;
    let response = outcome.into_response();
    assert_eq!(
        response.response,
        json!({"error": "backend unreachable: connection refused"})
    );
}

#[tokio::test]
async fn success_wraps_backend_payload_as_content() {
    let registry = schedule_tools(RecordingBackend::new());
    let response = registry
        .invoke(&fc("get_schedule", json!({})), &ctx())
        .await
        .into_response();
    assert_eq!(response.response["content"]["op"], "get_schedule");
    assert_eq!(response.response["content"]["args"], json!(["token-123", "s1"]));
}

#[test]
fn context_debug_redacts_credential() {
    let debug = format!("{:?}", ctx());
    assert!(!debug.contains("token-123"));
    assert!(debug.contains("REDACTED"));
}
