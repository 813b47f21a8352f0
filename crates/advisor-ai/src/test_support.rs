//! Test doubles: a scripted model and a recording scheduling backend.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::backend::{BackendError, ScheduleBackend};
use crate::{AiClient, AiError, AiResponse, Content, FunctionCall, Part, TokenUsage, ToolDefinition};

pub(crate) fn text(t: &str) -> AiResponse {
    AiResponse {
        parts: vec![Part::Text(t.to_string())],
        usage: TokenUsage {
            input_tokens: 1,
            output_tokens: 1,
        },
    }
}

pub(crate) fn call(name: &str, args: Value) -> Part {
    Part::FunctionCall(FunctionCall {
        name: name.to_string(),
        args: args.as_object().cloned().unwrap_or_default(),
    })
}

pub(crate) fn calls(parts: Vec<Part>) -> AiResponse {
    AiResponse {
        parts,
        usage: TokenUsage::default(),
    }
}

/// Replays queued responses in order. Once the queue is empty it repeats
/// `fallback`, or fails if none is set.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    script: Mutex<VecDeque<Result<AiResponse, AiError>>>,
    fallback: Option<AiResponse>,
    requests: Mutex<Vec<Vec<Content>>>,
}

impl ScriptedClient {
    pub(crate) fn new(script: Vec<Result<AiResponse, AiError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub(crate) fn repeating(response: AiResponse) -> Self {
        Self {
            fallback: Some(response),
            ..Default::default()
        }
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Contents sent on the `n`th call.
    pub(crate) fn request(&self, n: usize) -> Vec<Content> {
        self.requests.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl AiClient for ScriptedClient {
    async fn send_message(
        &self,
        _system_instruction: Option<&str>,
        contents: &[Content],
        _tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError> {
        self.requests.lock().unwrap().push(contents.to_vec());
        let next = self.script.lock().unwrap().pop_front();
        match (next, &self.fallback) {
            (Some(result), _) => result,
            (None, Some(fallback)) => Ok(fallback.clone()),
            (None, None) => Err(AiError::ApiError("script exhausted".into())),
        }
    }
}

/// One recorded backend call: operation name and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BackendCall {
    pub op: &'static str,
    pub args: Vec<String>,
}

/// Records calls and answers `{"op": ..., "args": [...]}` unless a failure
/// was registered for the operation. Operations given a delay sleep on the
/// tokio clock before answering.
#[derive(Default)]
pub(crate) struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
    completed: Mutex<Vec<&'static str>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
    failures: Mutex<HashMap<&'static str, BackendError>>,
}

impl RecordingBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn fail(&self, op: &'static str, error: BackendError) {
        self.failures.lock().unwrap().insert(op, error);
    }

    pub(crate) fn delay(&self, op: &'static str, by: Duration) {
        self.delays.lock().unwrap().insert(op, by);
    }

    /// Calls in the order they were started.
    pub(crate) fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Operation names in the order they finished.
    pub(crate) fn completed(&self) -> Vec<&'static str> {
        self.completed.lock().unwrap().clone()
    }

    async fn record(&self, op: &'static str, args: &[&str]) -> Result<Value, BackendError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.calls.lock().unwrap().push(BackendCall {
            op,
            args: args.clone(),
        });
        let delay = self.delays.lock().unwrap().get(op).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(op);
        if let Some(err) = self.failures.lock().unwrap().remove(op) {
            return Err(err);
        }
        Ok(json!({ "op": op, "args": args }))
    }
}

#[async_trait]
impl ScheduleBackend for RecordingBackend {
    async fn get_pensum(&self, credential: &str) -> Result<Value, BackendError> {
        self.record("get_pensum", &[credential]).await
    }

    async fn get_schedule(
        &self,
        credential: &str,
        schedule_id: &str,
    ) -> Result<Value, BackendError> {
        self.record("get_schedule", &[credential, schedule_id]).await
    }

    async fn add_group(
        &self,
        credential: &str,
        schedule_id: &str,
        group_code: &str,
    ) -> Result<Value, BackendError> {
        self.record("add_group", &[credential, schedule_id, group_code]).await
    }

    async fn delete_group(
        &self,
        credential: &str,
        schedule_id: &str,
        group_code: &str,
    ) -> Result<Value, BackendError> {
        self.record("delete_group", &[credential, schedule_id, group_code]).await
    }

    async fn change_group(
        &self,
        credential: &str,
        schedule_id: &str,
        old_group_code: &str,
        new_group_code: &str,
    ) -> Result<Value, BackendError> {
        self.record(
            "change_group",
            &[credential, schedule_id, old_group_code, new_group_code],
        )
        .await
    }
}

pub(crate) fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
