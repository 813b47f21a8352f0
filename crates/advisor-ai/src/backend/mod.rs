//! Downstream scheduling backend.
//!
//! Five operations on a student's curriculum and draft schedule, each
//! authenticated with the caller's forwarded bearer credential.

mod http;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpScheduleBackend;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Non-2xx response. The body is kept verbatim so it can be shown to
    /// the model.
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend unreachable: {0}")]
    Network(String),
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Full curriculum with the student's progress.
    async fn get_pensum(&self, credential: &str) -> Result<Value, BackendError>;

    /// The draft schedule.
    async fn get_schedule(&self, credential: &str, schedule_id: &str)
        -> Result<Value, BackendError>;

    async fn add_group(
        &self,
        credential: &str,
        schedule_id: &str,
        group_code: &str,
    ) -> Result<Value, BackendError>;

    async fn delete_group(
        &self,
        credential: &str,
        schedule_id: &str,
        group_code: &str,
    ) -> Result<Value, BackendError>;

    async fn change_group(
        &self,
        credential: &str,
        schedule_id: &str,
        old_group_code: &str,
        new_group_code: &str,
    ) -> Result<Value, BackendError>;
}
