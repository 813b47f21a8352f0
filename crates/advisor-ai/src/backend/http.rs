//! reqwest implementation of [`ScheduleBackend`].

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::{json, Value};
use tracing::debug;

use super::{BackendError, ScheduleBackend};

/// HTTP client for the scheduling REST backend.
pub struct HttpScheduleBackend {
    base: Url,
    http: reqwest::Client,
}

impl HttpScheduleBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base = Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { base, http })
    }

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        credential: &str,
        body: Option<Value>,
    ) -> Result<Value, BackendError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "backend request");

        let mut request = self.http.request(method, url).bearer_auth(credential);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // Non-JSON success bodies are passed through as text.
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

#[async_trait]
impl ScheduleBackend for HttpScheduleBackend {
    async fn get_pensum(&self, credential: &str) -> Result<Value, BackendError> {
        self.request(Method::GET, &["pensum"], credential, None).await
    }

    async fn get_schedule(
        &self,
        credential: &str,
        schedule_id: &str,
    ) -> Result<Value, BackendError> {
        self.request(Method::GET, &["schedule", schedule_id], credential, None)
            .await
    }

    async fn add_group(
        &self,
        credential: &str,
        schedule_id: &str,
        group_code: &str,
    ) -> Result<Value, BackendError> {
        self.request(
            Method::POST,
            &["schedule", schedule_id, "group", group_code],
            credential,
            None,
        )
        .await
    }

    async fn delete_group(
        &self,
        credential: &str,
        schedule_id: &str,
        group_code: &str,
    ) -> Result<Value, BackendError> {
        self.request(
            Method::DELETE,
            &["schedule", schedule_id, "group", group_code],
            credential,
            None,
        )
        .await
    }

    async fn change_group(
        &self,
        credential: &str,
        schedule_id: &str,
        old_group_code: &str,
        new_group_code: &str,
    ) -> Result<Value, BackendError> {
        self.request(
            Method::PUT,
            &["schedule", schedule_id, "group", old_group_code],
            credential,
            Some(json!({ "newCode": new_group_code })),
        )
        .await
    }
}
