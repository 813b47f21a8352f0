use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::{AiClient, AiError, AiResponse, Content, ToolDefinition};

use super::client::GeminiClient;

/// 429 is retryable by the caller; any other failure status carries the
/// response body.
fn status_error(status: StatusCode, body: String) -> AiError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        AiError::RateLimited
    } else {
        AiError::ApiError(format!("HTTP {status}: {body}"))
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn send_message(
        &self,
        system_instruction: Option<&str>,
        contents: &[Content],
        tools: &[ToolDefinition],
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(system_instruction, contents, tools);
        debug!(
            model = %self.config.model,
            turns = contents.len(),
            tools = tools.len(),
            "generateContent"
        );

        let response = self
            .http
            .post(self.api_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, text));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;
        let parsed = self.parse_response(json)?;
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "generateContent done"
        );
        Ok(parsed)
    }
}
