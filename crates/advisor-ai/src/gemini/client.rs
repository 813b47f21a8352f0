//! Gemini API client struct, request building, and response parsing.

use serde_json::{json, Value};

use crate::tools::to_gemini_tool;
use crate::{AiError, AiResponse, Content, FunctionCall, Part, TokenUsage, ToolDefinition};

use super::config::GeminiConfig;

/// Gemini API client.
pub struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Build the JSON request body for the Gemini API.
    pub(crate) fn build_request_body(
        &self,
        system_instruction: Option<&str>,
        contents: &[Content],
        tools: &[ToolDefinition],
    ) -> Value {
        let contents: Vec<Value> = contents
            .iter()
            .map(|c| {
                let parts: Vec<Value> = c.parts.iter().map(part_to_json).collect();
                json!({ "role": c.role.as_str(), "parts": parts })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": self.config.max_tokens,
                "temperature": self.config.temperature,
            }
        });

        if let Some(system) = system_instruction {
            body["systemInstruction"] = json!({
                "parts": [{ "text": system }]
            });
        }

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_gemini_tool).collect();
            body["tools"] = json!([{
                "functionDeclarations": tool_defs
            }]);
        }

        body
    }

    /// Parse a Gemini response. Only the first candidate is used.
    pub(crate) fn parse_response(&self, json: Value) -> Result<AiResponse, AiError> {
        let candidates = json["candidates"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no candidates in response".to_string()))?;

        let first = candidates
            .first()
            .ok_or_else(|| AiError::ParseError("empty candidates".to_string()))?;

        let mut parts = Vec::new();
        for part in first["content"]["parts"].as_array().into_iter().flatten() {
            if let Some(text) = part["text"].as_str() {
                parts.push(Part::Text(text.to_string()));
            }
            if let Some(fc) = part.get("functionCall") {
                let name = fc["name"]
                    .as_str()
                    .ok_or_else(|| AiError::ParseError("functionCall without name".to_string()))?;
                parts.push(Part::FunctionCall(FunctionCall {
                    name: name.to_string(),
                    args: fc["args"].as_object().cloned().unwrap_or_default(),
                }));
            }
        }

        let usage = TokenUsage {
            input_tokens: json["usageMetadata"]["promptTokenCount"]
                .as_u64()
                .unwrap_or(0),
            output_tokens: json["usageMetadata"]["candidatesTokenCount"]
                .as_u64()
                .unwrap_or(0),
        };

        Ok(AiResponse { parts, usage })
    }
}

fn part_to_json(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::FunctionCall(fc) => json!({
            "functionCall": { "name": fc.name, "args": fc.args }
        }),
        Part::FunctionResponse(fr) => json!({
            "functionResponse": { "name": fr.name, "response": fr.response }
        }),
    }
}
