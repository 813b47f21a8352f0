use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Hosted model settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// API key for the Generative Language API. Usually supplied through
    /// `GEMINI_API_KEY` rather than the file.
    pub api_key: String,
    pub name: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// File holding the system instruction. The built-in prompt is used
    /// when unset.
    pub system_prompt_file: Option<PathBuf>,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"[REDACTED]")
            .field("name", &self.name)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("system_prompt_file", &self.system_prompt_file)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            name: "gemini-1.5-flash".into(),
            max_tokens: 4096,
            temperature: 0.7,
            system_prompt_file: None,
        }
    }
}
