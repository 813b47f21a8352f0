use serde::{Deserialize, Serialize};

/// Downstream scheduling backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL; endpoint paths are appended verbatim, so keep the
    /// trailing slash.
    pub url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8081/".into(),
        }
    }
}
