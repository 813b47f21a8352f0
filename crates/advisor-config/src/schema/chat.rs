use serde::{Deserialize, Serialize};

/// Tool-calling loop limits.
///
/// The batch and streaming ceilings are separate settings on purpose;
/// they are not unified.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Round ceiling for `send`.
    pub max_rounds: u32,
    /// Round ceiling for `send_stream`.
    pub max_stream_rounds: u32,
    /// Serialize concurrent exchanges on the same session id.
    pub serialize_sessions: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            max_stream_rounds: 5,
            serialize_sessions: true,
        }
    }
}
