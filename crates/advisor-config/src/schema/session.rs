use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Conversation history retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// History lifetime, counted from the last write.
    pub ttl_hours: u32,
    /// Redis holding histories (`redis://host:6379/0`). Histories are kept
    /// in process memory when unset.
    pub redis_url: Option<String>,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.ttl_hours) * 3600)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            redis_url: None,
        }
    }
}
