//! Configuration schema types for the advisor service.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod backend;
mod chat;
mod model;
mod server;
mod session;

pub use backend::*;
pub use chat::*;
pub use model::*;
pub use server::*;
pub use session::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub model: ModelConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    pub chat: ChatConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}
