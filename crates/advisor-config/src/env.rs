//! Environment variable overrides.
//!
//! Applied after the TOML file is parsed so deployment secrets never need
//! to live in the file.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::schema::AdvisorConfig;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const MODEL_NAME: &str = "MODEL_NAME";
pub const SYSTEM_PROMPT_FILE: &str = "SYSTEM_PROMPT_FILE";
pub const BACKEND_URL: &str = "BACKEND_URL";
pub const REDIS_URL: &str = "REDIS_URL";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";

/// Overwrite config fields from `lookup`, which maps a variable name to
/// its value. Empty values are ignored.
pub fn apply_overrides(config: &mut AdvisorConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(GEMINI_API_KEY) {
        debug!("model api key taken from {GEMINI_API_KEY}");
        config.model.api_key = key;
    }
    if let Some(name) = get(MODEL_NAME) {
        config.model.name = name;
    }
    if let Some(path) = get(SYSTEM_PROMPT_FILE) {
        config.model.system_prompt_file = Some(PathBuf::from(path));
    }
    if let Some(url) = get(BACKEND_URL) {
        config.backend.url = url;
    }
    if let Some(url) = get(REDIS_URL) {
        config.session.redis_url = Some(url);
    }
    if let Some(host) = get(HOST) {
        config.server.host = host;
    }
    if let Some(port) = get(PORT) {
        match port.trim().parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(e) => warn!("ignoring {PORT}={port}: {e}"),
        }
    }
}
