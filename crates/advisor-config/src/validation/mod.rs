//! Full configuration validation.
//!
//! Each check pushes a message onto a shared list; all violations are
//! reported together in a single `ConfigError`.

mod helpers;


use crate::schema::AdvisorConfig;
use advisor_common::ConfigError;

use helpers::{validate_non_empty, validate_range, validate_range_f64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &AdvisorConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_non_empty(&mut errors, "model.name", &config.model.name);
    validate_range(&mut errors, "model.max_tokens", config.model.max_tokens, 1, 65_536);
    validate_range_f64(&mut errors, "model.temperature", config.model.temperature, 0.0, 2.0);

    validate_non_empty(&mut errors, "backend.url", &config.backend.url);
    let url = config.backend.url.trim();
    if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("backend.url = {url} must be an http(s) URL"));
    }

    validate_range(&mut errors, "session.ttl_hours", config.session.ttl_hours, 1, 720);
    validate_range(&mut errors, "chat.max_rounds", config.chat.max_rounds, 1, 50);
    validate_range(
        &mut errors,
        "chat.max_stream_rounds",
        config.chat.max_stream_rounds,
        1,
        50,
    );

    validate_non_empty(&mut errors, "server.host", &config.server.host);
    if config.server.port == 0 {
        errors.push("server.port must be non-zero".into());
    }
    validate_non_empty(&mut errors, "logging.level", &config.logging.level);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
