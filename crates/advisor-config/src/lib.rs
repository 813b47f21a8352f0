//! Advisor configuration system.
//!
//! TOML configuration with environment overrides and validation. Every
//! section uses `serde(default)` so partial files work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use advisor_config::load_config;
//!
//! let config = load_config(None).expect("failed to load config");
//! println!("model: {}", config.model.name);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AdvisorConfig, BackendConfig, ChatConfig, LoggingConfig, ModelConfig, ServerConfig,
    SessionConfig,
};

use std::path::Path;

use advisor_common::ConfigError;

/// Load config from `path` (or the platform default), apply environment
/// overrides from the process environment, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<AdvisorConfig, ConfigError> {
    let mut config = match path {
        Some(p) => toml_loader::load_from_path(p)?,
        None => toml_loader::load_default()?,
    };

    env::apply_overrides(&mut config, |key| std::env::var(key).ok());
    validation::validate(&config)?;
    Ok(config)
}

/// Fail unless a model API key is configured.
///
/// Kept apart from [`validation::validate`] so config files can be checked
/// without secrets present; the server calls this before accepting traffic.
pub fn require_model_credential(config: &AdvisorConfig) -> Result<(), ConfigError> {
    if config.model.api_key.trim().is_empty() {
        return Err(ConfigError::MissingCredential(format!(
            "model.api_key is not set (export {})",
            env::GEMINI_API_KEY
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lacks_credential() {
        let config = AdvisorConfig::default();
        let err = require_model_credential(&config).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn whitespace_key_counts_as_missing() {
        let mut config = AdvisorConfig::default();
        config.model.api_key = "   ".into();
        assert!(require_model_credential(&config).is_err());
    }

    #[test]
    fn configured_key_passes() {
        let mut config = AdvisorConfig::default();
        config.model.api_key = "secret".into();
        assert!(require_model_credential(&config).is_ok());
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\nmax_rounds = 7\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.chat.max_rounds, 7);
        assert_eq!(config.chat.max_stream_rounds, 5);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chat]\nmax_rounds = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
