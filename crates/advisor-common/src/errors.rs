use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("missing credential: {0}")]
    MissingCredential(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("ai error: {0}")]
    Ai(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("chat.max_rounds = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: chat.max_rounds = 0"
        );

        let err = ConfigError::MissingCredential("GEMINI_API_KEY".into());
        assert_eq!(err.to_string(), "missing credential: GEMINI_API_KEY");
    }

    #[test]
    fn advisor_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: AdvisorError = config_err.into();
        assert!(matches!(err, AdvisorError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn advisor_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: AdvisorError = io_err.into();
        assert!(matches!(err, AdvisorError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }

    #[test]
    fn advisor_error_other_variants() {
        let err = AdvisorError::Network("timeout".into());
        assert_eq!(err.to_string(), "network error: timeout");

        let err = AdvisorError::Ai("model unavailable".into());
        assert_eq!(err.to_string(), "ai error: model unavailable");
    }
}
