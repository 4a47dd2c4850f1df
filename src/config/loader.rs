//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::EngineConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(
            r#"
            [blockchain]
            rpc_url = "https://sepolia.base.org"
            chain_id = 84532

            [wait]
            interval_ms = 500
            max_error_retries = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.blockchain.rpc_url, "https://sepolia.base.org");
        assert_eq!(config.wait.interval_ms, 500);
        assert_eq!(config.wait.max_error_retries, 2);
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        let err = parse_config("[wait]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("wait.timeout_secs"));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = parse_config("[wait\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
