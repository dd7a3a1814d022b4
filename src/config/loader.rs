//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ChatConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.api_key`.
pub const ENV_API_KEY: &str = "BLOCKSCAN_CHAT_API_KEY";

/// Environment variable overriding `api.api_url`.
pub const ENV_API_URL: &str = "BLOCKSCAN_CHAT_API_URL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
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

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load the optional file, apply environment overrides, then validate.
pub fn load_config_with_env(path: Option<&Path>) -> Result<ChatConfig, ConfigError> {
    load_config_with_overrides(path, |_| {})
}

/// Like [`load_config_with_env`], with `overrides` applied after the
/// environment and before validation.
pub fn load_config_with_overrides<F>(
    path: Option<&Path>,
    overrides: F,
) -> Result<ChatConfig, ConfigError>
where
    F: FnOnce(&mut ChatConfig),
{
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ChatConfig::default(),
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Overlay non-empty values from `lookup` onto the API section.
pub fn apply_overrides<F>(config: &mut ChatConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.is_empty()) {
        config.api.api_key = key;
    }
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
        config.api.api_url = url;
    }
}

fn read_config(path: &Path) -> Result<ChatConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
