//! Console configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ConsoleConfig;
use crate::config::validation::{validate_console_config, ValidationError};

/// Overrides the admin base URL.
pub const ENV_ADMIN_URL: &str = "SETTINGS_ADMIN_URL";
/// Overrides the admin API key.
pub const ENV_ADMIN_KEY: &str = "SETTINGS_ADMIN_KEY";
/// Overrides the translation language.
pub const ENV_LANGUAGE: &str = "SETTINGS_LANGUAGE";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load, override, and validate console configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Defaults plus environment overrides, for running without a config file.
pub fn default_config() -> Result<ConsoleConfig, ConfigError> {
    finish(ConsoleConfig::default(), |key| std::env::var(key).ok())
}

/// Parse configuration text, resolving overrides through `env`.
pub fn parse_config<E>(content: &str, env: E) -> Result<ConsoleConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    let config: ConsoleConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    finish(config, env)
}

/// Apply command-line admin overrides on top of a loaded config and revalidate.
///
/// Precedence is command line, then environment, then file.
pub fn with_admin_overrides(
    mut config: ConsoleConfig,
    base_url: Option<String>,
    api_key: Option<String>,
) -> Result<ConsoleConfig, ConfigError> {
    if let Some(url) = base_url {
        config.admin.base_url = url;
    }
    if let Some(key) = api_key {
        config.admin.api_key = key;
    }
    validate_console_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn finish<E>(mut config: ConsoleConfig, env: E) -> Result<ConsoleConfig, ConfigError>
where
    E: Fn(&str) -> Option<String>,
{
    apply_environment_overrides(&mut config, env);
    validate_console_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn apply_environment_overrides<E>(config: &mut ConsoleConfig, env: E)
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_ADMIN_URL).filter(|v| !v.is_empty()) {
        config.admin.base_url = url;
    }
    if let Some(key) = env(ENV_ADMIN_KEY).filter(|v| !v.is_empty()) {
        config.admin.api_key = key;
    }
    if let Some(language) = env(ENV_LANGUAGE).filter(|v| !v.is_empty()) {
        config.i18n.language = language;
    }
}
