//! Configuration schema definitions.
//!
//! Two families of types live here:
//! - `Configuration`, the settings document exchanged with the admin API.
//!   Field names are the wire names the backend expects.
//! - `ConsoleConfig`, the configuration of this console (where the admin API
//!   lives, how long to wait for the page to become ready, which language).

use serde::{Deserialize, Serialize};

/// Settings document sent to `PUT /admin/api/settings`.
///
/// Derives `Clone` and `PartialEq` so a snapshot is an owned value that can
/// be compared against a fresh collection of the form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct Configuration {
    pub server: ServerSettings,
    pub logging: LoggingSettings,

    /// Always empty; the console performs no validation configuration.
    pub validation: ValidationSettings,

    pub timeouts: TimeoutSettings,
    pub client_auth: ClientAuthSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct LoggingSettings {
    pub level: String,
    pub log_request_types: String,
    pub log_request_body: String,
    pub log_response_body: String,
    pub log_directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ValidationSettings {}

/// Timeouts are kept as strings ("30s", "1m") and interpreted server-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct TimeoutSettings {
    pub tls_handshake: String,
    pub response_header: String,
    pub idle_connection: String,
    pub health_check_timeout: String,
    pub check_interval: String,
    pub recovery_threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ClientAuthSettings {
    pub enabled: bool,
    pub required_token: String,
}

/// Root configuration for the settings console.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Admin API location and credentials.
    pub admin: AdminConfig,

    /// Page readiness polling.
    pub readiness: ReadinessConfig,

    /// Translation settings.
    pub i18n: I18nConfig,

    /// Log filter.
    pub logging: LoggingConfig,
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Base URL of the admin server (e.g., "http://127.0.0.1:8080").
    pub base_url: String,

    /// API key sent as a Bearer token. Empty means no header.
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: String::new(),
        }
    }
}

/// Readiness polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Delay between readiness checks in milliseconds.
    pub poll_interval_ms: u64,

    /// Checks performed before giving up.
    pub max_attempts: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            max_attempts: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Current language code.
    pub language: String,

    /// Optional JSON catalog (key -> string) for `language`.
    pub catalog_path: Option<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            catalog_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "settings_console=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_wire_shape() {
        let mut config = Configuration::default();
        config.server.host = "0.0.0.0".into();
        config.server.port = 8080;
        config.timeouts.check_interval = "30s".into();
        config.client_auth.enabled = true;

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["server"]["port"], 8080);
        assert_eq!(json["timeouts"]["check_interval"], "30s");
        assert_eq!(json["client_auth"]["enabled"], true);
        assert_eq!(json["validation"], serde_json::json!({}));
    }

    #[test]
    fn test_console_config_defaults_from_partial_toml() {
        let config: ConsoleConfig = toml::from_str(
            r#"
            [admin]
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.admin.api_key, "secret");
        assert_eq!(config.admin.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.readiness.poll_interval_ms, 100);
        assert_eq!(config.i18n.language, "en");
    }
}
