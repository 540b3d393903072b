//! Settings form model.
//!
//! # Responsibilities
//! - Name every element the settings page template must provide
//! - Abstract the page behind `FormView` so the controller never touches a DOM
//! - Collect a `Configuration` from the fields and write one back
//! - Derive the presentational state of the client-auth controls
//!
//! # Element Schema
//! ```text
//! serverHost serverPort
//! logLevel logRequestTypes logRequestBody logResponseBody logDirectory
//! tlsHandshake responseHeader idleConnection healthCheckTimeout checkInterval recoveryThreshold
//! clientAuthEnabled (checkbox) clientAuthToken
//!
//! [data-action="save-settings"] [data-action="reset-settings"]
//! #generateTokenBtn #copyTokenBtn
//! ```

pub mod memory;

pub use memory::{FieldState, FormFileError, FormState};

use crate::config::validation::{parse_port, parse_recovery_threshold, ValidationError};
use crate::config::{
    ClientAuthSettings, Configuration, LoggingSettings, ServerSettings, TimeoutSettings,
};
use crate::config::schema::ValidationSettings;

/// Label marker shown on a control while its request is in flight.
pub const SPINNER_HTML: &str = r#"<i class="fas fa-spinner fa-spin"></i>"#;

/// Token input opacity while client authentication is enabled.
pub const ACTIVE_OPACITY: f32 = 1.0;
/// Token input opacity while client authentication is disabled.
pub const INACTIVE_OPACITY: f32 = 0.5;

/// A form field on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    ServerHost,
    ServerPort,
    LogLevel,
    LogRequestTypes,
    LogRequestBody,
    LogResponseBody,
    LogDirectory,
    TlsHandshake,
    ResponseHeader,
    IdleConnection,
    HealthCheckTimeout,
    CheckInterval,
    RecoveryThreshold,
    ClientAuthEnabled,
    ClientAuthToken,
}

impl FieldId {
    pub const ALL: [FieldId; 15] = [
        FieldId::ServerHost,
        FieldId::ServerPort,
        FieldId::LogLevel,
        FieldId::LogRequestTypes,
        FieldId::LogRequestBody,
        FieldId::LogResponseBody,
        FieldId::LogDirectory,
        FieldId::TlsHandshake,
        FieldId::ResponseHeader,
        FieldId::IdleConnection,
        FieldId::HealthCheckTimeout,
        FieldId::CheckInterval,
        FieldId::RecoveryThreshold,
        FieldId::ClientAuthEnabled,
        FieldId::ClientAuthToken,
    ];

    /// Element id used by the page template.
    pub fn element_id(self) -> &'static str {
        match self {
            FieldId::ServerHost => "serverHost",
            FieldId::ServerPort => "serverPort",
            FieldId::LogLevel => "logLevel",
            FieldId::LogRequestTypes => "logRequestTypes",
            FieldId::LogRequestBody => "logRequestBody",
            FieldId::LogResponseBody => "logResponseBody",
            FieldId::LogDirectory => "logDirectory",
            FieldId::TlsHandshake => "tlsHandshake",
            FieldId::ResponseHeader => "responseHeader",
            FieldId::IdleConnection => "idleConnection",
            FieldId::HealthCheckTimeout => "healthCheckTimeout",
            FieldId::CheckInterval => "checkInterval",
            FieldId::RecoveryThreshold => "recoveryThreshold",
            FieldId::ClientAuthEnabled => "clientAuthEnabled",
            FieldId::ClientAuthToken => "clientAuthToken",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.element_id() == id)
    }

    /// Checkbox fields carry a checked flag instead of a text value.
    pub fn is_checkbox(self) -> bool {
        matches!(self, FieldId::ClientAuthEnabled)
    }
}

/// A clickable control on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    SaveSettings,
    ResetSettings,
    GenerateToken,
    CopyToken,
}

impl ControlId {
    pub const ALL: [ControlId; 4] = [
        ControlId::SaveSettings,
        ControlId::ResetSettings,
        ControlId::GenerateToken,
        ControlId::CopyToken,
    ];

    /// CSS selector locating the control in the page template.
    pub fn selector(self) -> &'static str {
        match self {
            ControlId::SaveSettings => r#"[data-action="save-settings"]"#,
            ControlId::ResetSettings => r#"[data-action="reset-settings"]"#,
            ControlId::GenerateToken => "#generateTokenBtn",
            ControlId::CopyToken => "#copyTokenBtn",
        }
    }
}

/// Visual weight of a control (`btn-outline-primary` / `btn-outline-secondary`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    Primary,
    Secondary,
}

/// Presentational state of a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    /// Inner markup of the control.
    pub label: String,
    pub enabled: bool,
    pub emphasis: Emphasis,
}

impl ControlState {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            emphasis: Emphasis::Primary,
        }
    }

    /// The same control, disabled and relabelled for an in-flight request.
    pub fn busy(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: false,
            emphasis: self.emphasis,
        }
    }
}

/// Read/write access to the settings page.
///
/// Implementations are the page binding (a DOM in the browser, `FormState`
/// elsewhere). Missing elements read as `None` and writes to them are ignored.
pub trait FormView {
    fn value(&self, field: FieldId) -> Option<String>;
    fn set_value(&mut self, field: FieldId, value: &str);

    fn is_checked(&self, field: FieldId) -> Option<bool>;
    fn set_checked(&mut self, field: FieldId, checked: bool);

    fn set_opacity(&mut self, field: FieldId, opacity: f32);

    fn control(&self, id: ControlId) -> Option<ControlState>;
    fn set_control(&mut self, id: ControlId, state: ControlState);
}

/// Read the current form into a `Configuration`.
///
/// Only `port` and `recovery_threshold` are parsed; timeouts stay opaque strings.
pub fn collect_form_data<F>(form: &F) -> Result<Configuration, ValidationError>
where
    F: FormView + ?Sized,
{
    let text = |field: FieldId| form.value(field).ok_or(ValidationError::MissingField(field));

    Ok(Configuration {
        server: ServerSettings {
            host: text(FieldId::ServerHost)?,
            port: parse_port(&text(FieldId::ServerPort)?)?,
        },
        logging: LoggingSettings {
            level: text(FieldId::LogLevel)?,
            log_request_types: text(FieldId::LogRequestTypes)?,
            log_request_body: text(FieldId::LogRequestBody)?,
            log_response_body: text(FieldId::LogResponseBody)?,
            log_directory: text(FieldId::LogDirectory)?,
        },
        validation: ValidationSettings {},
        timeouts: TimeoutSettings {
            tls_handshake: text(FieldId::TlsHandshake)?,
            response_header: text(FieldId::ResponseHeader)?,
            idle_connection: text(FieldId::IdleConnection)?,
            health_check_timeout: text(FieldId::HealthCheckTimeout)?,
            check_interval: text(FieldId::CheckInterval)?,
            recovery_threshold: parse_recovery_threshold(&text(FieldId::RecoveryThreshold)?)?,
        },
        client_auth: ClientAuthSettings {
            enabled: form
                .is_checked(FieldId::ClientAuthEnabled)
                .ok_or(ValidationError::MissingField(FieldId::ClientAuthEnabled))?,
            required_token: text(FieldId::ClientAuthToken)?,
        },
    })
}

/// Overwrite every form field from `config`.
pub fn apply_configuration<F>(form: &mut F, config: &Configuration)
where
    F: FormView + ?Sized,
{
    form.set_value(FieldId::ServerHost, &config.server.host);
    form.set_value(FieldId::ServerPort, &config.server.port.to_string());
    form.set_value(FieldId::LogLevel, &config.logging.level);
    form.set_value(FieldId::LogRequestTypes, &config.logging.log_request_types);
    form.set_value(FieldId::LogRequestBody, &config.logging.log_request_body);
    form.set_value(FieldId::LogResponseBody, &config.logging.log_response_body);
    form.set_value(FieldId::LogDirectory, &config.logging.log_directory);
    form.set_value(FieldId::TlsHandshake, &config.timeouts.tls_handshake);
    form.set_value(FieldId::ResponseHeader, &config.timeouts.response_header);
    form.set_value(FieldId::IdleConnection, &config.timeouts.idle_connection);
    form.set_value(FieldId::HealthCheckTimeout, &config.timeouts.health_check_timeout);
    form.set_value(FieldId::CheckInterval, &config.timeouts.check_interval);
    form.set_value(
        FieldId::RecoveryThreshold,
        &config.timeouts.recovery_threshold.to_string(),
    );
    form.set_checked(FieldId::ClientAuthEnabled, config.client_auth.enabled);
    form.set_value(FieldId::ClientAuthToken, &config.client_auth.required_token);
}

/// Derive token input opacity and generate/copy availability from the
/// auth-enabled checkbox. The copy control keeps secondary emphasis either way.
pub fn render_client_auth_controls<F>(form: &mut F)
where
    F: FormView + ?Sized,
{
    let enabled = form.is_checked(FieldId::ClientAuthEnabled).unwrap_or(false);

    form.set_opacity(
        FieldId::ClientAuthToken,
        if enabled { ACTIVE_OPACITY } else { INACTIVE_OPACITY },
    );

    if let Some(mut generate) = form.control(ControlId::GenerateToken) {
        generate.enabled = enabled;
        generate.emphasis = if enabled { Emphasis::Primary } else { Emphasis::Secondary };
        form.set_control(ControlId::GenerateToken, generate);
    }

    if let Some(mut copy) = form.control(ControlId::CopyToken) {
        copy.enabled = enabled;
        copy.emphasis = Emphasis::Secondary;
        form.set_control(ControlId::CopyToken, copy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Configuration {
        let mut config = Configuration::default();
        config.server.host = "0.0.0.0".into();
        config.server.port = 8080;
        config.logging.level = "info".into();
        config.logging.log_request_types = "failed".into();
        config.logging.log_request_body = "truncated".into();
        config.logging.log_response_body = "truncated".into();
        config.logging.log_directory = "./logs".into();
        config.timeouts.tls_handshake = "10s".into();
        config.timeouts.response_header = "60s".into();
        config.timeouts.idle_connection = "90s".into();
        config.timeouts.health_check_timeout = "30s".into();
        config.timeouts.check_interval = "30s".into();
        config.timeouts.recovery_threshold = 3;
        config.client_auth.enabled = true;
        config.client_auth.required_token = "sk-abc".into();
        config
    }

    #[test]
    fn test_element_ids_round_trip() {
        for field in FieldId::ALL {
            assert_eq!(FieldId::from_element_id(field.element_id()), Some(field));
        }
        assert_eq!(FieldId::from_element_id("serverhost"), None);
    }

    #[test]
    fn test_collect_parses_port_as_number() {
        let mut form = FormState::from_configuration(&sample());
        form.set_value(FieldId::ServerPort, "8080");

        let config = collect_form_data(&form).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            serde_json::to_value(&config).unwrap()["server"]["port"],
            serde_json::json!(8080)
        );
    }

    #[test]
    fn test_collect_keeps_timeouts_opaque() {
        let mut form = FormState::from_configuration(&sample());
        form.set_value(FieldId::IdleConnection, "1m30s");

        let config = collect_form_data(&form).unwrap();
        assert_eq!(config.timeouts.idle_connection, "1m30s");
    }

    #[test]
    fn test_collect_is_idempotent() {
        let form = FormState::from_configuration(&sample());
        assert_eq!(collect_form_data(&form).unwrap(), collect_form_data(&form).unwrap());
    }

    #[test]
    fn test_collect_rejects_bad_numbers() {
        let mut form = FormState::from_configuration(&sample());
        form.set_value(FieldId::RecoveryThreshold, "lots");

        let err = collect_form_data(&form).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: FieldId::RecoveryThreshold,
                value: "lots".into(),
            }
        );
    }

    #[test]
    fn test_collect_reports_missing_field() {
        let mut form = FormState::from_configuration(&sample());
        form.remove_field(FieldId::LogDirectory);

        assert_eq!(
            collect_form_data(&form).unwrap_err(),
            ValidationError::MissingField(FieldId::LogDirectory)
        );
    }

    #[test]
    fn test_apply_then_collect_restores_values() {
        let mut form = FormState::from_configuration(&Configuration::default());
        apply_configuration(&mut form, &sample());
        assert_eq!(collect_form_data(&form).unwrap(), sample());
    }

    #[test]
    fn test_client_auth_controls_disabled() {
        let mut config = sample();
        config.client_auth.enabled = false;
        let mut form = FormState::from_configuration(&config);

        render_client_auth_controls(&mut form);

        assert_eq!(form.opacity(FieldId::ClientAuthToken), Some(INACTIVE_OPACITY));
        let generate = form.control(ControlId::GenerateToken).unwrap();
        assert!(!generate.enabled);
        assert_eq!(generate.emphasis, Emphasis::Secondary);
        assert!(!form.control(ControlId::CopyToken).unwrap().enabled);
    }

    #[test]
    fn test_client_auth_controls_enabled() {
        let mut form = FormState::from_configuration(&sample());
        form.set_checked(FieldId::ClientAuthEnabled, false);
        render_client_auth_controls(&mut form);
        form.set_checked(FieldId::ClientAuthEnabled, true);
        render_client_auth_controls(&mut form);

        assert_eq!(form.opacity(FieldId::ClientAuthToken), Some(ACTIVE_OPACITY));
        let generate = form.control(ControlId::GenerateToken).unwrap();
        assert!(generate.enabled);
        assert_eq!(generate.emphasis, Emphasis::Primary);
        let copy = form.control(ControlId::CopyToken).unwrap();
        assert!(copy.enabled);
        assert_eq!(copy.emphasis, Emphasis::Secondary);
    }

    #[test]
    fn test_busy_keeps_emphasis() {
        let mut state = ControlState::new("Save");
        state.emphasis = Emphasis::Secondary;
        let busy = state.busy(SPINNER_HTML);
        assert!(!busy.enabled);
        assert_eq!(busy.label, SPINNER_HTML);
        assert_eq!(busy.emphasis, Emphasis::Secondary);
    }
}
