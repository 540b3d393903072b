//! Configuration validation.
//!
//! # Responsibilities
//! - Parse the numeric form fields (`port`, `recovery_threshold`) into typed values
//! - Reject anything that is not a plain integer in range, naming the field
//! - Semantic checks on `ConsoleConfig` (URL shape, non-zero polling)
//!
//! # Design Decisions
//! - Timeout fields are never parsed here; they carry unit suffixes the backend owns
//! - Console validation returns all errors, not just the first

use thiserror::Error;
use url::Url;

use crate::config::schema::ConsoleConfig;
use crate::form::FieldId;

/// A form value or console setting that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The page has no element for this field.
    #[error("field `{}` is missing from the form", .0.element_id())]
    MissingField(FieldId),

    /// The field does not hold an integer.
    #[error("field `{}` must be an integer, got {value:?}", .field.element_id())]
    InvalidNumber { field: FieldId, value: String },

    /// The field holds an integer outside the accepted range.
    #[error("field `{}` must be between {min} and {max}, got {value}", .field.element_id())]
    OutOfRange {
        field: FieldId,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A console setting is unusable.
    #[error("{setting}: {reason}")]
    Setting {
        setting: &'static str,
        reason: String,
    },
}

/// Parse the server port. Accepts 1..=65535 after trimming whitespace.
pub fn parse_port(raw: &str) -> Result<u16, ValidationError> {
    let value = parse_integer(FieldId::ServerPort, raw)?;
    if !(1..=i64::from(u16::MAX)).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: FieldId::ServerPort,
            value,
            min: 1,
            max: i64::from(u16::MAX),
        });
    }
    Ok(value as u16)
}

/// Parse the health recovery threshold. Accepts any `u32`.
pub fn parse_recovery_threshold(raw: &str) -> Result<u32, ValidationError> {
    let value = parse_integer(FieldId::RecoveryThreshold, raw)?;
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: FieldId::RecoveryThreshold,
        value,
        min: 0,
        max: i64::from(u32::MAX),
    })
}

fn parse_integer(field: FieldId, raw: &str) -> Result<i64, ValidationError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

/// Validate a console configuration, collecting every problem.
pub fn validate_console_config(config: &ConsoleConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.admin.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::Setting {
            setting: "admin.base_url",
            reason: format!("unsupported scheme `{}`", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::Setting {
            setting: "admin.base_url",
            reason: e.to_string(),
        }),
    }

    if config.readiness.poll_interval_ms == 0 {
        errors.push(ValidationError::Setting {
            setting: "readiness.poll_interval_ms",
            reason: "must be greater than zero".to_string(),
        });
    }

    if config.readiness.max_attempts == 0 {
        errors.push(ValidationError::Setting {
            setting: "readiness.max_attempts",
            reason: "must be greater than zero".to_string(),
        });
    }

    if config.i18n.language.trim().is_empty() {
        errors.push(ValidationError::Setting {
            setting: "i18n.language",
            reason: "must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
