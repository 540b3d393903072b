//! Admin settings API.
//!
//! # Endpoints
//! ```text
//! PUT  /admin/api/settings                        body: Configuration (JSON)
//! POST /admin/api/settings/generate-client-token  no body
//! ```
//!
//! Both reply with JSON. A non-empty `error` field is an application-level
//! failure whatever the HTTP status; its absence is success.

pub mod client;

pub use client::AdminClient;

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::Configuration;

pub const SETTINGS_PATH: &str = "/admin/api/settings";
pub const GENERATE_TOKEN_PATH: &str = "/admin/api/settings/generate-client-token";

/// JSON body returned by the admin API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiReply {
    #[serde(
        default,
        deserialize_with = "truthy_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ApiReply {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            token: None,
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            error: None,
            token: Some(token.into()),
        }
    }

    /// The application error, if any. An empty string is not an error.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }

    /// Turn an `error` field into `ApiError::Application`.
    pub fn into_result(self) -> Result<Self, ApiError> {
        match self.error_message() {
            Some(message) => Err(ApiError::Application(message.to_string())),
            None => Ok(self),
        }
    }
}

/// Any truthy `error` value is an error message; falsy values are absent.
fn truthy_error<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) => Some(message),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}

/// Failures talking to the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with an `error` field. Shown verbatim.
    #[error("{0}")]
    Application(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-success status without a JSON `error` body.
    #[error("admin API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Success status, but the body is not the expected JSON.
    #[error("invalid response: {0}")]
    Decode(String),

    /// Token generation succeeded without returning a token.
    #[error("response did not contain a token")]
    MissingToken,

    #[error("invalid admin URL: {0}")]
    InvalidUrl(String),
}

/// The admin settings endpoints.
pub trait SettingsApi: Send + Sync {
    /// `PUT /admin/api/settings` with the full configuration.
    fn update_settings(
        &self,
        config: &Configuration,
    ) -> impl Future<Output = Result<ApiReply, ApiError>> + Send;

    /// `POST /admin/api/settings/generate-client-token`.
    fn generate_client_token(&self) -> impl Future<Output = Result<ApiReply, ApiError>> + Send;
}

/// Interpret a raw admin response.
///
/// A JSON body carrying `error` is returned as-is so the caller surfaces the
/// message; other non-success statuses and undecodable bodies become errors.
pub fn decode_reply(status: u16, body: &str) -> Result<ApiReply, ApiError> {
    let success = (200..300).contains(&status);
    match serde_json::from_str::<ApiReply>(body) {
        Ok(reply) if success || reply.error_message().is_some() => Ok(reply),
        Ok(_) => Err(ApiError::Status {
            status,
            body: body.to_string(),
        }),
        Err(e) if success => Err(ApiError::Decode(e.to_string())),
        Err(_) => Err(ApiError::Status {
            status,
            body: body.to_string(),
        }),
    }
}
