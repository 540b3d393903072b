//! HTTP client for the admin settings API.

use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use url::Url;
use uuid::Uuid;

use crate::admin::{decode_reply, ApiError, ApiReply, SettingsApi, GENERATE_TOKEN_PATH, SETTINGS_PATH};
use crate::config::schema::AdminConfig;
use crate::config::Configuration;

/// Talks to the admin server over HTTP. No client-side timeout is applied.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, Some(config.api_key.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, operation: &'static str) -> Result<ApiReply, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = request
            .header("x-request-id", &request_id)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        tracing::debug!(request_id = %request_id, operation, "Sending admin request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(request_id = %request_id, operation, error = %e, "Admin request failed");
                return Err(ApiError::Transport(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        tracing::debug!(request_id = %request_id, operation, status, "Admin response received");

        decode_reply(status, &body)
    }
}

impl SettingsApi for AdminClient {
    async fn update_settings(&self, config: &Configuration) -> Result<ApiReply, ApiError> {
        let request = self.client.put(self.endpoint(SETTINGS_PATH)).json(config);
        self.send(request, "update_settings").await
    }

    async fn generate_client_token(&self) -> Result<ApiReply, ApiError> {
        let request = self.client.post(self.endpoint(GENERATE_TOKEN_PATH));
        self.send(request, "generate_client_token").await
    }
}
