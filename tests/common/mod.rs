//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Json, Router,
};
use rand::Rng;
use tokio::net::TcpListener;

use settings_console::admin::{AdminClient, GENERATE_TOKEN_PATH, SETTINGS_PATH};
use settings_console::clipboard::{Clipboard, ClipboardError, ElementHandle, SelectionSurface};
use settings_console::config::Configuration;
use settings_console::controller::SettingsController;
use settings_console::form::FormState;
use settings_console::i18n::Catalog;
use settings_console::notify::{Notifier, Severity};

/// What the mock admin server saw and will answer.
#[derive(Default)]
pub struct MockInner {
    pub saved: Vec<serde_json::Value>,
    pub token_requests: usize,
    pub authorization: Vec<Option<String>>,
    pub request_ids: Vec<Option<String>>,
    pub settings_replies: VecDeque<(u16, String)>,
    pub token_replies: VecDeque<(u16, String)>,
}

#[derive(Clone, Default)]
pub struct MockAdmin {
    pub inner: Arc<Mutex<MockInner>>,
}

impl MockAdmin {
    /// Queue a reply for the next `PUT /admin/api/settings`.
    pub fn reply_settings(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().settings_replies.push_back((status, body.to_string()));
    }

    /// Queue a reply for the next token generation.
    pub fn reply_token(&self, status: u16, body: &str) {
        self.inner.lock().unwrap().token_replies.push_back((status, body.to_string()));
    }

    pub fn saved(&self) -> Vec<serde_json::Value> {
        self.inner.lock().unwrap().saved.clone()
    }

    pub fn requests(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.saved.len() + inner.token_requests
    }
}

/// Client token in the backend's format: `sk-` and 48 hex characters.
pub fn generate_token() -> String {
    let bytes: [u8; 24] = rand::thread_rng().gen();
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("sk-{}", hex)
}

pub fn is_client_token(token: &str) -> bool {
    token
        .strip_prefix("sk-")
        .is_some_and(|hex| hex.len() == 48 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn record_headers(inner: &mut MockInner, headers: &HeaderMap) {
    let text = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    inner.authorization.push(text("authorization"));
    inner.request_ids.push(text("x-request-id"));
}

fn json_response(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn put_settings(
    State(mock): State<MockAdmin>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let (status, reply) = {
        let mut inner = mock.inner.lock().unwrap();
        record_headers(&mut inner, &headers);
        inner.saved.push(body);
        inner.settings_replies.pop_front().unwrap_or((200, "{}".to_string()))
    };
    json_response(status, reply)
}

async fn generate_client_token(State(mock): State<MockAdmin>, headers: HeaderMap) -> Response {
    let (status, reply) = {
        let mut inner = mock.inner.lock().unwrap();
        record_headers(&mut inner, &headers);
        inner.token_requests += 1;
        inner.token_replies.pop_front().unwrap_or_else(|| {
            (200, serde_json::json!({ "token": generate_token() }).to_string())
        })
    };
    json_response(status, reply)
}

/// Start a mock admin server on an ephemeral port.
pub async fn start_mock_admin() -> (SocketAddr, MockAdmin) {
    let mock = MockAdmin::default();
    let app = Router::new()
        .route(SETTINGS_PATH, put(put_settings))
        .route(GENERATE_TOKEN_PATH, post(generate_client_token))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, mock)
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[derive(Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn alerts(&self) -> Vec<(String, Severity)> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn last(&self) -> (String, Severity) {
        self.alerts.lock().unwrap().last().cloned().expect("no alert shown")
    }
}

impl Notifier for RecordingNotifier {
    fn show_alert(&self, message: &str, severity: Severity) {
        self.alerts.lock().unwrap().push((message.to_string(), severity));
    }
}

/// Asynchronous clipboard that records writes or fails on demand.
#[derive(Default)]
pub struct RecordingClipboard {
    pub available: bool,
    pub fail: bool,
    pub written: Arc<Mutex<Vec<String>>>,
}

impl Clipboard for RecordingClipboard {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError::Command("write rejected".into()));
        }
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Selection surface that tracks which temporary inputs are alive.
pub struct TrackingSurface {
    pub live: Arc<Mutex<HashSet<u64>>>,
    pub inserted: Arc<Mutex<usize>>,
    pub outcome: Result<bool, ClipboardError>,
    next: u64,
}

impl TrackingSurface {
    pub fn new(outcome: Result<bool, ClipboardError>) -> Self {
        Self {
            live: Arc::default(),
            inserted: Arc::default(),
            outcome,
            next: 0,
        }
    }
}

impl SelectionSurface for TrackingSurface {
    fn insert_hidden_input(&mut self, _text: &str) -> Result<ElementHandle, ClipboardError> {
        self.next += 1;
        self.live.lock().unwrap().insert(self.next);
        *self.inserted.lock().unwrap() += 1;
        Ok(ElementHandle(self.next))
    }

    fn focus(&mut self, _element: ElementHandle) {}

    fn select(&mut self, _element: ElementHandle) {}

    fn exec_copy(&mut self) -> Result<bool, ClipboardError> {
        self.outcome.clone()
    }

    fn remove(&mut self, element: ElementHandle) {
        self.live.lock().unwrap().remove(&element.0);
    }
}

/// The settings page as first rendered.
pub fn sample_configuration() -> Configuration {
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
    config.client_auth.required_token = "sk-initial".into();
    config
}

pub type TestController = SettingsController<FormState, AdminClient, RecordingClipboard>;

/// Controller against `addr` with recording collaborators.
pub fn controller_for(
    addr: SocketAddr,
    clipboard: RecordingClipboard,
    surface: TrackingSurface,
) -> (TestController, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let client = AdminClient::new(&format!("http://{}", addr), Some("admin-secret".into())).unwrap();
    let controller = SettingsController::new(
        FormState::from_configuration(&sample_configuration()),
        client,
        clipboard,
        Box::new(surface),
        notifier.clone(),
        Arc::new(Catalog::english()),
    );
    (controller, notifier)
}
