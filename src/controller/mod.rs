//! Settings form controller.
//!
//! # Data Flow
//! ```text
//! page ready (readiness.rs)
//!     → collect_form_data → snapshot
//!
//! save:     collect → busy(save) → PUT settings → restore(save) → snapshot := sent config
//! reset:    snapshot → apply_configuration → render client-auth controls
//! generate: busy(generate) → POST generate-client-token → restore(generate) → token field
//! copy:     Clipboard::write_text, else legacy_copy through a temporary input
//! ```
//!
//! # Design Decisions
//! - The snapshot is an owned `Configuration`; later form edits never reach it
//! - Every outcome is reported through the `Notifier`; failures are also returned
//! - A busy control gets back exactly the state it had before the request
//! - The snapshot only changes on a successful save

pub mod readiness;

pub use readiness::{Prerequisite, ReadinessGate};

use std::sync::Arc;

use thiserror::Error;

use crate::admin::{ApiError, ApiReply, SettingsApi};
use crate::clipboard::{legacy_copy, Clipboard, SelectionSurface};
use crate::config::schema::ReadinessConfig;
use crate::config::{Configuration, ValidationError};
use crate::form::{
    apply_configuration, collect_form_data, render_client_auth_controls, ControlId, FieldId,
    FormView, SPINNER_HTML,
};
use crate::i18n::{keys, t, I18n};
use crate::notify::{Notifier, Severity};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("settings page not ready after {attempts} attempts: {missing}")]
    NotReady { attempts: u32, missing: Prerequisite },

    #[error("translation system not ready")]
    TranslatorUnavailable,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("control `{}` is missing from the page", .0.selector())]
    MissingControl(ControlId),

    #[error("there is no original configuration to restore")]
    NoSnapshot,

    #[error("there is no token to copy")]
    NoToken,
}

/// How a token copy ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Written through the asynchronous clipboard.
    Copied,
    /// Written through the temporary-input fallback.
    CopiedWithFallback,
    /// Neither path worked; the user was asked to copy by hand.
    ManualCopyRequired,
}

/// A user interaction on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SaveSettings,
    ResetSettings,
    GenerateToken,
    CopyToken,
    ToggleClientAuth,
}

impl Action {
    /// Map a button's `data-action` attribute.
    pub fn from_data_action(action: &str) -> Option<Self> {
        match action {
            "save-settings" => Some(Action::SaveSettings),
            "reset-settings" => Some(Action::ResetSettings),
            _ => None,
        }
    }

    /// Map an element id that has its own listener.
    pub fn from_element_id(id: &str) -> Option<Self> {
        match id {
            "generateTokenBtn" => Some(Action::GenerateToken),
            "copyTokenBtn" => Some(Action::CopyToken),
            "clientAuthEnabled" => Some(Action::ToggleClientAuth),
            _ => None,
        }
    }
}

/// Drives the settings page.
pub struct SettingsController<F, A, C> {
    form: F,
    api: A,
    clipboard: C,
    surface: Box<dyn SelectionSurface>,
    notifier: Arc<dyn Notifier>,
    i18n: Arc<dyn I18n>,
    gate: ReadinessGate,
    snapshot: Option<Configuration>,
}

impl<F, A, C> SettingsController<F, A, C>
where
    F: FormView,
    A: SettingsApi,
    C: Clipboard,
{
    pub fn new(
        form: F,
        api: A,
        clipboard: C,
        surface: Box<dyn SelectionSurface>,
        notifier: Arc<dyn Notifier>,
        i18n: Arc<dyn I18n>,
    ) -> Self {
        Self {
            form,
            api,
            clipboard,
            surface,
            notifier,
            i18n,
            gate: ReadinessGate::from_config(&ReadinessConfig::default()),
            snapshot: None,
        }
    }

    pub fn with_readiness(mut self, gate: ReadinessGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn into_form(self) -> F {
        self.form
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Last configuration known to match the backend.
    pub fn snapshot(&self) -> Option<&Configuration> {
        self.snapshot.as_ref()
    }

    /// Wait for the page, take the first snapshot, and render the client-auth controls.
    pub async fn initialize(&mut self) -> Result<(), ControllerError> {
        let attempts = self
            .gate
            .wait(&self.form, self.i18n.as_ref())
            .await
            .map_err(|(attempts, missing)| ControllerError::NotReady { attempts, missing })?;

        tracing::info!(attempts, "Initializing settings page");

        self.snapshot = Some(collect_form_data(&self.form)?);
        self.toggle_client_auth_controls();
        Ok(())
    }

    /// Route a page interaction to its operation.
    pub async fn dispatch(&mut self, action: Action) -> Result<(), ControllerError> {
        tracing::debug!(action = ?action, "Settings action");
        match action {
            Action::SaveSettings => self.save_settings().await,
            Action::ResetSettings => self.reset_settings(),
            Action::GenerateToken => self.generate_client_token().await.map(|_| ()),
            Action::CopyToken => self.copy_token_to_clipboard().await.map(|_| ()),
            Action::ToggleClientAuth => {
                self.toggle_client_auth_controls();
                Ok(())
            }
        }
    }

    /// Collect the form without touching the snapshot.
    pub fn collect_form_data(&self) -> Result<Configuration, ValidationError> {
        collect_form_data(&self.form)
    }

    /// Send the form to the admin API and adopt it as the snapshot on success.
    pub async fn save_settings(&mut self) -> Result<(), ControllerError> {
        if !self.i18n.is_installed() {
            tracing::error!("Translation system not ready");
            self.notifier.show_alert(keys::SYSTEM_NOT_READY, Severity::Warning);
            return Err(ControllerError::TranslatorUnavailable);
        }

        let config = match collect_form_data(&self.form) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Settings form is invalid");
                self.alert_failure(keys::SAVE_FAILED, &e);
                return Err(e.into());
            }
        };

        let prior = self
            .form
            .control(ControlId::SaveSettings)
            .ok_or(ControllerError::MissingControl(ControlId::SaveSettings))?;
        let busy_label = format!("{} {}", SPINNER_HTML, t(self.i18n.as_ref(), keys::SAVING));
        self.form
            .set_control(ControlId::SaveSettings, prior.busy(busy_label));

        let outcome = self
            .api
            .update_settings(&config)
            .await
            .and_then(ApiReply::into_result);

        self.form.set_control(ControlId::SaveSettings, prior);

        match outcome {
            Ok(_) => {
                tracing::info!(host = %config.server.host, port = config.server.port, "Settings saved");
                self.snapshot = Some(config);
                self.alert(keys::SETTINGS_SAVED, Severity::Success);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error saving settings");
                self.alert_failure(keys::SAVE_FAILED, &e);
                Err(e.into())
            }
        }
    }

    /// Restore every field from the snapshot. Never contacts the backend.
    pub fn reset_settings(&mut self) -> Result<(), ControllerError> {
        let Some(snapshot) = &self.snapshot else {
            tracing::warn!("No original config found");
            self.alert(keys::NO_ORIGINAL_CONFIG, Severity::Warning);
            return Err(ControllerError::NoSnapshot);
        };

        apply_configuration(&mut self.form, snapshot);
        render_client_auth_controls(&mut self.form);

        self.alert(keys::SETTINGS_RESET, Severity::Info);
        Ok(())
    }

    /// Ask the backend for a new client token and put it in the token field.
    ///
    /// The snapshot is untouched; the token only persists after a save.
    pub async fn generate_client_token(&mut self) -> Result<String, ControllerError> {
        let prior = self
            .form
            .control(ControlId::GenerateToken)
            .ok_or(ControllerError::MissingControl(ControlId::GenerateToken))?;
        self.form
            .set_control(ControlId::GenerateToken, prior.busy(SPINNER_HTML));

        let outcome = self
            .api
            .generate_client_token()
            .await
            .and_then(ApiReply::into_result)
            .and_then(|reply| reply.token.ok_or(ApiError::MissingToken));

        self.form.set_control(ControlId::GenerateToken, prior);

        match outcome {
            Ok(token) => {
                self.form.set_value(FieldId::ClientAuthToken, &token);
                self.alert(keys::TOKEN_GENERATED, Severity::Success);
                Ok(token)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error generating token");
                self.alert_failure(keys::TOKEN_GENERATE_FAILED, &e);
                Err(e.into())
            }
        }
    }

    /// Copy the token field, preferring the asynchronous clipboard.
    pub async fn copy_token_to_clipboard(&mut self) -> Result<CopyOutcome, ControllerError> {
        let token = self.form.value(FieldId::ClientAuthToken).unwrap_or_default();
        if token.is_empty() {
            self.alert(keys::NO_TOKEN_TO_COPY, Severity::Warning);
            return Err(ControllerError::NoToken);
        }

        if self.clipboard.is_available() {
            match self.clipboard.write_text(&token).await {
                Ok(()) => {
                    self.alert(keys::TOKEN_COPIED, Severity::Success);
                    return Ok(CopyOutcome::Copied);
                }
                Err(e) => tracing::warn!(error = %e, "Clipboard write failed, using fallback"),
            }
        }

        match legacy_copy(self.surface.as_mut(), &token) {
            Ok(true) => {
                self.alert(keys::TOKEN_COPIED, Severity::Success);
                Ok(CopyOutcome::CopiedWithFallback)
            }
            Ok(false) => {
                self.alert(keys::COPY_FAILED_MANUAL, Severity::Warning);
                Ok(CopyOutcome::ManualCopyRequired)
            }
            Err(e) => {
                tracing::error!(error = %e, "Fallback copy failed");
                self.alert(keys::COPY_FAILED_MANUAL, Severity::Warning);
                Ok(CopyOutcome::ManualCopyRequired)
            }
        }
    }

    /// Re-derive the client-auth controls from the enabled checkbox.
    pub fn toggle_client_auth_controls(&mut self) {
        render_client_auth_controls(&mut self.form);
    }

    fn alert(&self, entry: (&str, &str), severity: Severity) {
        self.notifier.show_alert(&t(self.i18n.as_ref(), entry), severity);
    }

    fn alert_failure(&self, entry: (&str, &str), error: &dyn std::fmt::Display) {
        let message = format!("{}: {}", t(self.i18n.as_ref(), entry), error);
        self.notifier.show_alert(&message, Severity::Danger);
    }
}
