//! In-memory settings form.
//!
//! `FormState` stands in for the page when there is no DOM: the CLI loads it
//! from a TOML form file keyed by element id, and tests drive it directly.
//!
//! ```toml
//! serverHost = "0.0.0.0"
//! serverPort = "8080"
//! clientAuthEnabled = true
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::Configuration;
use crate::form::{apply_configuration, ControlId, ControlState, FieldId, FormView, ACTIVE_OPACITY};

/// Errors reading or writing a form file.
#[derive(Debug, Error)]
pub enum FormFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown form field `{0}`")]
    UnknownField(String),

    #[error("form field `{0}` has the wrong type (checkboxes take a boolean, text fields a string or number)")]
    InvalidValue(String),
}

/// State of a single field element.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub value: String,
    pub checked: bool,
    pub opacity: f32,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            value: String::new(),
            checked: false,
            opacity: ACTIVE_OPACITY,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: HashMap<FieldId, FieldState>,
    controls: HashMap<ControlId, ControlState>,
    mutations: usize,
}

impl FormState {
    /// An empty page: no fields, no controls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field (empty) plus the standard controls.
    pub fn blank() -> Self {
        let mut form = Self::new().with_standard_controls();
        for field in FieldId::ALL {
            form.fields.insert(field, FieldState::default());
        }
        form
    }

    /// A complete page populated from `config`.
    pub fn from_configuration(config: &Configuration) -> Self {
        let mut form = Self::blank();
        apply_configuration(&mut form, config);
        form.mutations = 0;
        form
    }

    /// Add the save, reset, generate and copy controls with their default labels.
    pub fn with_standard_controls(mut self) -> Self {
        for (id, label) in [
            (ControlId::SaveSettings, "Save"),
            (ControlId::ResetSettings, "Reset"),
            (ControlId::GenerateToken, "Generate"),
            (ControlId::CopyToken, "Copy"),
        ] {
            self.controls.insert(id, ControlState::new(label));
        }
        self
    }

    pub fn load(path: &Path) -> Result<Self, FormFileError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), FormFileError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Parse a form file. Fields absent from the file are absent from the page.
    pub fn from_toml_str(content: &str) -> Result<Self, FormFileError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut form = Self::new().with_standard_controls();

        for (key, value) in table {
            let field = FieldId::from_element_id(&key)
                .ok_or_else(|| FormFileError::UnknownField(key.clone()))?;
            let mut state = FieldState::default();
            match (field.is_checkbox(), value) {
                (true, toml::Value::Boolean(checked)) => state.checked = checked,
                (false, toml::Value::String(text)) => state.value = text,
                (false, toml::Value::Integer(n)) => state.value = n.to_string(),
                (false, toml::Value::Float(n)) => state.value = n.to_string(),
                _ => return Err(FormFileError::InvalidValue(key)),
            }
            form.fields.insert(field, state);
        }

        Ok(form)
    }

    pub fn to_toml_string(&self) -> Result<String, FormFileError> {
        let mut table = toml::Table::new();
        for field in FieldId::ALL {
            let Some(state) = self.fields.get(&field) else { continue };
            let value = if field.is_checkbox() {
                toml::Value::Boolean(state.checked)
            } else {
                toml::Value::String(state.value.clone())
            };
            table.insert(field.element_id().to_string(), value);
        }
        Ok(toml::to_string(&table)?)
    }

    pub fn field(&self, field: FieldId) -> Option<&FieldState> {
        self.fields.get(&field)
    }

    pub fn opacity(&self, field: FieldId) -> Option<f32> {
        self.fields.get(&field).map(|state| state.opacity)
    }

    pub fn remove_field(&mut self, field: FieldId) {
        self.fields.remove(&field);
    }

    pub fn remove_control(&mut self, id: ControlId) {
        self.controls.remove(&id);
    }

    /// Number of value/checked writes since construction.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }
}

impl FormView for FormState {
    fn value(&self, field: FieldId) -> Option<String> {
        self.fields.get(&field).map(|state| state.value.clone())
    }

    fn set_value(&mut self, field: FieldId, value: &str) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.value = value.to_string();
            self.mutations += 1;
        }
    }

    fn is_checked(&self, field: FieldId) -> Option<bool> {
        self.fields.get(&field).map(|state| state.checked)
    }

    fn set_checked(&mut self, field: FieldId, checked: bool) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.checked = checked;
            self.mutations += 1;
        }
    }

    fn set_opacity(&mut self, field: FieldId, opacity: f32) {
        if let Some(state) = self.fields.get_mut(&field) {
            state.opacity = opacity;
        }
    }

    fn control(&self, id: ControlId) -> Option<ControlState> {
        self.controls.get(&id).cloned()
    }

    fn set_control(&mut self, id: ControlId, state: ControlState) {
        if let Some(control) = self.controls.get_mut(&id) {
            *control = state;
        }
    }
}
