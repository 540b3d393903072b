//! Settings console for the proxy admin API.
//!
//! Reads the settings form, sends it to `PUT /admin/api/settings`, restores
//! the last saved values on reset, and handles the client-auth token
//! (generation through the admin API, copy to clipboard).

pub mod admin;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod form;
pub mod i18n;
pub mod notify;
pub mod observability;

pub use admin::{AdminClient, SettingsApi};
pub use config::{Configuration, ConsoleConfig};
pub use controller::{Action, ControllerError, SettingsController};
pub use form::{FormState, FormView};
