//! User notifications (`showAlert`).

use std::fmt;
use std::io::Write;

/// Alert severity, matching the page's alert classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shows a message to the user.
pub trait Notifier: Send + Sync {
    fn show_alert(&self, message: &str, severity: Severity);
}

/// Writes alerts to stderr.
///
/// The log subscriber shares stderr, so the alert is only traced at debug.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    pub fn render(message: &str, severity: Severity) -> String {
        format!("[{}] {}", severity, message)
    }
}

impl Notifier for TerminalNotifier {
    fn show_alert(&self, message: &str, severity: Severity) {
        tracing::debug!(severity = %severity, "{}", message);
        let _ = writeln!(std::io::stderr(), "{}", Self::render(message, severity));
    }
}
