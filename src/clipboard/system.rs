//! Terminal-side clipboard implementations.

use std::collections::HashMap;
use std::io::Write;
use std::process::Stdio;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::clipboard::{Clipboard, ClipboardError, ElementHandle, SelectionSurface};

/// System clipboard through the platform's copy utility.
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    candidates: Vec<(&'static str, Vec<&'static str>)>,
}

impl CommandClipboard {
    pub fn new() -> Self {
        Self {
            candidates: platform_candidates(),
        }
    }

    /// Use an explicit command list, tried in order.
    pub fn with_candidates(candidates: Vec<(&'static str, Vec<&'static str>)>) -> Self {
        Self { candidates }
    }
}

impl Default for CommandClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "linux")]
fn platform_candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    let mut candidates = Vec::new();
    if std::env::var_os("WAYLAND_DISPLAY").is_some() {
        candidates.push(("wl-copy", vec![]));
    }
    if std::env::var_os("DISPLAY").is_some() {
        candidates.push(("xclip", vec!["-selection", "clipboard"]));
        candidates.push(("xsel", vec!["--clipboard", "--input"]));
    }
    candidates
}

#[cfg(target_os = "macos")]
fn platform_candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![("/usr/bin/pbcopy", vec![])]
}

#[cfg(target_os = "windows")]
fn platform_candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    vec![("clip", vec![])]
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn platform_candidates() -> Vec<(&'static str, Vec<&'static str>)> {
    Vec::new()
}

impl Clipboard for CommandClipboard {
    fn is_available(&self) -> bool {
        !self.candidates.is_empty()
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut last_error = ClipboardError::Unavailable;

        for (program, args) in &self.candidates {
            let mut child = match Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
            {
                Ok(child) => child,
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        tracing::debug!(program, "Clipboard command not found");
                    } else {
                        tracing::warn!(program, error = %e, "Failed to run clipboard command");
                    }
                    last_error = ClipboardError::Command(format!("{}: {}", program, e));
                    continue;
                }
            };

            if let Some(mut stdin) = child.stdin.take() {
                if let Err(e) = stdin.write_all(text.as_bytes()).await {
                    last_error = ClipboardError::Command(format!("{}: {}", program, e));
                    let _ = child.kill().await;
                    continue;
                }
            }

            match child.wait().await {
                Ok(status) if status.success() => {
                    tracing::debug!(program, "Copied text to clipboard");
                    return Ok(());
                }
                Ok(status) => {
                    last_error = ClipboardError::Command(format!("{} exited with {}", program, status));
                }
                Err(e) => {
                    last_error = ClipboardError::Command(format!("{}: {}", program, e));
                }
            }
        }

        Err(last_error)
    }
}

/// Selection surface that copies through the terminal's OSC 52 sequence.
///
/// The "hidden input" is a buffer that only exists between insert and remove.
pub struct Osc52Surface<W> {
    out: W,
    next_id: u64,
    inputs: HashMap<ElementHandle, String>,
    focused: Option<ElementHandle>,
    selected: Option<ElementHandle>,
}

impl<W: Write + Send> Osc52Surface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_id: 0,
            inputs: HashMap::new(),
            focused: None,
            selected: None,
        }
    }

    /// Number of temporary inputs currently alive.
    pub fn live_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> SelectionSurface for Osc52Surface<W> {
    fn insert_hidden_input(&mut self, text: &str) -> Result<ElementHandle, ClipboardError> {
        self.next_id += 1;
        let element = ElementHandle(self.next_id);
        self.inputs.insert(element, text.to_string());
        Ok(element)
    }

    fn focus(&mut self, element: ElementHandle) {
        if self.inputs.contains_key(&element) {
            self.focused = Some(element);
        }
    }

    fn select(&mut self, element: ElementHandle) {
        if self.focused == Some(element) {
            self.selected = Some(element);
        }
    }

    fn exec_copy(&mut self) -> Result<bool, ClipboardError> {
        let Some(text) = self.selected.and_then(|element| self.inputs.get(&element)) else {
            return Ok(false);
        };
        let sequence = format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()));
        self.out
            .write_all(sequence.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| ClipboardError::Surface(e.to_string()))?;
        Ok(true)
    }

    fn remove(&mut self, element: ElementHandle) {
        self.inputs.remove(&element);
        if self.focused == Some(element) {
            self.focused = None;
        }
        if self.selected == Some(element) {
            self.selected = None;
        }
    }
}
