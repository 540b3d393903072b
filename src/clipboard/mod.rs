//! Clipboard access for the client token.
//!
//! # Paths
//! ```text
//! copy request
//!     → Clipboard::write_text (asynchronous platform capability)
//!     → on failure or absence: legacy_copy
//!           TempInput::insert (hidden, off-screen input on a SelectionSurface)
//!           → focus → select → exec_copy
//!           → removed when the guard drops, on every exit path
//! ```

pub mod system;

pub use system::{CommandClipboard, Osc52Surface};

use std::future::Future;

use thiserror::Error;

/// Style a selection surface applies to the temporary input.
pub const HIDDEN_INPUT_STYLE: &str = "position:fixed;top:0;left:0;opacity:0";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard is not available")]
    Unavailable,

    #[error("clipboard command failed: {0}")]
    Command(String),

    #[error("selection surface error: {0}")]
    Surface(String),
}

/// Asynchronous system clipboard.
pub trait Clipboard: Send + Sync {
    fn is_available(&self) -> bool;

    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// A platform without an asynchronous clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn is_available(&self) -> bool {
        false
    }

    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

/// Identifies an element created on a `SelectionSurface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub u64);

/// Synchronous select-and-copy technique.
pub trait SelectionSurface: Send {
    /// Create an invisible input holding `text` (see [`HIDDEN_INPUT_STYLE`]).
    fn insert_hidden_input(&mut self, text: &str) -> Result<ElementHandle, ClipboardError>;

    fn focus(&mut self, element: ElementHandle);

    fn select(&mut self, element: ElementHandle);

    /// Copy the current selection. `Ok(false)` means the copy was refused.
    fn exec_copy(&mut self) -> Result<bool, ClipboardError>;

    fn remove(&mut self, element: ElementHandle);
}

/// A temporary input that is removed from its surface when dropped.
pub struct TempInput<'a> {
    surface: &'a mut dyn SelectionSurface,
    element: ElementHandle,
}

impl<'a> TempInput<'a> {
    pub fn insert(surface: &'a mut dyn SelectionSurface, text: &str) -> Result<Self, ClipboardError> {
        let element = surface.insert_hidden_input(text)?;
        Ok(Self { surface, element })
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Focus, select, and copy the input's contents.
    pub fn copy(&mut self) -> Result<bool, ClipboardError> {
        self.surface.focus(self.element);
        self.surface.select(self.element);
        self.surface.exec_copy()
    }
}

impl Drop for TempInput<'_> {
    fn drop(&mut self) {
        self.surface.remove(self.element);
    }
}

/// Copy `text` through a temporary hidden input.
pub fn legacy_copy(surface: &mut dyn SelectionSurface, text: &str) -> Result<bool, ClipboardError> {
    let mut input = TempInput::insert(surface, text)?;
    input.copy()
}
