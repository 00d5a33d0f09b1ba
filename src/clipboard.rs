//! Clipboard access behind a port trait.

use crate::error::ClipboardError;

use async_trait::async_trait;
use parking_lot::Mutex;

/// Read and write plain text on a clipboard.
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    /// Read the full clipboard text.
    async fn read_text(&self) -> Result<String, ClipboardError>;

    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard, useful for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
    denied: Mutex<bool>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clipboard already holding `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set_text(text);
        clipboard
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.content.lock() = Some(text.into());
    }

    pub fn text(&self) -> Option<String> {
        self.content.lock().clone()
    }

    /// Refuse every subsequent access, as a platform without permission would.
    pub fn deny_access(&self, denied: bool) {
        *self.denied.lock() = denied;
    }

    fn check_access(&self) -> Result<(), ClipboardError> {
        if *self.denied.lock() {
            return Err(ClipboardError::PermissionDenied(
                "clipboard access refused".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ClipboardPort for MemoryClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        self.check_access()?;
        self.content
            .lock()
            .clone()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard is empty".to_string()))
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.check_access()?;
        self.set_text(text);
        Ok(())
    }
}

/// The operating system clipboard.
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "system-clipboard")]
fn map_arboard(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ClipboardOccupied => ClipboardError::PermissionDenied(err.to_string()),
        other => ClipboardError::Unavailable(other.to_string()),
    }
}

#[cfg(feature = "system-clipboard")]
#[async_trait]
impl ClipboardPort for SystemClipboard {
    async fn read_text(&self) -> Result<String, ClipboardError> {
        tokio::task::spawn_blocking(|| {
            let mut clipboard = arboard::Clipboard::new().map_err(map_arboard)?;
            clipboard.get_text().map_err(map_arboard)
        })
        .await
        .map_err(|e| ClipboardError::Unavailable(e.to_string()))?
    }

    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new().map_err(map_arboard)?;
            clipboard.set_text(text).map_err(map_arboard)
        })
        .await
        .map_err(|e| ClipboardError::Unavailable(e.to_string()))?
    }
}
