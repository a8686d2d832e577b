//! Clipboard bridge
//!
//! Text-only access to the platform clipboard through `arboard`. The session
//! only talks to [`ClipboardBridge`], so a missing clipboard degrades to a
//! status message instead of a crash.

use crate::error::{Result, SnipError};
use tracing::{debug, warn};

pub trait ClipboardBridge {
    fn read(&mut self) -> Result<String>;

    fn write(&mut self, text: &str) -> Result<()>;
}

pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Startup capability probe. Fails when no clipboard backend is reachable
    /// (for example a headless session without X11 or Wayland).
    pub fn probe() -> Result<Self> {
        match arboard::Clipboard::new() {
            Ok(inner) => {
                debug!("clipboard available");
                Ok(Self { inner })
            }
            Err(err) => {
                warn!(error = %err, "clipboard probe failed");
                Err(err.into())
            }
        }
    }
}

impl ClipboardBridge for SystemClipboard {
    fn read(&mut self) -> Result<String> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            // An empty clipboard is not a broken clipboard
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(err) => Err(SnipError::from(err)),
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text.to_owned())?;
        Ok(())
    }
}

/// In-memory clipboard used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: String,
    pub broken: bool,
}

#[cfg(test)]
impl MemoryClipboard {
    pub fn with_text(text: &str) -> Self {
        Self {
            contents: text.to_string(),
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            contents: String::new(),
            broken: true,
        }
    }
}

#[cfg(test)]
impl ClipboardBridge for MemoryClipboard {
    fn read(&mut self) -> Result<String> {
        if self.broken {
            return Err(SnipError::ClipboardUnavailable("no backend".to_string()));
        }
        Ok(self.contents.clone())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        if self.broken {
            return Err(SnipError::ClipboardUnavailable("no backend".to_string()));
        }
        self.contents = text.to_string();
        Ok(())
    }
}
