// src/clipboard.rs
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::errors::{Result, SolverError};

/// Somewhere copied text can be written. Best-effort: callers are expected to
/// tolerate failures.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard held in memory for one session. The HTTP shell hands its
/// contents to the browser, which owns the real clipboard.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<RwLock<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last text written, if any.
    pub fn contents(&self) -> Option<String> {
        self.contents.read().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut guard = self
            .contents
            .write()
            .map_err(|_| SolverError::Clipboard("clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
