// src/presentation.rs
use std::sync::Arc;

use crate::clipboard::Clipboard;
use crate::config::{AckPolicy, CopySettings};
use crate::copy_state::CopyState;
use crate::render::html::copy_label;

/// A copy button: writes text to the clipboard and shows "Copied!" for a while.
pub struct CopyAction {
    clipboard: Arc<dyn Clipboard>,
    state: CopyState,
    ack_policy: AckPolicy,
}

impl CopyAction {
    pub fn new(clipboard: Arc<dyn Clipboard>, settings: CopySettings) -> Self {
        Self {
            clipboard,
            state: CopyState::new(settings.reset_after),
            ack_policy: settings.ack_policy,
        }
    }

    /// Writes `text` and updates the acknowledged flag. Clipboard failures are
    /// logged and otherwise ignored.
    pub async fn copy_text(&mut self, text: &str) {
        let written = match self.clipboard.write_text(text).await {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Clipboard write failed: {}", e);
                false
            }
        };

        if written || self.ack_policy == AckPolicy::Optimistic {
            self.state.acknowledge();
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        self.state.is_acknowledged()
    }

    pub fn button_label(&self) -> &'static str {
        copy_label(self.is_acknowledged())
    }
}

/// The interactive rendering of one fenced code block.
pub struct CodeBlockUnit {
    content: String,
    language: Option<String>,
    action: CopyAction,
}

impl CodeBlockUnit {
    pub fn new(
        content: impl Into<String>,
        language: Option<String>,
        clipboard: Arc<dyn Clipboard>,
        settings: CopySettings,
    ) -> Self {
        Self {
            content: content.into(),
            language,
            action: CopyAction::new(clipboard, settings),
        }
    }

    /// Copies the block with surrounding whitespace trimmed.
    pub async fn copy(&mut self) {
        let text = self.content.trim().to_string();
        self.action.copy_text(&text).await;
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn header_label(&self) -> &str {
        self.language().unwrap_or("code")
    }

    pub fn is_acknowledged(&self) -> bool {
        self.action.is_acknowledged()
    }

    pub fn button_label(&self) -> &'static str {
        self.action.button_label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Result, SolverError};
    use crate::clipboard::MemoryClipboard;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::time::sleep;

    struct BrokenClipboard;

    #[async_trait]
    impl Clipboard for BrokenClipboard {
        async fn write_text(&self, _text: &str) -> Result<()> {
            Err(SolverError::Clipboard("denied".to_string()))
        }
    }

    fn settings(ack_policy: AckPolicy) -> CopySettings {
        CopySettings { reset_after: Duration::from_millis(2000), ack_policy }
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_trims_and_acknowledges() {
        let clipboard = MemoryClipboard::new();
        let mut unit = CodeBlockUnit::new(
            "\n  def f():\n      pass\n\n",
            Some("python".to_string()),
            Arc::new(clipboard.clone()),
            settings(AckPolicy::Optimistic),
        );
        assert_eq!(unit.button_label(), "Copy");

        unit.copy().await;

        assert_eq!(clipboard.contents().as_deref(), Some("def f():\n      pass"));
        assert_eq!(unit.content(), "\n  def f():\n      pass\n\n");
        assert!(unit.is_acknowledged());
        assert_eq!(unit.button_label(), "Copied!");
        assert_eq!(unit.header_label(), "python");

        sleep(Duration::from_millis(2001)).await;
        assert!(!unit.is_acknowledged());
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimistic_ack_survives_clipboard_failure() {
        let mut unit = CodeBlockUnit::new("x", None, Arc::new(BrokenClipboard), settings(AckPolicy::Optimistic));
        unit.copy().await;
        assert!(unit.is_acknowledged());
        assert_eq!(unit.header_label(), "code");
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_ack_requires_successful_write() {
        let mut unit = CodeBlockUnit::new("x", None, Arc::new(BrokenClipboard), settings(AckPolicy::Confirmed));
        unit.copy().await;
        assert!(!unit.is_acknowledged());

        let mut unit = CodeBlockUnit::new(
            "x",
            None,
            Arc::new(MemoryClipboard::new()),
            settings(AckPolicy::Confirmed),
        );
        unit.copy().await;
        assert!(unit.is_acknowledged());
    }

    #[tokio::test(start_paused = true)]
    async fn test_units_do_not_share_state() {
        let clipboard: Arc<dyn Clipboard> = Arc::new(MemoryClipboard::new());
        let mut first = CodeBlockUnit::new("a", None, Arc::clone(&clipboard), settings(AckPolicy::Optimistic));
        let second = CodeBlockUnit::new("b", None, clipboard, settings(AckPolicy::Optimistic));

        first.copy().await;

        assert!(first.is_acknowledged());
        assert!(!second.is_acknowledged());
    }
}
