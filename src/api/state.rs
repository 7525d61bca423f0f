// src/api/state.rs
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::lifecycle::Controller;
use crate::remote::{HttpSolveClient, SolveBoundary};
use crate::viewer::Session;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub session: Arc<Session>,
    pub clipboard: MemoryClipboard,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let boundary = HttpSolveClient::from_config(&config)?;
        Ok(Self::with_boundary(config, Arc::new(boundary)))
    }

    /// Builds the state around any solve boundary; tests pass a stub here.
    pub fn with_boundary(config: AppConfig, boundary: Arc<dyn SolveBoundary>) -> Self {
        let clipboard = MemoryClipboard::new();
        let controller = Arc::new(Controller::new(boundary, config.resolution_policy));
        let session_clipboard: Arc<dyn Clipboard> = Arc::new(clipboard.clone());
        let session = Arc::new(Session::new(controller, session_clipboard, config.copy));

        Self {
            config: Arc::new(config),
            session,
            clipboard,
        }
    }
}
