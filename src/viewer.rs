// src/viewer.rs
use std::fmt::Write;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::clipboard::Clipboard;
use crate::config::CopySettings;
use crate::errors::{Result, SolverError};
use crate::lifecycle::{Controller, LifecycleSnapshot, LifecycleState, Ticket};
use crate::models::{file_extension, ResultPayload, SubmissionRequest};
use crate::presentation::{CodeBlockUnit, CopyAction};
use crate::render::html::{self, escape};
use crate::render::{render_payload, RenderedTree};

/// A resolved payload together with the interactive pieces built for it.
///
/// Built fresh for every payload; dropping it drops every copy state and
/// cancels their pending resets.
pub struct ResultView {
    payload: ResultPayload,
    tree: RenderedTree,
    blocks: Vec<CodeBlockUnit>,
    response_copy: Option<CopyAction>,
}

impl ResultView {
    pub fn new(payload: ResultPayload, clipboard: Arc<dyn Clipboard>, settings: CopySettings) -> Self {
        let tree = render_payload(&payload);
        let blocks = tree
            .code_blocks()
            .map(|spec| {
                CodeBlockUnit::new(
                    spec.content.clone(),
                    spec.language.clone(),
                    Arc::clone(&clipboard),
                    settings,
                )
            })
            .collect();
        let response_copy = payload
            .body()
            .map(|_| CopyAction::new(Arc::clone(&clipboard), settings));

        Self { payload, tree, blocks, response_copy }
    }

    pub fn payload(&self) -> &ResultPayload {
        &self.payload
    }

    pub fn tree(&self) -> &RenderedTree {
        &self.tree
    }

    pub fn blocks(&self) -> &[CodeBlockUnit] {
        &self.blocks
    }

    /// File name shown on the result tab, e.g. `Two Sum.py`.
    pub fn tab_label(&self) -> Option<String> {
        let title = self.payload.title.as_deref()?;
        let language = self.payload.language.as_deref().unwrap_or_default();
        Some(format!("{}.{}", title, file_extension(language)))
    }

    pub async fn copy_block(&mut self, index: usize) -> Result<bool> {
        let unit = self
            .blocks
            .get_mut(index)
            .ok_or(SolverError::BlockNotFound(index))?;
        unit.copy().await;
        Ok(unit.is_acknowledged())
    }

    /// Copies the whole response body as-is.
    pub async fn copy_response(&mut self) -> Result<bool> {
        let body = self.payload.body().ok_or(SolverError::NothingToCopy)?.to_string();
        let action = self.response_copy.as_mut().ok_or(SolverError::NothingToCopy)?;
        action.copy_text(&body).await;
        Ok(action.is_acknowledged())
    }

    pub fn response_copied(&self) -> bool {
        self.response_copy.as_ref().is_some_and(|a| a.is_acknowledged())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::from("<div class=\"solution-output\"><div class=\"solution-tab\">");
        if let Some(label) = self.tab_label() {
            let _ = write!(out, "<span class=\"file-name\">{}</span>", escape(&label));
        }
        if let Some(action) = &self.response_copy {
            let _ = write!(
                out,
                "<button class=\"copy-response\" data-copied=\"{}\">{}</button>",
                action.is_acknowledged(),
                action.button_label()
            );
        }
        out.push_str("</div>");

        if self.tree.is_empty() {
            out.push_str(EMPTY_HTML);
        } else {
            out.push_str(&html::to_html(&self.tree, |i| {
                self.blocks.get(i).is_some_and(|b| b.is_acknowledged())
            }));
        }
        out.push_str("</div>");
        out
    }
}

const EMPTY_HTML: &str = "<div class=\"solution-empty\"><p>No solution yet</p><p>Submit a problem to generate a solution</p></div>";
const LOADING_HTML: &str = "<div class=\"solution-loading\" aria-busy=\"true\"><p>Generating solution...</p><p>AI is analyzing the problem</p></div>";

/// What the result panel shows for a given lifecycle state.
pub enum Screen {
    Empty,
    Loading,
    Result(ResultView),
}

impl Screen {
    pub fn project(state: &LifecycleState, clipboard: Arc<dyn Clipboard>, settings: CopySettings) -> Self {
        match state {
            LifecycleState::Idle => Screen::Empty,
            LifecycleState::Pending => Screen::Loading,
            LifecycleState::Resolved(payload) => {
                Screen::Result(ResultView::new(payload.clone(), clipboard, settings))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Screen::Loading)
    }

    pub fn result(&self) -> Option<&ResultView> {
        match self {
            Screen::Result(view) => Some(view),
            Screen::Empty | Screen::Loading => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Screen::Empty => EMPTY_HTML.to_string(),
            Screen::Loading => LOADING_HTML.to_string(),
            Screen::Result(view) => view.to_html(),
        }
    }
}

struct ScreenCache {
    updates: watch::Receiver<LifecycleSnapshot>,
    screen: Screen,
}

/// One user's view of the solver: a controller plus the screen projected from
/// its latest state.
pub struct Session {
    controller: Arc<Controller>,
    clipboard: Arc<dyn Clipboard>,
    settings: CopySettings,
    cache: Mutex<ScreenCache>,
}

impl Session {
    pub fn new(controller: Arc<Controller>, clipboard: Arc<dyn Clipboard>, settings: CopySettings) -> Self {
        let updates = controller.subscribe();
        let state = updates.borrow().state.clone();
        let screen = Screen::project(&state, Arc::clone(&clipboard), settings);

        Self {
            controller,
            clipboard,
            settings,
            cache: Mutex::new(ScreenCache { updates, screen }),
        }
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    pub fn state(&self) -> LifecycleState {
        self.controller.state()
    }

    pub fn submit(&self, request: SubmissionRequest) -> (Ticket, JoinHandle<Ticket>) {
        self.controller.spawn_submit(request)
    }

    /// Starts a submission unless one is already pending.
    pub fn try_submit(&self, request: SubmissionRequest) -> Option<(Ticket, JoinHandle<Ticket>)> {
        self.controller.try_spawn_submit(request)
    }

    pub async fn render_html(&self) -> String {
        let mut cache = self.cache.lock().await;
        self.refresh(&mut cache);
        cache.screen.to_html()
    }

    pub async fn copy_block(&self, index: usize) -> Result<bool> {
        let mut cache = self.cache.lock().await;
        self.refresh(&mut cache);
        match &mut cache.screen {
            Screen::Result(view) => view.copy_block(index).await,
            Screen::Empty | Screen::Loading => Err(SolverError::BlockNotFound(index)),
        }
    }

    pub async fn copy_response(&self) -> Result<bool> {
        let mut cache = self.cache.lock().await;
        self.refresh(&mut cache);
        match &mut cache.screen {
            Screen::Result(view) => view.copy_response().await,
            Screen::Empty | Screen::Loading => Err(SolverError::NothingToCopy),
        }
    }

    /// Reprojects the screen if the controller published a new snapshot.
    fn refresh(&self, cache: &mut ScreenCache) {
        if !cache.updates.has_changed().unwrap_or(false) {
            return;
        }
        let state = cache.updates.borrow_and_update().state.clone();
        log::debug!("Rebuilding result screen for state '{}'", state.name());
        cache.screen = Screen::project(&state, Arc::clone(&self.clipboard), self.settings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::config::ResolutionPolicy;
    use crate::models::{Difficulty, Language};
    use crate::remote::SolveBoundary;
    use async_trait::async_trait;
    use std::time::Duration;

    fn payload(response: Option<&str>) -> ResultPayload {
        ResultPayload {
            success: true,
            response: response.map(str::to_string),
            message: Some("Solution generated".to_string()),
            title: Some("Two Sum".to_string()),
            language: Some("Python".to_string()),
            difficulty: Some("Easy".to_string()),
        }
    }

    fn view(response: Option<&str>, clipboard: &MemoryClipboard) -> ResultView {
        ResultView::new(payload(response), Arc::new(clipboard.clone()), CopySettings::default())
    }

    #[tokio::test]
    async fn test_one_unit_per_code_block() {
        let clipboard = MemoryClipboard::new();
        let view = view(Some("```a\n1\n```\n\n```b\n2\n```"), &clipboard);

        assert_eq!(view.blocks().len(), 2);
        assert_eq!(view.blocks()[1].language(), Some("b"));
        assert_eq!(view.tab_label().as_deref(), Some("Two Sum.py"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_response_is_verbatim() {
        let clipboard = MemoryClipboard::new();
        let mut view = view(Some("  body\n"), &clipboard);

        assert!(view.copy_response().await.unwrap());
        assert_eq!(clipboard.contents().as_deref(), Some("  body\n"));
        assert!(view.response_copied());
        assert!(view.to_html().contains("<button class=\"copy-response\" data-copied=\"true\">Copied!</button>"));
    }

    #[tokio::test]
    async fn test_missing_block_and_empty_response() {
        let clipboard = MemoryClipboard::new();
        let mut view = view(None, &clipboard);

        assert!(matches!(view.copy_block(0).await, Err(SolverError::BlockNotFound(0))));
        assert!(matches!(view.copy_response().await, Err(SolverError::NothingToCopy)));
        assert!(!view.to_html().contains("copy-response"));
    }

    #[test]
    fn test_projection_of_each_state() {
        let clipboard: Arc<dyn Clipboard> = Arc::new(MemoryClipboard::new());
        let settings = CopySettings::default();

        let idle = Screen::project(&LifecycleState::Idle, Arc::clone(&clipboard), settings);
        assert!(idle.to_html().contains("No solution yet"));

        let pending = Screen::project(&LifecycleState::Pending, Arc::clone(&clipboard), settings);
        assert!(pending.is_loading());
        assert!(pending.result().is_none());
        assert!(pending.to_html().contains("Generating solution..."));

        let resolved = Screen::project(&LifecycleState::Resolved(payload(Some("hi"))), clipboard, settings);
        assert!(!resolved.is_loading());
        assert!(resolved.to_html().contains("<p>hi</p>"));
    }

    struct EchoBoundary;

    #[async_trait]
    impl SolveBoundary for EchoBoundary {
        async fn solve(&self, request: &SubmissionRequest) -> Result<ResultPayload> {
            Ok(ResultPayload {
                success: true,
                response: Some(format!("```text\n{}\n```", request.title())),
                message: None,
                title: Some(request.title().to_string()),
                language: Some(request.language().to_string()),
                difficulty: None,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_payload_discards_copy_state() {
        let clipboard = MemoryClipboard::new();
        let controller = Arc::new(Controller::new(Arc::new(EchoBoundary), ResolutionPolicy::LastSubmit));
        let session = Session::new(controller, Arc::new(clipboard.clone()), CopySettings::default());

        let req = |t: &str| SubmissionRequest::new(t, Difficulty::Easy, Language::Go, "p").unwrap();

        session.submit(req("first")).1.await.unwrap();
        assert!(session.copy_block(0).await.unwrap());
        assert_eq!(clipboard.contents().as_deref(), Some("first"));
        assert!(session.render_html().await.contains("Copied!"));

        session.submit(req("second")).1.await.unwrap();
        let html = session.render_html().await;
        assert!(html.contains("second"));
        assert!(!html.contains("first.go"));
        assert!(!html.contains("Copied!"));

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(matches!(session.copy_block(3).await, Err(SolverError::BlockNotFound(3))));
    }
}
