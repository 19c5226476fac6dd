//! Application orchestration layer
//!
//! `Application` owns the search controller and wires it to the outside world: terminal input
//! arrives from a blocking thread, queries go to the lookup worker, responses come back over a
//! channel, and every change is drawn by the UI renderer. The controller decides what happens;
//! this module only carries out its directives and keeps the view in step.

pub mod runtime;

use crate::config::Config;
use crate::controller::{Directive, NavKey, SearchController};
use crate::error::{LugatError, Result};
use crate::input::{spawn_input_thread, InputAction, ScrollDirection};
use crate::lookup::{LookupCommand, LookupResponse};
use crate::render::{parse_markup, EntryMeta, EntryRenderer, RenderedEntry};
use crate::store::DictionaryStore;
use crate::ui::{Focus, UIRenderer, ViewState};
use runtime::spawn_lookup_worker;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, Receiver, Sender, UnboundedReceiver};
use tokio::task::JoinHandle;

/// Article lines moved by the arrow keys while the article pane has focus.
const ARTICLE_LINE_STEP: u16 = 1;

/// Application orchestrator
pub struct Application {
    controller: SearchController,
    entry_renderer: EntryRenderer,
    ui_renderer: Box<dyn UIRenderer>,
    lookup_tx: Sender<LookupCommand>,
    response_rx: Receiver<LookupResponse>,
    worker_handle: Option<JoinHandle<()>>,
    source_name: String,
    input_poll: Duration,
}

impl Application {
    /// Create the application and start its lookup worker. Must be called inside a tokio runtime.
    pub fn new(
        store: Arc<dyn DictionaryStore>,
        ui_renderer: Box<dyn UIRenderer>,
        config: &Config,
        source_name: impl Into<String>,
    ) -> Self {
        let channels = spawn_lookup_worker(store);

        Self {
            controller: SearchController::new(),
            entry_renderer: EntryRenderer::new(config.styled_dictionary.clone()),
            ui_renderer,
            lookup_tx: channels.commands,
            response_rx: channels.responses,
            worker_handle: Some(channels.handle),
            source_name: source_name.into(),
            input_poll: config.input_poll_interval(),
        }
    }

    pub fn controller(&self) -> &SearchController {
        &self.controller
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        self.ui_renderer.initialize()?;

        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let mut view_state = ViewState::new(self.source_name.clone(), width, height);

        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let _input_thread = spawn_input_thread(input_tx, Arc::clone(&shutdown), self.input_poll);

        let result = self.event_loop(&mut view_state, &mut input_rx).await;

        shutdown.store(true, Ordering::SeqCst);
        self.shutdown_worker().await;
        self.ui_renderer.cleanup()?;
        result
    }

    async fn event_loop(
        &mut self,
        view_state: &mut ViewState,
        input_rx: &mut UnboundedReceiver<InputAction>,
    ) -> Result<()> {
        self.ui_renderer.render(view_state, self.controller.state())?;

        loop {
            tokio::select! {
                action = input_rx.recv() => {
                    let Some(action) = action else {
                        return Err(LugatError::ui("input thread stopped"));
                    };
                    if !self.handle_action(action, view_state).await? {
                        return Ok(());
                    }
                }
                response = self.response_rx.recv() => {
                    let Some(response) = response else {
                        return Err(LugatError::other("lookup worker stopped"));
                    };
                    self.handle_response(response, view_state).await?;
                }
            }

            self.ui_renderer.render(view_state, self.controller.state())?;
        }
    }

    /// Apply one input action. Returns false when the application should quit.
    pub async fn handle_action(
        &mut self,
        action: InputAction,
        view_state: &mut ViewState,
    ) -> Result<bool> {
        let directives = match action {
            InputAction::Quit => return Ok(false),
            InputAction::NoAction => Vec::new(),
            InputAction::Resize { width, height } => {
                view_state.update_terminal_size(width, height);
                Vec::new()
            }
            InputAction::ToggleFocus => {
                view_state.toggle_focus();
                Vec::new()
            }
            InputAction::Scroll { direction, lines } => {
                view_state.scroll_article(direction, lines);
                Vec::new()
            }
            InputAction::Page(direction) => {
                let page = view_state.article_page();
                view_state.scroll_article(direction, page);
                Vec::new()
            }
            InputAction::Click { column, row } => self.handle_click(column, row, view_state),
            InputAction::InsertChar(ch) => {
                view_state.focus = Focus::Input;
                view_state.status_line.clear_message();
                let mut text = self.controller.query_text().to_string();
                text.push(ch);
                self.controller.on_text_changed(text)
            }
            InputAction::DeleteChar => {
                view_state.focus = Focus::Input;
                view_state.status_line.clear_message();
                let mut text = self.controller.query_text().to_string();
                text.pop();
                self.controller.on_text_changed(text)
            }
            InputAction::ClearInput => {
                view_state.focus = Focus::Input;
                view_state.status_line.clear_message();
                self.controller.on_text_changed(String::new())
            }
            InputAction::Navigate(key) => match view_state.focus {
                Focus::Input => self.navigate_input(key),
                Focus::Article => self.navigate_article(key, view_state),
            },
            InputAction::NextLink | InputAction::PreviousLink => {
                if view_state.focus == Focus::Article {
                    view_state.cycle_link(action == InputAction::NextLink);
                }
                Vec::new()
            }
        };

        self.dispatch(directives, view_state).await?;
        Ok(true)
    }

    /// Apply a worker response and carry out whatever the controller asks for next.
    pub async fn handle_response(
        &mut self,
        response: LookupResponse,
        view_state: &mut ViewState,
    ) -> Result<()> {
        let directives = self.controller.apply(response);
        self.dispatch(directives, view_state).await
    }

    fn navigate_input(&mut self, key: NavKey) -> Vec<Directive> {
        let nothing_active = self.controller.active_index().is_none();
        let directives = self.controller.on_key_down(key);
        if key == NavKey::Enter && nothing_active {
            return self.controller.on_submit();
        }
        directives
    }

    fn navigate_article(&mut self, key: NavKey, view_state: &mut ViewState) -> Vec<Directive> {
        match key {
            NavKey::ArrowUp => {
                view_state.scroll_article(ScrollDirection::Up, ARTICLE_LINE_STEP);
                Vec::new()
            }
            NavKey::ArrowDown => {
                view_state.scroll_article(ScrollDirection::Down, ARTICLE_LINE_STEP);
                Vec::new()
            }
            NavKey::Escape => {
                view_state.focus = Focus::Input;
                Vec::new()
            }
            NavKey::Enter => {
                let word = view_state
                    .focused_link
                    .and_then(|index| view_state.link_word(index))
                    .map(str::to_string);
                match word {
                    Some(word) => {
                        log::debug!("following cross-reference {word:?}");
                        view_state.focus = Focus::Input;
                        view_state.status_line.clear_message();
                        self.controller.on_cross_reference(&word)
                    }
                    None => {
                        view_state
                            .status_line
                            .set_message("No link selected".to_string());
                        Vec::new()
                    }
                }
            }
        }
    }

    fn handle_click(&mut self, column: u16, row: u16, view_state: &mut ViewState) -> Vec<Directive> {
        let layout = view_state.layout();
        if contains(layout.article, column, row) {
            view_state.focus = Focus::Article;
            return Vec::new();
        }
        if contains(layout.input, column, row) {
            view_state.focus = Focus::Input;
            return Vec::new();
        }
        match view_state.suggestion_at(column, row) {
            Some(index) => self.controller.on_suggestion_clicked(index),
            None => Vec::new(),
        }
    }

    /// Carry out controller directives, then bring the view up to date.
    async fn dispatch(&mut self, directives: Vec<Directive>, view_state: &mut ViewState) -> Result<()> {
        for directive in directives {
            match directive {
                Directive::Lookup(command) => {
                    self.lookup_tx
                        .send(command)
                        .await
                        .map_err(|_| LugatError::other("lookup worker unavailable"))?;
                }
                Directive::ScrollIntoView(index) => view_state.scroll_into_view(index),
                Directive::FocusInput => view_state.focus = Focus::Input,
            }
        }

        self.sync_view(view_state);
        Ok(())
    }

    fn sync_view(&self, view_state: &mut ViewState) {
        view_state.searching = self.controller.is_awaiting_suggestions();

        match self.controller.active_index() {
            Some(_) => view_state.clamp_list_offset(self.controller.suggestions().len()),
            None => view_state.list_offset = 0,
        }

        let revision = self.controller.articles_revision();
        if view_state.entries_revision != revision {
            let entries = self.render_articles();
            view_state.set_entries(entries, revision);
        }
    }

    fn render_articles(&self) -> Vec<RenderedEntry> {
        let meta = self
            .controller
            .selected()
            .map(EntryMeta::from)
            .unwrap_or_default();
        self.controller
            .articles()
            .iter()
            .map(|article| {
                let markup = self
                    .entry_renderer
                    .render(&article.text, &article.word, meta);
                parse_markup(&markup)
            })
            .collect()
    }

    async fn shutdown_worker(&mut self) {
        let _ = self.lookup_tx.send(LookupCommand::Shutdown).await;
        if let Some(handle) = self.worker_handle.take() {
            if let Err(err) = handle.await {
                log::warn!("lookup worker ended abnormally: {err}");
            }
        }
    }
}

fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Article, Translation};
    use crate::store::InMemoryStore;
    use crate::ui::MockUIRenderer;
    use tokio::time::timeout;

    const RESPONSE_TIMEOUT: Duration = Duration::from_secs(2);

    fn app() -> Application {
        let store = InMemoryStore::from_records(
            vec![
                Translation::new("kitap", "crh-ru").with_shortening(3),
                Translation::new("kitaphane", "crh-ru"),
                Translation::new("defter", "crh-ru"),
            ],
            vec![
                Article::new("kitap", "книга; см. defter"),
                Article::new("defter", "тетрадь"),
            ],
        );
        Application::new(
            Arc::new(store),
            Box::new(MockUIRenderer::new()),
            &Config::default(),
            "test.json",
        )
    }

    async fn settle(app: &mut Application, view_state: &mut ViewState) {
        let response = timeout(RESPONSE_TIMEOUT, app.response_rx.recv())
            .await
            .expect("worker responded")
            .expect("worker alive");
        app.handle_response(response, view_state).await.unwrap();
    }

    async fn type_text(app: &mut Application, view_state: &mut ViewState, text: &str) {
        for ch in text.chars() {
            app.handle_action(InputAction::InsertChar(ch), view_state)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn typing_fills_suggestions_latest_wins() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);

        type_text(&mut app, &mut view_state, "kit").await;
        assert!(view_state.searching);

        for _ in 0..3 {
            settle(&mut app, &mut view_state).await;
        }

        let words: Vec<&str> = app
            .controller()
            .suggestions()
            .iter()
            .map(|t| t.word.as_str())
            .collect();
        assert_eq!(words, vec!["kitap", "kitaphane"]);
        assert!(!view_state.searching);
    }

    #[tokio::test]
    async fn selecting_renders_articles() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);

        type_text(&mut app, &mut view_state, "kitap").await;
        for _ in 0..5 {
            settle(&mut app, &mut view_state).await;
        }

        app.handle_action(InputAction::Navigate(NavKey::ArrowDown), &mut view_state)
            .await
            .unwrap();
        app.handle_action(InputAction::Navigate(NavKey::Enter), &mut view_state)
            .await
            .unwrap();
        assert_eq!(app.controller().history(), ["kitap"]);
        assert_eq!(view_state.focus, Focus::Input);

        settle(&mut app, &mut view_state).await;
        assert_eq!(view_state.entries.len(), 1);
        assert_eq!(view_state.link_word(0), Some("defter"));
        assert_eq!(
            view_state.entries[0].plain_lines(),
            vec!["книга".to_string(), "см. defter".to_string()]
        );
    }

    #[tokio::test]
    async fn enter_without_highlight_submits_exact_match() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);

        type_text(&mut app, &mut view_state, "KITAP").await;
        for _ in 0..5 {
            settle(&mut app, &mut view_state).await;
        }
        app.handle_action(InputAction::Navigate(NavKey::Enter), &mut view_state)
            .await
            .unwrap();

        assert_eq!(app.controller().selected().map(|t| t.word.as_str()), Some("kitap"));
    }

    #[tokio::test]
    async fn following_a_link_selects_the_referenced_word() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);

        app.handle_action(InputAction::InsertChar('d'), &mut view_state)
            .await
            .unwrap();
        settle(&mut app, &mut view_state).await;
        let directives = app
            .controller
            .on_suggestion_selected(Translation::new("kitap", "crh-ru"));
        app.dispatch(directives, &mut view_state).await.unwrap();
        settle(&mut app, &mut view_state).await;

        app.handle_action(InputAction::ToggleFocus, &mut view_state)
            .await
            .unwrap();
        app.handle_action(InputAction::NextLink, &mut view_state)
            .await
            .unwrap();
        assert_eq!(view_state.focused_link, Some(0));

        app.handle_action(InputAction::Navigate(NavKey::Enter), &mut view_state)
            .await
            .unwrap();
        assert_eq!(view_state.focus, Focus::Input);
        assert_eq!(app.controller().query_text(), "defter");

        // suggestions for "defter", then its articles
        settle(&mut app, &mut view_state).await;
        assert_eq!(
            app.controller().selected().map(|t| t.word.as_str()),
            Some("defter")
        );
        settle(&mut app, &mut view_state).await;
        assert_eq!(
            view_state.entries[0].plain_lines(),
            vec!["тетрадь".to_string()]
        );
    }

    #[tokio::test]
    async fn enter_in_article_without_link_sets_message() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);
        view_state.focus = Focus::Article;

        app.handle_action(InputAction::Navigate(NavKey::Enter), &mut view_state)
            .await
            .unwrap();
        assert_eq!(
            view_state.status_line.message.as_deref(),
            Some("No link selected")
        );

        app.handle_action(InputAction::Navigate(NavKey::Escape), &mut view_state)
            .await
            .unwrap();
        assert_eq!(view_state.focus, Focus::Input);
    }

    #[tokio::test]
    async fn clicking_a_row_selects_it() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);

        type_text(&mut app, &mut view_state, "kit").await;
        for _ in 0..3 {
            settle(&mut app, &mut view_state).await;
        }

        // second row of the list: border at y=4, rows start at y=5
        app.handle_action(InputAction::Click { column: 3, row: 6 }, &mut view_state)
            .await
            .unwrap();
        assert_eq!(
            app.controller().selected().map(|t| t.word.as_str()),
            Some("kitaphane")
        );

        app.handle_action(InputAction::Click { column: 60, row: 10 }, &mut view_state)
            .await
            .unwrap();
        assert_eq!(view_state.focus, Focus::Article);
    }

    #[tokio::test]
    async fn quit_stops_and_clear_resets() {
        let mut app = app();
        let mut view_state = ViewState::new("test.json", 100, 30);

        type_text(&mut app, &mut view_state, "ki").await;
        assert!(app
            .handle_action(InputAction::ClearInput, &mut view_state)
            .await
            .unwrap());
        assert_eq!(app.controller().query_text(), "");
        assert!(!view_state.searching);

        assert!(!app
            .handle_action(InputAction::Quit, &mut view_state)
            .await
            .unwrap());
        app.shutdown_worker().await;
        assert!(app.worker_handle.is_none());
    }
}
