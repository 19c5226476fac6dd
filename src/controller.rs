//! Incremental-search controller.
//!
//! [`SearchController`] owns the [`InteractionState`] of one lookup widget and is the only
//! place it is mutated. Handlers never perform side effects themselves: they return
//! [`Directive`]s that the coordinator carries out (send a query to the lookup worker, scroll
//! the suggestion list, move focus back to the input).
//!
//! Asynchronous responses are applied through [`SearchController::apply`]. Each query carries
//! a [`Generation`]; a response is applied only if its generation is still the newest one
//! issued for that kind of query, so out-of-order completions can never overwrite newer state.

use crate::lookup::{Generation, LookupCommand, LookupResponse};
use crate::model::{Article, Translation};

/// Keys the controller reacts to while the input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// Work the presentation layer must carry out after a handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Hand this query to the lookup worker.
    Lookup(LookupCommand),
    /// Bring the suggestion at this index into view.
    ScrollIntoView(usize),
    /// Return keyboard focus to the text input.
    FocusInput,
}

/// State owned by one mounted lookup widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    /// Current input value
    pub query_text: String,
    /// Results of the newest applied prefix query, in store order
    pub suggestions: Vec<Translation>,
    /// Highlighted suggestion; `None` means nothing is highlighted
    pub active_index: Option<usize>,
    /// Most recently selected headword
    pub selected: Option<Translation>,
    /// Articles belonging to `selected`
    pub articles: Vec<Article>,
    /// Every selected word, oldest first. Never deduplicated or trimmed.
    pub history: Vec<String>,
}

/// Keyboard/pointer driven search state machine.
#[derive(Debug, Default)]
pub struct SearchController {
    state: InteractionState,
    next_generation: Generation,
    latest_suggest: Option<Generation>,
    latest_articles: Option<Generation>,
    /// Suggest generation whose response should be followed by a submit
    pending_submit: Option<Generation>,
    articles_revision: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn query_text(&self) -> &str {
        &self.state.query_text
    }

    pub fn suggestions(&self) -> &[Translation] {
        &self.state.suggestions
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index
    }

    pub fn active_suggestion(&self) -> Option<&Translation> {
        self.state
            .active_index
            .and_then(|index| self.state.suggestions.get(index))
    }

    pub fn selected(&self) -> Option<&Translation> {
        self.state.selected.as_ref()
    }

    pub fn articles(&self) -> &[Article] {
        &self.state.articles
    }

    pub fn history(&self) -> &[String] {
        &self.state.history
    }

    /// Bumped whenever `articles` is replaced or cleared.
    pub fn articles_revision(&self) -> u64 {
        self.articles_revision
    }

    /// True while a prefix query has been issued and its response not yet applied.
    pub fn is_awaiting_suggestions(&self) -> bool {
        self.latest_suggest.is_some()
    }

    /// The input text changed.
    pub fn on_text_changed(&mut self, new_text: impl Into<String>) -> Vec<Directive> {
        let new_text = new_text.into();
        self.state.active_index = None;
        self.pending_submit = None;

        if new_text.is_empty() {
            self.state.query_text = new_text;
            self.state.suggestions.clear();
            // Anything still in flight now belongs to an abandoned query.
            self.latest_suggest = None;
            return Vec::new();
        }

        let generation = self.issue_generation();
        self.latest_suggest = Some(generation);
        let prefix = new_text.to_lowercase();
        self.state.query_text = new_text;

        vec![Directive::Lookup(LookupCommand::Suggest { generation, prefix })]
    }

    /// A navigation key was pressed in the input.
    pub fn on_key_down(&mut self, key: NavKey) -> Vec<Directive> {
        let len = self.state.suggestions.len();
        if len == 0 {
            return Vec::new();
        }

        match key {
            NavKey::ArrowDown => {
                let next = match self.state.active_index {
                    Some(index) if index + 1 < len => index + 1,
                    _ => 0,
                };
                self.state.active_index = Some(next);
                vec![Directive::ScrollIntoView(next)]
            }
            NavKey::ArrowUp => {
                let prev = match self.state.active_index {
                    Some(index) if index > 0 && index < len => index - 1,
                    _ => len - 1,
                };
                self.state.active_index = Some(prev);
                vec![Directive::ScrollIntoView(prev)]
            }
            NavKey::Enter => match self.active_suggestion().cloned() {
                Some(translation) => self.on_suggestion_selected(translation),
                None => Vec::new(),
            },
            NavKey::Escape => {
                self.state.suggestions.clear();
                self.state.active_index = None;
                self.latest_suggest = None;
                self.pending_submit = None;
                Vec::new()
            }
        }
    }

    /// Pointer activation of the suggestion row at `index`.
    pub fn on_suggestion_clicked(&mut self, index: usize) -> Vec<Directive> {
        match self.state.suggestions.get(index).cloned() {
            Some(translation) => self.on_suggestion_selected(translation),
            None => Vec::new(),
        }
    }

    /// Select a headword: record it in history and fetch its articles.
    pub fn on_suggestion_selected(&mut self, translation: Translation) -> Vec<Directive> {
        let word = translation.word.clone();
        self.state.query_text = word.clone();
        self.state.history.push(word.clone());
        self.state.selected = Some(translation);
        self.set_articles(Vec::new());

        let generation = self.issue_generation();
        self.latest_articles = Some(generation);

        vec![
            Directive::Lookup(LookupCommand::FetchArticles { generation, word }),
            Directive::FocusInput,
        ]
    }

    /// Select the suggestion that spells the current query, ignoring case.
    pub fn on_submit(&mut self) -> Vec<Directive> {
        let wanted = self.state.query_text.to_lowercase();
        let found = self
            .state
            .suggestions
            .iter()
            .find(|t| t.word.to_lowercase() == wanted)
            .cloned();

        match found {
            Some(translation) => self.on_suggestion_selected(translation),
            None => {
                log::debug!("submit: no suggestion spells {:?}", self.state.query_text);
                Vec::new()
            }
        }
    }

    /// A cross-reference link was activated: search for `word` and submit once results land.
    pub fn on_cross_reference(&mut self, word: &str) -> Vec<Directive> {
        let directives = self.on_text_changed(word);
        self.pending_submit = self.latest_suggest;
        directives
    }

    /// Apply a worker response, discarding it if a newer query has superseded it.
    pub fn apply(&mut self, response: LookupResponse) -> Vec<Directive> {
        match response {
            LookupResponse::Suggestions { generation, result } => {
                if self.latest_suggest != Some(generation) {
                    log::debug!("discarding stale suggestions #{generation}");
                    return Vec::new();
                }
                self.latest_suggest = None;

                self.state.suggestions = result.unwrap_or_else(|err| {
                    log::warn!("prefix query failed: {err}");
                    Vec::new()
                });
                self.state.active_index = None;

                if self.pending_submit == Some(generation) {
                    self.pending_submit = None;
                    return self.on_submit();
                }
                Vec::new()
            }
            LookupResponse::Articles {
                generation,
                word,
                result,
            } => {
                if self.latest_articles != Some(generation) {
                    log::debug!("discarding stale articles #{generation} for {word:?}");
                    return Vec::new();
                }
                self.latest_articles = None;

                let articles = result.unwrap_or_else(|err| {
                    log::warn!("article query for {word:?} failed: {err}");
                    Vec::new()
                });
                self.set_articles(articles);
                Vec::new()
            }
        }
    }

    fn issue_generation(&mut self) -> Generation {
        self.next_generation += 1;
        self.next_generation
    }

    fn set_articles(&mut self, articles: Vec<Article>) {
        self.state.articles = articles;
        self.articles_revision += 1;
    }
}
