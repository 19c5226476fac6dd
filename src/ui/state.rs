//! UI state management structures
//!
//! `ViewState` holds presentation-only state: pane focus, list and article scrolling, the
//! rendered articles and the status line. Interaction state (query, suggestions, selection,
//! history) lives in the controller and is passed to the renderer alongside this.

use crate::input::ScrollDirection;
use crate::render::RenderedEntry;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Article,
}

/// Screen regions, computed from the terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    pub input: Rect,
    pub history: Rect,
    pub suggestions: Rect,
    pub article: Rect,
    pub status: Rect,
}

impl PaneLayout {
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(rows[2]);

        Self {
            input: rows[0],
            history: rows[1],
            suggestions: body[0],
            article: body[1],
            status: rows[3],
        }
    }

    /// Suggestion rows visible inside the list border.
    pub fn suggestion_rows(&self) -> usize {
        self.suggestions.height.saturating_sub(2) as usize
    }

    /// Map a terminal cell to a visible suggestion row, given the list's scroll offset.
    pub fn suggestion_at(&self, column: u16, row: u16, offset: usize) -> Option<usize> {
        let inner = inner(self.suggestions);
        let inside = column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        inside.then(|| offset + (row - inner.y) as usize)
    }
}

fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

/// Presentation state owned by the application loop.
#[derive(Debug)]
pub struct ViewState {
    pub viewport_width: u16,
    pub viewport_height: u16,
    pub focus: Focus,
    /// First suggestion shown in the list pane
    pub list_offset: usize,
    /// Vertical scroll of the article pane
    pub article_scroll: u16,
    /// Focused cross-reference link, numbered across all entries
    pub focused_link: Option<usize>,
    /// Rendered articles of the current selection
    pub entries: Vec<RenderedEntry>,
    /// Controller articles revision the entries were rendered from
    pub entries_revision: u64,
    pub status_line: StatusLine,
    /// A prefix query is in flight
    pub searching: bool,
    /// Name of the loaded dictionary, shown in the status line
    pub source_name: String,
}

impl ViewState {
    pub fn new(source_name: impl Into<String>, viewport_width: u16, viewport_height: u16) -> Self {
        Self {
            viewport_width,
            viewport_height,
            focus: Focus::Input,
            list_offset: 0,
            article_scroll: 0,
            focused_link: None,
            entries: Vec::new(),
            entries_revision: 0,
            status_line: StatusLine::new(),
            searching: false,
            source_name: source_name.into(),
        }
    }

    pub fn layout(&self) -> PaneLayout {
        PaneLayout::compute(Rect::new(0, 0, self.viewport_width, self.viewport_height))
    }

    /// Returns true if dimensions actually changed.
    pub fn update_terminal_size(&mut self, width: u16, height: u16) -> bool {
        let changed = self.viewport_width != width || self.viewport_height != height;
        if changed {
            self.viewport_width = width;
            self.viewport_height = height;
        }
        changed
    }

    /// Adjust the list offset so that `index` is visible.
    pub fn scroll_into_view(&mut self, index: usize) {
        let rows = self.layout().suggestion_rows().max(1);
        if index < self.list_offset {
            self.list_offset = index;
        } else if index >= self.list_offset + rows {
            self.list_offset = index + 1 - rows;
        }
    }

    /// Keep the list offset valid after the suggestion set was replaced.
    pub fn clamp_list_offset(&mut self, suggestion_count: usize) {
        let rows = self.layout().suggestion_rows().max(1);
        let max_offset = suggestion_count.saturating_sub(rows);
        self.list_offset = self.list_offset.min(max_offset);
    }

    pub fn suggestion_at(&self, column: u16, row: u16) -> Option<usize> {
        self.layout().suggestion_at(column, row, self.list_offset)
    }

    /// Replace the rendered articles; resets article scrolling and link focus.
    pub fn set_entries(&mut self, entries: Vec<RenderedEntry>, revision: u64) {
        self.entries = entries;
        self.entries_revision = revision;
        self.article_scroll = 0;
        self.focused_link = None;
    }

    pub fn link_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.links.len()).sum()
    }

    /// Word of the link with the given global index.
    pub fn link_word(&self, index: usize) -> Option<&str> {
        let mut remaining = index;
        for entry in &self.entries {
            if remaining < entry.links.len() {
                return Some(&entry.links[remaining]);
            }
            remaining -= entry.links.len();
        }
        None
    }

    /// Global index of the first link of entry `entry_index`.
    pub fn link_base(&self, entry_index: usize) -> usize {
        self.entries
            .iter()
            .take(entry_index)
            .map(|entry| entry.links.len())
            .sum()
    }

    /// Move link focus forward or backward, wrapping around.
    pub fn cycle_link(&mut self, forward: bool) {
        let count = self.link_count();
        if count == 0 {
            self.focused_link = None;
            return;
        }
        self.focused_link = Some(match (self.focused_link, forward) {
            (Some(index), true) => (index + 1) % count,
            (Some(index), false) => (index + count - 1) % count,
            (None, true) => 0,
            (None, false) => count - 1,
        });
    }

    /// Scroll the article pane; the last row never scrolls above the top of the pane.
    pub fn scroll_article(&mut self, direction: ScrollDirection, lines: u16) {
        let max_scroll = self.article_row_count().saturating_sub(1);
        self.article_scroll = match direction {
            ScrollDirection::Up => self.article_scroll.saturating_sub(lines),
            ScrollDirection::Down => self.article_scroll.saturating_add(lines).min(max_scroll),
        };
    }

    /// Rows the article pane content occupies once wrapped, blank separators included.
    pub fn article_row_count(&self) -> u16 {
        let width = usize::from(self.layout().article.width.saturating_sub(2).max(1));
        let rows: usize = self
            .entries
            .iter()
            .flat_map(|entry| &entry.lines)
            .map(|line| {
                let chars: usize = line.iter().map(|segment| segment.text.chars().count()).sum();
                chars.div_ceil(width).max(1)
            })
            .sum();
        let separators = self.entries.len().saturating_sub(1);
        u16::try_from(rows + separators).unwrap_or(u16::MAX)
    }

    /// Article rows visible inside the pane border.
    pub fn article_page(&self) -> u16 {
        self.layout().article.height.saturating_sub(2).max(1)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Article,
            Focus::Article => Focus::Input,
        };
    }
}

/// Status line information
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    pub message: Option<String>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Format the status line: source, match count, and a transient message.
    pub fn format_status_line(&self, source: &str, matches: usize, searching: bool) -> String {
        let count = if searching {
            "searching…".to_string()
        } else {
            match matches {
                0 => "no matches".to_string(),
                1 => "1 match".to_string(),
                n => format!("{n} matches"),
            }
        };

        match self.message {
            Some(ref message) => format!("{source} | {count} | {message}"),
            None => format!("{source} | {count}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::parse_markup;

    #[test]
    fn layout_places_list_left_of_article() {
        let layout = PaneLayout::compute(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.history.y, 3);
        assert_eq!(layout.suggestions.y, 4);
        assert_eq!(layout.suggestions.height, 25);
        assert_eq!(layout.suggestions.width, 30);
        assert_eq!(layout.article.x, 30);
        assert_eq!(layout.status.y, 29);
        assert_eq!(layout.suggestion_rows(), 23);
    }

    #[test]
    fn click_maps_to_suggestion_row() {
        let layout = PaneLayout::compute(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.suggestion_at(5, 5, 0), Some(0));
        assert_eq!(layout.suggestion_at(5, 7, 10), Some(12));
        assert_eq!(layout.suggestion_at(0, 5, 0), None, "left border");
        assert_eq!(layout.suggestion_at(50, 5, 0), None, "article pane");
        assert_eq!(layout.suggestion_at(5, 2, 0), None, "input box");
    }

    #[test]
    fn scroll_into_view_moves_offset_minimally() {
        let mut state = ViewState::new("crh-ru.json", 100, 30);
        let rows = state.layout().suggestion_rows();

        state.scroll_into_view(rows + 4);
        assert_eq!(state.list_offset, 5);
        state.scroll_into_view(6);
        assert_eq!(state.list_offset, 5);
        state.scroll_into_view(0);
        assert_eq!(state.list_offset, 0);
    }

    #[test]
    fn clamp_keeps_offset_inside_new_list() {
        let mut state = ViewState::new("d", 100, 30);
        state.list_offset = 40;
        state.clamp_list_offset(30);
        assert_eq!(state.list_offset, 30 - state.layout().suggestion_rows());
        state.clamp_list_offset(3);
        assert_eq!(state.list_offset, 0);
    }

    #[test]
    fn links_are_numbered_across_entries() {
        let mut state = ViewState::new("d", 80, 24);
        state.set_entries(
            vec![
                parse_markup(r#"<a class="xref">bir</a>"#),
                parse_markup(r#"<a class="xref">eki</a>, <a class="xref">üç</a>"#),
            ],
            1,
        );

        assert_eq!(state.link_count(), 3);
        assert_eq!(state.link_word(2), Some("üç"));
        assert_eq!(state.link_word(3), None);
        assert_eq!(state.link_base(1), 1);

        state.cycle_link(false);
        assert_eq!(state.focused_link, Some(2));
        state.cycle_link(true);
        assert_eq!(state.focused_link, Some(0));
    }

    #[test]
    fn new_entries_reset_article_position() {
        let mut state = ViewState::new("d", 80, 24);
        state.set_entries(vec![parse_markup(&["satır"; 20].join("<br/>"))], 1);
        state.scroll_article(ScrollDirection::Down, 5);
        assert_eq!(state.article_scroll, 5);
        state.focused_link = Some(1);
        state.set_entries(Vec::new(), 2);
        assert_eq!(state.article_scroll, 0);
        assert_eq!(state.focused_link, None);
        state.scroll_article(ScrollDirection::Up, 3);
        assert_eq!(state.article_scroll, 0);
    }

    #[test]
    fn article_scroll_stops_at_last_row() {
        let mut state = ViewState::new("d", 80, 24);
        state.scroll_article(ScrollDirection::Down, 10);
        assert_eq!(state.article_scroll, 0, "nothing to scroll");

        state.set_entries(
            vec![
                parse_markup("bir<br/>eki<br/>üç"),
                parse_markup(&"a".repeat(100)),
            ],
            1,
        );
        // 3 lines, a separator, then 100 chars wrapped into the 54-column pane
        assert_eq!(state.layout().article.width, 56);
        assert_eq!(state.article_row_count(), 6);

        state.scroll_article(ScrollDirection::Down, 100);
        assert_eq!(state.article_scroll, 5);
        state.scroll_article(ScrollDirection::Down, u16::MAX);
        assert_eq!(state.article_scroll, 5);
        state.scroll_article(ScrollDirection::Up, 2);
        assert_eq!(state.article_scroll, 3);
    }

    #[test]
    fn test_terminal_resize() {
        let mut state = ViewState::new("d", 80, 24);
        assert!(!state.update_terminal_size(80, 24));
        assert!(state.update_terminal_size(120, 30));
        assert_eq!(state.viewport_width, 120);
        assert_eq!(state.viewport_height, 30);
    }

    #[test]
    fn test_status_line_format() {
        let mut status = StatusLine::new();
        assert_eq!(status.format_status_line("crh-ru.json", 0, false), "crh-ru.json | no matches");
        assert_eq!(status.format_status_line("crh-ru.json", 1, false), "crh-ru.json | 1 match");
        assert_eq!(status.format_status_line("crh-ru.json", 7, true), "crh-ru.json | searching…");

        status.set_message("Lookup failed".to_string());
        assert_eq!(
            status.format_status_line("crh-ru.json", 7, false),
            "crh-ru.json | 7 matches | Lookup failed"
        );
        status.clear_message();
        assert_eq!(status.format_status_line("x", 2, false), "x | 2 matches");
    }
}
