//! Terminal UI implementation using ratatui
//!
//! Draws the lookup widget: the query input with its cursor, the history line, the suggestion
//! list with the active row highlighted, the rendered articles of the selected headword, and a
//! status line. All drawing goes through [`draw_frame`], which works on any ratatui backend.

use crate::controller::InteractionState;
use crate::error::{LugatError, Result};
use crate::render::{RenderedEntry, Segment};
use crate::ui::state::{Focus, ViewState};
use crate::ui::{ColorTheme, UIRenderer};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

const HISTORY_SEPARATOR: &str = " › ";

/// Terminal UI implementation with ratatui backend
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
    theme: ColorTheme,
}

impl TerminalUI {
    pub fn new() -> Result<Self> {
        Self::with_theme(ColorTheme::default())
    }

    pub fn with_theme(theme: ColorTheme) -> Result<Self> {
        Ok(Self {
            terminal: None,
            theme,
        })
    }
}

/// Draw one frame of the lookup widget.
pub fn draw_frame(
    frame: &mut Frame,
    view_state: &ViewState,
    interaction: &InteractionState,
    theme: &ColorTheme,
) {
    let layout = view_state.layout();

    render_input(frame, layout.input, view_state, interaction, theme);
    render_history(frame, layout.history, interaction, theme);
    render_suggestions(frame, layout.suggestions, view_state, interaction, theme);
    render_article(frame, layout.article, view_state, interaction, theme);
    render_status(frame, layout.status, view_state, interaction, theme);
}

fn pane_block<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &ColorTheme) -> Block<'a> {
    let border = if focused {
        theme.focused_border
    } else {
        theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    view_state: &ViewState,
    interaction: &InteractionState,
    theme: &ColorTheme,
) {
    let focused = view_state.focus == Focus::Input;
    let input = Paragraph::new(interaction.query_text.as_str())
        .style(theme.text_style())
        .block(pane_block("Search", focused, theme));
    frame.render_widget(input, area);

    if focused && area.width > 2 && area.height > 2 {
        frame.set_cursor(input_cursor_x(area, &interaction.query_text), area.y + 1);
    }
}

/// Column after the last typed character, kept inside the input box border.
fn input_cursor_x(area: Rect, query: &str) -> u16 {
    let typed = u16::try_from(query.chars().count()).unwrap_or(u16::MAX);
    let last_inner = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(typed).min(last_inner)
}

fn render_history(frame: &mut Frame, area: Rect, interaction: &InteractionState, theme: &ColorTheme) {
    let text = history_tail(&interaction.history, area.width as usize);
    frame.render_widget(Paragraph::new(text).style(theme.history), area);
}

/// Newest history words that fit in `width` columns, oldest first.
pub fn history_tail(history: &[String], width: usize) -> String {
    let separator = HISTORY_SEPARATOR.chars().count();
    let mut used = 0;
    let mut shown: Vec<&str> = Vec::new();

    for word in history.iter().rev() {
        let cost = word.chars().count() + if shown.is_empty() { 1 } else { separator };
        if used + cost > width {
            break;
        }
        used += cost;
        shown.push(word);
    }

    shown.reverse();
    if shown.is_empty() {
        String::new()
    } else {
        format!(" {}", shown.join(HISTORY_SEPARATOR))
    }
}

fn render_suggestions(
    frame: &mut Frame,
    area: Rect,
    view_state: &ViewState,
    interaction: &InteractionState,
    theme: &ColorTheme,
) {
    let rows = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = interaction
        .suggestions
        .iter()
        .enumerate()
        .skip(view_state.list_offset)
        .take(rows)
        .map(|(index, translation)| {
            let style = if interaction.active_index == Some(index) {
                theme.active_suggestion
            } else {
                theme.text_style()
            };
            let mut spans = vec![Span::styled(translation.word.as_str(), style)];
            if !translation.dict.is_empty() {
                spans.push(Span::styled(
                    format!(" {}", translation.dict),
                    theme.history,
                ));
            }
            Line::from(spans)
        })
        .collect();

    let list = Paragraph::new(lines).block(pane_block("Words", false, theme));
    frame.render_widget(list, area);
}

fn render_article(
    frame: &mut Frame,
    area: Rect,
    view_state: &ViewState,
    interaction: &InteractionState,
    theme: &ColorTheme,
) {
    let focused = view_state.focus == Focus::Article;
    let title = match interaction.selected {
        Some(ref translation) => format!("{} ({})", translation.word, translation.dict),
        None => "Article".to_string(),
    };

    let focused_link = if focused { view_state.focused_link } else { None };
    let mut lines: Vec<Line> = Vec::new();
    for (entry_index, entry) in view_state.entries.iter().enumerate() {
        if entry_index > 0 {
            lines.push(Line::default());
        }
        let base = view_state.link_base(entry_index);
        lines.extend(entry_lines(entry, base, focused_link, theme));
    }

    let article = Paragraph::new(lines)
        .style(theme.text_style())
        .block(pane_block(title, focused, theme))
        .wrap(Wrap { trim: false })
        .scroll((view_state.article_scroll, 0));
    frame.render_widget(article, area);
}

/// Style the segments of one entry; `base` is the global number of the entry's first link.
fn entry_lines<'a>(
    entry: &'a RenderedEntry,
    base: usize,
    focused_link: Option<usize>,
    theme: &ColorTheme,
) -> Vec<Line<'a>> {
    entry
        .lines
        .iter()
        .map(|segments| {
            Line::from(
                segments
                    .iter()
                    .map(|segment| {
                        Span::styled(
                            segment.text.as_str(),
                            segment_style(segment, base, focused_link, theme),
                        )
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn segment_style(
    segment: &Segment,
    base: usize,
    focused_link: Option<usize>,
    theme: &ColorTheme,
) -> Style {
    let mut style = theme.text_style();
    if segment.style.bold {
        style = style.patch(theme.headword);
    }
    if segment.style.term {
        style = style.patch(theme.term);
    }
    if segment.style.xref_label {
        style = style.patch(theme.xref_label);
    }
    if let Some(link) = segment.link {
        style = if focused_link == Some(base + link) {
            style.patch(theme.focused_link)
        } else {
            style.patch(theme.link)
        };
    }
    style
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    view_state: &ViewState,
    interaction: &InteractionState,
    theme: &ColorTheme,
) {
    let status_text = view_state.status_line.format_status_line(
        &view_state.source_name,
        interaction.suggestions.len(),
        view_state.searching,
    );

    let status_style = Style::default().bg(theme.status_bg).fg(theme.status_fg);
    frame.render_widget(Paragraph::new(status_text).style(status_style), area);
}

impl UIRenderer for TerminalUI {
    fn render(&mut self, view_state: &ViewState, interaction: &InteractionState) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            let theme = &self.theme;
            terminal
                .draw(|frame| draw_frame(frame, view_state, interaction, theme))
                .map_err(|err| LugatError::ui(format!("failed to draw frame: {err}")))?;
        }
        Ok(())
    }

    fn initialize(&mut self) -> Result<()> {
        enable_raw_mode().map_err(|err| LugatError::ui(format!("raw mode: {err}")))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|err| LugatError::ui(format!("alternate screen: {err}")))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|err| LugatError::ui(format!("terminal: {err}")))?;
        self.terminal = Some(terminal);

        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if let Some(mut terminal) = self.terminal.take() {
            disable_raw_mode().map_err(|err| LugatError::ui(format!("raw mode: {err}")))?;
            execute!(
                terminal.backend_mut(),
                LeaveAlternateScreen,
                DisableMouseCapture
            )
            .map_err(|err| LugatError::ui(format!("alternate screen: {err}")))?;
            terminal
                .show_cursor()
                .map_err(|err| LugatError::ui(format!("cursor: {err}")))?;
        }
        Ok(())
    }

    fn get_terminal_size(&self) -> Result<(u16, u16)> {
        ratatui::crossterm::terminal::size()
            .map_err(|err| LugatError::ui(format!("terminal size: {err}")))
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Translation;
    use crate::render::parse_markup;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::style::Color;

    fn draw(view_state: &ViewState, interaction: &InteractionState) -> Buffer {
        let backend = TestBackend::new(view_state.viewport_width, view_state.viewport_height);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = ColorTheme::default();
        terminal
            .draw(|frame| draw_frame(frame, view_state, interaction, &theme))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer.get(x, y).symbol())
            .collect()
    }

    fn interaction_with(words: &[&str]) -> InteractionState {
        InteractionState {
            query_text: "ki".to_string(),
            suggestions: words
                .iter()
                .map(|w| Translation::new(*w, "crh-ru"))
                .collect(),
            ..InteractionState::default()
        }
    }

    #[test]
    fn test_terminal_ui_creation() {
        let ui = TerminalUI::new().unwrap();
        assert!(ui.terminal.is_none());
        assert_eq!(ui.theme.status_bg, Color::Blue);

        let ui_with_theme = TerminalUI::with_theme(ColorTheme::monochrome()).unwrap();
        assert_eq!(ui_with_theme.theme.status_bg, Color::Black);
    }

    #[test]
    fn input_and_suggestions_are_drawn() {
        let view_state = ViewState::new("crh-ru.json", 60, 12);
        let interaction = interaction_with(&["kitap", "kiyik"]);
        let buffer = draw(&view_state, &interaction);

        assert!(row_text(&buffer, 1).contains("ki"));
        assert!(row_text(&buffer, 5).contains("kitap"));
        assert!(row_text(&buffer, 6).contains("kiyik"));
        assert!(row_text(&buffer, 11).starts_with("crh-ru.json | 2 matches"));
    }

    #[test]
    fn cursor_stays_inside_input_box() {
        let area = Rect::new(0, 0, 60, 3);
        assert_eq!(input_cursor_x(area, ""), 1);
        assert_eq!(input_cursor_x(area, "kün"), 4);
        assert_eq!(input_cursor_x(area, &"a".repeat(200)), 58);
        assert_eq!(input_cursor_x(area, &"a".repeat(70_000)), 58);

        let offset = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(input_cursor_x(offset, &"a".repeat(70_000)), u16::MAX - 2);
    }

    #[test]
    fn very_long_query_draws() {
        let view_state = ViewState::new("d", 60, 12);
        let mut interaction = interaction_with(&["kitap"]);
        interaction.query_text = "k".repeat(70_000);
        let buffer = draw(&view_state, &interaction);
        assert!(row_text(&buffer, 1).contains("kkkk"));
    }

    #[test]
    fn active_suggestion_is_highlighted() {
        let view_state = ViewState::new("d", 60, 12);
        let mut interaction = interaction_with(&["kitap", "kiyik"]);
        interaction.active_index = Some(1);
        let buffer = draw(&view_state, &interaction);

        assert_eq!(buffer.get(1, 6).bg, Color::Yellow);
        assert_ne!(buffer.get(1, 5).bg, Color::Yellow);
    }

    #[test]
    fn list_offset_scrolls_suggestions() {
        let mut view_state = ViewState::new("d", 60, 12);
        view_state.list_offset = 1;
        let interaction = interaction_with(&["kitap", "kiyik"]);
        let buffer = draw(&view_state, &interaction);
        assert!(row_text(&buffer, 5).contains("kiyik"));
    }

    #[test]
    fn article_pane_shows_entries_and_focused_link() {
        let mut view_state = ViewState::new("d", 80, 12);
        view_state.set_entries(
            vec![parse_markup(
                r#"<b>kitap</b> книга<br/><i class="link">см.</i> <a class="xref">defter</a>"#,
            )],
            1,
        );
        view_state.focus = Focus::Article;
        view_state.focused_link = Some(0);
        let mut interaction = interaction_with(&["kitap"]);
        interaction.selected = Some(Translation::new("kitap", "crh-ru"));
        let buffer = draw(&view_state, &interaction);

        let article_x = view_state.layout().article.x;
        assert!(row_text(&buffer, 4).contains("kitap (crh-ru)"));
        assert!(row_text(&buffer, 5).contains("kitap книга"));
        assert!(row_text(&buffer, 6).contains("см. defter"));

        // "defter" starts four columns into the pane content
        assert_eq!(buffer.get(article_x + 5, 6).symbol(), "d");
        assert_eq!(buffer.get(article_x + 5, 6).bg, Color::Cyan);
        assert_ne!(buffer.get(article_x + 1, 6).bg, Color::Cyan);
    }

    #[test]
    fn history_tail_keeps_newest_words() {
        let history: Vec<String> = ["alma", "kitap", "defter"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(history_tail(&history, 80), " alma › kitap › defter");
        assert_eq!(history_tail(&history, 16), " kitap › defter");
        assert_eq!(history_tail(&history, 3), "");
        assert_eq!(history_tail(&[], 10), "");
    }
}
