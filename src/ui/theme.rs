//! Color theme and styling definitions using ratatui colors
//!
//! Themes style both the chrome (borders, status line, suggestion highlight) and the segments
//! of rendered dictionary entries (headword leads, specialized terms, cross-references).

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Theme selector used by the configuration file and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
    HighContrast,
}

impl std::str::FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "default" => Ok(Self::Default),
            "monochrome" => Ok(Self::Monochrome),
            "high_contrast" => Ok(Self::HighContrast),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Color theme for terminal UI elements
#[derive(Debug, Clone)]
pub struct ColorTheme {
    /// Normal text color (None uses terminal default)
    pub normal_text: Option<Color>,

    /// Highlighted suggestion row
    pub active_suggestion: Style,

    /// Bolded lead of a `lead - rest` line
    pub headword: Style,

    /// Specialized-term spans (subject-field abbreviations, slashed text)
    pub term: Style,

    /// `см.` / `ср.` label in front of cross-references
    pub xref_label: Style,

    /// Cross-reference link
    pub link: Style,

    /// Link focused for keyboard activation
    pub focused_link: Style,

    /// Border of the pane without focus
    pub border: Color,

    /// Border of the focused pane
    pub focused_border: Color,

    /// History line under the input
    pub history: Style,

    /// Status line background
    pub status_bg: Color,

    /// Status line text
    pub status_fg: Color,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            normal_text: None,
            active_suggestion: Style::default().fg(Color::Black).bg(Color::Yellow),
            headword: Style::default().add_modifier(Modifier::BOLD),
            term: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
            xref_label: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
            link: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            focused_link: Style::default().fg(Color::Black).bg(Color::Cyan),
            border: Color::DarkGray,
            focused_border: Color::Blue,
            history: Style::default().fg(Color::DarkGray),
            status_bg: Color::Blue,
            status_fg: Color::White,
        }
    }
}

impl ColorTheme {
    pub fn from_name(name: ThemeName) -> Self {
        match name {
            ThemeName::Default => Self::default(),
            ThemeName::Monochrome => Self::monochrome(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    /// Create a monochrome theme for terminals without color support
    pub fn monochrome() -> Self {
        Self {
            normal_text: None,
            active_suggestion: Style::default().add_modifier(Modifier::REVERSED),
            headword: Style::default().add_modifier(Modifier::BOLD),
            term: Style::default().add_modifier(Modifier::ITALIC),
            xref_label: Style::default().add_modifier(Modifier::ITALIC),
            link: Style::default().add_modifier(Modifier::UNDERLINED),
            focused_link: Style::default().add_modifier(Modifier::REVERSED),
            border: Color::Reset,
            focused_border: Color::Reset,
            history: Style::default().add_modifier(Modifier::DIM),
            status_bg: Color::Black,
            status_fg: Color::White,
        }
    }

    /// Create a high-contrast theme for accessibility
    pub fn high_contrast() -> Self {
        Self {
            normal_text: Some(Color::White),
            active_suggestion: Style::default().fg(Color::Black).bg(Color::LightYellow),
            headword: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            term: Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::ITALIC),
            xref_label: Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::ITALIC),
            link: Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::UNDERLINED),
            focused_link: Style::default().fg(Color::Black).bg(Color::LightCyan),
            border: Color::Gray,
            focused_border: Color::LightYellow,
            history: Style::default().fg(Color::Gray),
            status_bg: Color::White,
            status_fg: Color::Black,
        }
    }

    pub fn text_style(&self) -> Style {
        match self.normal_text {
            Some(color) => Style::default().fg(color),
            None => Style::default(),
        }
    }
}
