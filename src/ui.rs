//! Terminal UI module with ratatui
//!
//! Presentation for the lookup widget. The application loop owns a [`ViewState`] and hands it,
//! together with the controller's interaction state, to a [`UIRenderer`] each frame.

pub mod renderer;
pub mod state;
pub mod terminal;
pub mod theme;

pub use renderer::UIRenderer;
pub use state::{Focus, PaneLayout, StatusLine, ViewState};
pub use terminal::{draw_frame, TerminalUI};
pub use theme::{ColorTheme, ThemeName};

#[cfg(test)]
pub use renderer::tests::MockUIRenderer;
