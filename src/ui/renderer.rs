//! UI renderer trait
//!
//! This module defines the `UIRenderer` trait for drawing the lookup widget and managing
//! terminal lifecycle hooks such as initialization and cleanup.

use crate::controller::InteractionState;
use crate::error::Result;
use crate::ui::state::ViewState;

/// Core trait for UI rendering
pub trait UIRenderer {
    /// Draw the input, history line, suggestion list, article pane and status line.
    fn render(&mut self, view_state: &ViewState, interaction: &InteractionState) -> Result<()>;

    /// Enter raw mode and the alternate screen, enable mouse capture.
    fn initialize(&mut self) -> Result<()>;

    /// Restore the terminal to its original state.
    fn cleanup(&mut self) -> Result<()>;

    /// Get current terminal dimensions
    fn get_terminal_size(&self) -> Result<(u16, u16)>; // (width, height)
}
