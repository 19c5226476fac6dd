//! High-level input service.
//!
//! Turns raw terminal events into [`InputAction`]s. Key bindings do not depend on which pane
//! has focus; the application decides what an action means for the focused pane.

use crate::controller::NavKey;
use crate::error::Result;
use crate::input::raw::{RawInputCollector, RawInputEvent, ScrollDirection};
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// High-level input actions consumed by the application loop.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    InsertChar(char),
    DeleteChar,
    ClearInput,
    Navigate(NavKey),
    ToggleFocus,
    NextLink,
    PreviousLink,
    Scroll {
        direction: ScrollDirection,
        lines: u16,
    },
    Page(ScrollDirection),
    Click {
        column: u16,
        row: u16,
    },
    Resize {
        width: u16,
        height: u16,
    },
    Quit,
    NoAction,
}

/// Map a key press to an action.
pub fn map_key_event(key_event: KeyEvent) -> InputAction {
    if key_event.kind != KeyEventKind::Press {
        return InputAction::NoAction;
    }

    let control = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    match key_event.code {
        KeyCode::Char('c') | KeyCode::Char('q') if control => InputAction::Quit,
        KeyCode::Char('u') if control => InputAction::ClearInput,
        KeyCode::Char(ch) if !control && !alt => InputAction::InsertChar(ch),
        KeyCode::Backspace => InputAction::DeleteChar,
        KeyCode::Up => InputAction::Navigate(NavKey::ArrowUp),
        KeyCode::Down => InputAction::Navigate(NavKey::ArrowDown),
        KeyCode::Enter => InputAction::Navigate(NavKey::Enter),
        KeyCode::Esc => InputAction::Navigate(NavKey::Escape),
        KeyCode::Tab | KeyCode::BackTab => InputAction::ToggleFocus,
        KeyCode::Right => InputAction::NextLink,
        KeyCode::Left => InputAction::PreviousLink,
        KeyCode::PageUp => InputAction::Page(ScrollDirection::Up),
        KeyCode::PageDown => InputAction::Page(ScrollDirection::Down),
        _ => InputAction::NoAction,
    }
}

/// Service responsible for producing `InputAction`s from terminal events.
pub struct InputService {
    raw_input: RawInputCollector,
}

impl InputService {
    pub fn new() -> Self {
        Self {
            raw_input: RawInputCollector::new(),
        }
    }

    pub fn poll_actions(&mut self, timeout: Option<Duration>) -> Result<Vec<InputAction>> {
        let mut actions = Vec::new();

        if let Some(raw_event) = self.raw_input.poll_event(timeout)? {
            actions.extend(Self::process_raw_event(raw_event));
            while let Some(extra_event) = self.raw_input.try_flush() {
                actions.extend(Self::process_raw_event(extra_event));
            }
        }

        Ok(actions)
    }

    pub fn process_event(&mut self, event: Event) -> Vec<InputAction> {
        self.raw_input.process_event(event);
        let mut actions = Vec::new();
        while let Some(raw_event) = self.raw_input.try_flush() {
            actions.extend(Self::process_raw_event(raw_event));
        }
        actions
    }

    fn process_raw_event(event: RawInputEvent) -> Option<InputAction> {
        let action = match event {
            RawInputEvent::Key(key_event) => map_key_event(key_event),
            RawInputEvent::Click { column, row } => InputAction::Click { column, row },
            RawInputEvent::Resize { width, height } => InputAction::Resize { width, height },
            RawInputEvent::Scroll { direction, lines } => InputAction::Scroll { direction, lines },
        };

        match action {
            InputAction::NoAction => None,
            _ => Some(action),
        }
    }
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a blocking thread that polls for terminal events and forwards actions to the app loop.
pub fn spawn_input_thread(
    tx: UnboundedSender<InputAction>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut service = InputService::new();
        while !shutdown.load(Ordering::SeqCst) {
            match service.poll_actions(Some(poll_interval)) {
                Ok(actions) => {
                    for action in actions {
                        if tx.send(action).is_err() {
                            return;
                        }
                    }
                }
                Err(err) => {
                    log::error!("input thread error: {}", err);
                    break;
                }
            }
        }
    })
}
