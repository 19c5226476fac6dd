//! Low-level input collection: crossterm polling, wheel coalescing for the article pane, and
//! translation into primitive events for the input service.

use crate::error::Result;
use ratatui::crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Coalescing window for wheel events.
const DEFAULT_COALESCE_WINDOW_MS: u64 = 12;
/// Article lines moved by one wheel tick.
const MOUSE_SCROLL_LINES: u16 = 3;
/// Poll timeout used when the caller does not provide one.
const DEFAULT_POLL_TIMEOUT_MS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Low-level events surfaced by the raw input collector.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInputEvent {
    Key(KeyEvent),
    /// Left button pressed at a terminal cell
    Click { column: u16, row: u16 },
    Resize { width: u16, height: u16 },
    Scroll { direction: ScrollDirection, lines: u16 },
}

/// Merges bursts of same-direction wheel ticks into one scroll.
#[derive(Debug, Clone)]
pub struct WheelCoalescer {
    window: Duration,
    pending: Option<(ScrollDirection, u16, Instant)>,
}

impl WheelCoalescer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Register a tick; returns the previous burst when the direction changed.
    pub fn push(
        &mut self,
        direction: ScrollDirection,
        lines: u16,
        now: Instant,
    ) -> Option<(ScrollDirection, u16)> {
        match self.pending.as_mut() {
            Some((pending_dir, pending_lines, last)) if *pending_dir == direction => {
                *pending_lines = pending_lines.saturating_add(lines);
                *last = now;
                None
            }
            _ => {
                let flushed = self.flush();
                self.pending = Some((direction, lines, now));
                flushed
            }
        }
    }

    /// Emit the burst once no tick arrived for a full window.
    pub fn flush_if_stale(&mut self, now: Instant) -> Option<(ScrollDirection, u16)> {
        match self.pending {
            Some((_, _, last)) if now.duration_since(last) >= self.window => self.flush(),
            _ => None,
        }
    }

    pub fn flush(&mut self) -> Option<(ScrollDirection, u16)> {
        self.pending.take().map(|(direction, lines, _)| (direction, lines))
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

/// Polls crossterm and queues primitive events in arrival order.
#[derive(Debug)]
pub struct RawInputCollector {
    wheel: WheelCoalescer,
    pending_events: VecDeque<RawInputEvent>,
}

impl Default for RawInputCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl RawInputCollector {
    pub fn new() -> Self {
        Self::with_window(Duration::from_millis(DEFAULT_COALESCE_WINDOW_MS))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            wheel: WheelCoalescer::new(window),
            pending_events: VecDeque::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.pending_events.is_empty() && self.wheel.is_empty()
    }

    /// Feed an event without polling the terminal.
    pub fn process_event(&mut self, event: Event) {
        self.enqueue_event(event);
    }

    /// Next queued event, or a stale wheel burst.
    pub fn try_flush(&mut self) -> Option<RawInputEvent> {
        self.wheel
            .flush_if_stale(Instant::now())
            .map(|(direction, lines)| RawInputEvent::Scroll { direction, lines })
            .or_else(|| self.pending_events.pop_front())
    }

    /// Retrieve the next raw input event, blocking up to `timeout`.
    pub fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<RawInputEvent>> {
        if let Some(event) = self.try_flush() {
            return Ok(Some(event));
        }

        let poll_timeout = timeout.unwrap_or(Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS));
        if !event::poll(poll_timeout)? {
            return Ok(self.try_flush());
        }

        let event = event::read()?;
        self.enqueue_event(event);
        Ok(self.pending_events.pop_front())
    }

    fn enqueue_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => {
                self.flush_wheel();
                self.pending_events.push_back(RawInputEvent::Key(key_event));
            }
            Event::Resize(width, height) => {
                self.flush_wheel();
                self.pending_events
                    .push_back(RawInputEvent::Resize { width, height });
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event),
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        let direction = match mouse_event.kind {
            MouseEventKind::ScrollUp => ScrollDirection::Up,
            MouseEventKind::ScrollDown => ScrollDirection::Down,
            MouseEventKind::Down(MouseButton::Left) => {
                self.flush_wheel();
                self.pending_events.push_back(RawInputEvent::Click {
                    column: mouse_event.column,
                    row: mouse_event.row,
                });
                return;
            }
            _ => return,
        };

        if let Some((flushed, lines)) =
            self.wheel
                .push(direction, MOUSE_SCROLL_LINES, Instant::now())
        {
            self.pending_events.push_back(RawInputEvent::Scroll {
                direction: flushed,
                lines,
            });
        }
    }

    fn flush_wheel(&mut self) {
        if let Some((direction, lines)) = self.wheel.flush() {
            self.pending_events
                .push_back(RawInputEvent::Scroll { direction, lines });
        }
    }
}
