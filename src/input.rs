//! Input subsystem.
//!
//! [`raw`] polls crossterm and coalesces wheel events; [`service`] maps them to
//! [`InputAction`]s and runs the blocking input thread.

pub mod raw;
pub mod service;

pub use raw::ScrollDirection;
pub use service::{map_key_event, spawn_input_thread, InputAction, InputService};
