//! # lugat - Incremental-Search Bilingual Dictionary
//!
//! A terminal lookup widget for bilingual dictionaries: matching headwords appear while you
//! type, a selected headword shows its articles, and cross-references inside an article can
//! be followed with the keyboard or mouse.
//!
//! ## Architecture
//!
//! - [`controller`] - search state machine; returns directives instead of doing I/O
//! - [`lookup`] - generation-tagged query protocol and the async lookup worker
//! - [`store`] - dictionary storage trait, in-memory index and dump loader
//! - [`render`] - article markup pipeline and its parser into styled segments
//! - [`input`], [`ui`] - terminal input collection and ratatui presentation
//! - [`app`] - wires everything together in a tokio event loop

pub mod error;
pub mod model;

pub mod config;
pub mod controller;
pub mod lookup;
pub mod render;
pub mod store;

pub mod input;
pub mod ui;

pub mod app;

pub use error::{LugatError, Result};

pub use app::Application;
pub use controller::{Directive, InteractionState, NavKey, SearchController};
pub use model::{Article, Translation};
pub use render::{render_entry, EntryRenderer};
pub use store::{DictionaryStore, InMemoryStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
