//! Data-access abstraction for dictionary lookups.
//!
//! The controller never talks to storage directly; it issues commands to the lookup worker,
//! which runs them against a [`DictionaryStore`]. Implementations decide how data is held.

use crate::error::Result;
use crate::model::{Article, Translation};
use async_trait::async_trait;

pub mod loader;
pub mod memory;

pub use loader::{detect_compression, load_dictionary, CompressionType, DictionaryDump};
pub use memory::InMemoryStore;

/// Query interface consumed by the lookup worker.
#[async_trait]
pub trait DictionaryStore: Send + Sync {
    /// All translations whose word begins with `prefix`, compared case-insensitively.
    ///
    /// Callers pass an already lower-cased prefix.
    async fn query_by_prefix(&self, prefix: &str) -> Result<Vec<Translation>>;

    /// All articles whose word equals `word` exactly.
    async fn query_articles_by_word(&self, word: &str) -> Result<Vec<Article>>;
}
