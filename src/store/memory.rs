//! In-memory dictionary index.
//!
//! Headwords are kept in a `BTreeMap` keyed by their lower-cased form so a prefix query is a
//! single range scan. Articles are grouped by exact word.

use crate::error::Result;
use crate::model::{Article, Translation};
use crate::store::DictionaryStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};

/// Sorted in-memory store implementing [`DictionaryStore`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    translations: BTreeMap<String, Vec<Translation>>,
    articles: HashMap<String, Vec<Article>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already decoded records.
    pub fn from_records(translations: Vec<Translation>, articles: Vec<Article>) -> Self {
        let mut store = Self::new();
        for translation in translations {
            store.insert_translation(translation);
        }
        for article in articles {
            store.insert_article(article);
        }
        store
    }

    pub fn insert_translation(&mut self, translation: Translation) {
        self.translations
            .entry(translation.word.to_lowercase())
            .or_default()
            .push(translation);
    }

    pub fn insert_article(&mut self, article: Article) {
        self.articles
            .entry(article.word.clone())
            .or_default()
            .push(article);
    }

    /// Number of headwords held by the store.
    pub fn translation_count(&self) -> usize {
        self.translations.values().map(Vec::len).sum()
    }

    /// Number of article bodies held by the store.
    pub fn article_count(&self) -> usize {
        self.articles.values().map(Vec::len).sum()
    }

    fn prefix_matches(&self, prefix: &str) -> Vec<Translation> {
        let folded = prefix.to_lowercase();
        self.translations
            .range(folded.clone()..)
            .take_while(|(key, _)| key.starts_with(&folded))
            .flat_map(|(_, entries)| entries.iter().cloned())
            .collect()
    }
}

#[async_trait]
impl DictionaryStore for InMemoryStore {
    async fn query_by_prefix(&self, prefix: &str) -> Result<Vec<Translation>> {
        Ok(self.prefix_matches(prefix))
    }

    async fn query_articles_by_word(&self, word: &str) -> Result<Vec<Article>> {
        Ok(self.articles.get(word).cloned().unwrap_or_default())
    }
}
