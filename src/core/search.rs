// File: src/core/search.rs
use crate::core::translations::TranslationStore;
use crate::core::types::{fold_symbols, EntryId, MatchMode, Symbol, TranslationRecord};
use crate::error::{DictError, Result};

/// Linear scans over the translation store. Independent of the trie.
pub struct SearchEngine<'a> {
    store: &'a TranslationStore,
}

impl<'a> SearchEngine<'a> {
    pub fn new(store: &'a TranslationStore) -> Self {
        Self { store }
    }

    /// Ids of every record whose word relates to `query` under `mode`.
    /// Both sides are compared lowercase.
    pub fn find_matching_words<S: AsRef<str>>(&self, query: &[S], mode: MatchMode) -> Vec<EntryId> {
        self.find_matching_records(query, mode)
            .into_iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Like [`SearchEngine::find_matching_words`], returning the records.
    pub fn find_matching_records<S: AsRef<str>>(
        &self,
        query: &[S],
        mode: MatchMode,
    ) -> Vec<(&'a EntryId, &'a TranslationRecord)> {
        let query = fold_symbols(query, true);
        self.store
            .iter()
            .filter(|(_, record)| word_matches(&fold_symbols(&record.word, true), &query, mode))
            .collect()
    }

    /// Records whose `language` translation contains `term`, ignoring case.
    /// Non-string translation values are skipped.
    pub fn find_words_by_translation(
        &self,
        term: &str,
        language: &str,
    ) -> Result<Vec<(&'a EntryId, &'a TranslationRecord)>> {
        if !self.store.supports_language(language) {
            return Err(DictError::unsupported_language(language));
        }
        let needle = term.to_lowercase();
        Ok(self
            .store
            .iter()
            .filter(|(_, record)| {
                record
                    .translation(language)
                    .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .collect())
    }
}

fn word_matches(word: &[Symbol], query: &[Symbol], mode: MatchMode) -> bool {
    match mode {
        MatchMode::Exact => word == query,
        MatchMode::StartsWith => word.starts_with(query),
        MatchMode::Contains => query.is_empty() || word.windows(query.len()).any(|w| w == query),
    }
}
