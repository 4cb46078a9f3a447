// File: src/core/translations.rs
use crate::core::types::{EntryId, TranslationRecord};
use crate::error::{DictError, Result};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// Maps entry ids to their canonical word and translations.
///
/// Records keep installation order so searches return them deterministically.
/// Ids are matched by their string form, so `EntryId::Int(3)` and
/// `EntryId::Str("3")` address the same record.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    records: Vec<(EntryId, TranslationRecord)>,
    index: HashMap<String, usize>,
    languages: Vec<String>,
}

impl TranslationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole store with `records`.
    ///
    /// The supported languages are taken from the first record. Nothing is
    /// changed if validation fails.
    pub fn install<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = (EntryId, TranslationRecord)>,
    {
        let mut next = TranslationStore::new();
        for (id, record) in records {
            id.validate()?;
            next.put(id, record);
        }
        if next.records.is_empty() {
            return Err(DictError::validation("translations must be a non-empty mapping"));
        }

        debug!(
            records = next.records.len(),
            languages = ?next.languages,
            "installed translations"
        );
        *self = next;
        Ok(())
    }

    /// Adds or replaces a single record without touching the language set,
    /// unless this is the first record.
    pub fn put(&mut self, id: EntryId, record: TranslationRecord) {
        let key = id.key();
        match self.index.get(&key) {
            Some(&pos) => self.records[pos] = (id, record),
            None => {
                if self.records.is_empty() {
                    self.languages = record.translations.keys().cloned().collect();
                }
                self.index.insert(key, self.records.len());
                self.records.push((id, record));
            }
        }
    }

    /// The record for `id`, or an empty record if there is none.
    pub fn get(&self, id: &EntryId) -> Result<Cow<'_, TranslationRecord>> {
        id.validate()?;
        Ok(match self.index.get(&id.key()) {
            Some(&pos) => Cow::Borrowed(&self.records[pos].1),
            None => Cow::Owned(TranslationRecord::default()),
        })
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.index.contains_key(&id.key())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntryId, &TranslationRecord)> {
        self.records.iter().map(|(id, record)| (id, record))
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn supports_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &[&str], en: &str) -> TranslationRecord {
        TranslationRecord::new(word.iter().map(|s| s.to_string()).collect())
            .with_translation("transliteration", "x")
            .with_translation("en", en)
    }

    #[test]
    fn install_derives_languages_from_first_record() {
        let mut store = TranslationStore::new();
        store
            .install(vec![
                (EntryId::from("w1"), record(&["a"], "one")),
                (EntryId::Int(2), TranslationRecord::new(vec!["b".into()]).with_translation("de", "zwei")),
            ])
            .unwrap();
        assert_eq!(store.languages(), &["transliteration".to_string(), "en".to_string()]);
        assert!(!store.supports_language("de"));
    }

    #[test]
    fn install_empty_is_rejected_and_keeps_state() {
        let mut store = TranslationStore::new();
        store.install(vec![(EntryId::Int(1), record(&["a"], "one"))]).unwrap();
        assert!(matches!(store.install(Vec::new()), Err(DictError::Validation(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn install_replaces_previous_records() {
        let mut store = TranslationStore::new();
        store.install(vec![(EntryId::Int(1), record(&["a"], "one"))]).unwrap();
        store.install(vec![(EntryId::Int(2), record(&["b"], "two"))]).unwrap();
        assert!(!store.contains(&EntryId::Int(1)));
        assert!(store.contains(&EntryId::Int(2)));
    }

    #[test]
    fn get_matches_ids_by_string_form() {
        let mut store = TranslationStore::new();
        store.install(vec![(EntryId::from("3"), record(&["a"], "three"))]).unwrap();
        assert_eq!(store.get(&EntryId::Int(3)).unwrap().translation("en"), Some("three"));
        assert!(store.get(&EntryId::Int(4)).unwrap().is_empty());
        assert!(matches!(store.get(&EntryId::from("")), Err(DictError::Validation(_))));
    }
}
