// File: src/core/segmenter.rs
use crate::core::translations::TranslationStore;
use crate::core::trie::SymbolTrie;
use crate::core::types::{EntryId, Symbol, TranslationRecord, TRANSLITERATION};
use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A contiguous window of the input that is a complete entry.
/// `span` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentMatch {
    pub span: (usize, usize),
    pub symbols: Vec<Symbol>,
    pub entry_ids: Vec<EntryId>,
}

/// One match flattened to a single entry id and joined with its record.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRow {
    pub span: (usize, usize),
    pub entry_id: EntryId,
    pub record: TranslationRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleTranslation {
    pub locale: String,
    pub translation: String,
}

/// The row shape handed to the boundary layer. The transliteration is
/// lifted out of the translation list into its own field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub span: [usize; 2],
    pub sequence: Vec<Symbol>,
    pub translations: Vec<LocaleTranslation>,
    pub transliteration: String,
}

impl From<&EntryRow> for SegmentRow {
    fn from(row: &EntryRow) -> Self {
        let mut translations = Vec::new();
        let mut transliteration = String::new();
        for (lang, value) in &row.record.translations {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            if lang == TRANSLITERATION {
                transliteration = text;
            } else {
                translations.push(LocaleTranslation { locale: lang.clone(), translation: text });
            }
        }
        SegmentRow {
            span: [row.span.0, row.span.1],
            sequence: row.record.word.clone(),
            translations,
            transliteration,
        }
    }
}

/// Finds every entry contained anywhere in an input sequence.
///
/// This is exhaustive on purpose: overlapping and nested entries are all
/// reported, and picking a segmentation out of them is left to the caller.
pub struct Segmenter<'a> {
    trie: &'a SymbolTrie,
    store: &'a TranslationStore,
}

impl<'a> Segmenter<'a> {
    pub fn new(trie: &'a SymbolTrie, store: &'a TranslationStore) -> Self {
        Self { trie, store }
    }

    /// Every window `[n, i]` of `sequence` that ends in a terminator,
    /// ordered by `(start, end)`. Symbols must already be case folded.
    pub fn segment<S: AsRef<str>>(&self, sequence: &[S]) -> Vec<SegmentMatch> {
        let mut matches = Vec::new();
        for start in 0..sequence.len() {
            // One walk per start finds every window beginning there,
            // shortest first.
            for (len, ids) in self.trie.terminators_along(&sequence[start..]) {
                matches.push(SegmentMatch {
                    span: (start, start + len - 1),
                    symbols: sequence[start..start + len]
                        .iter()
                        .map(|s| s.as_ref().to_string())
                        .collect(),
                    entry_ids: ids.to_vec(),
                });
            }
        }
        matches
    }

    /// One row per entry id per match, joined with its translation record.
    pub fn entries_in_sequence<S: AsRef<str>>(&self, sequence: &[S]) -> Result<Vec<EntryRow>> {
        if self.trie.is_empty() || self.store.is_empty() {
            return Err(DictError::empty_index(
                "the dictionary tree and/or translations are empty",
            ));
        }
        if sequence.is_empty() {
            return Err(DictError::validation("sequence must be a non-empty list of symbols"));
        }

        let matches = self.segment(sequence);
        let mut rows = Vec::new();
        for m in matches {
            for id in m.entry_ids {
                let record = self.store.get(&id)?.into_owned();
                rows.push(EntryRow { span: m.span, entry_id: id, record });
            }
        }
        debug!(symbols = sequence.len(), rows = rows.len(), "segmented sequence");
        Ok(rows)
    }
}
