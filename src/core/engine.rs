use crate::config::EngineConfig;
use crate::core::search::SearchEngine;
use crate::core::segmenter::{EntryRow, SegmentMatch, SegmentRow, Segmenter};
use crate::core::translations::TranslationStore;
use crate::core::trie::{LookupOutcome, SymbolTrie};
use crate::core::types::{fold_symbols, EntryId, MatchMode, Symbol, TranslationRecord, TRANSLITERATION};
use crate::error::{DictError, Result};
use crate::persistence::{load_from_disk, save_to_disk};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The dictionary: a symbol trie and a translation store kept as a pair.
///
/// Population replaces both halves together. Mutation is single writer;
/// once populated, `&self` queries can run in parallel.
#[derive(Debug, Clone)]
pub struct DictionaryEngine {
    trie: SymbolTrie,
    translations: TranslationStore,
    lowercase: bool,
    dictionary_path: Option<PathBuf>,
}

impl Default for DictionaryEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DictionaryEngine {
    /// An empty engine. `lowercase` fixes the case folding policy for its
    /// lifetime.
    pub fn new(lowercase: bool) -> Self {
        Self {
            trie: SymbolTrie::new(),
            translations: TranslationStore::new(),
            lowercase,
            dictionary_path: None,
        }
    }

    /// An engine set up from `config`, loading its dictionary if a path is
    /// configured.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let mut engine = Self::new(config.lowercase);
        if let Some(path) = &config.dictionary_path {
            engine.load(path)?;
            engine.dictionary_path = Some(path.clone());
        }
        Ok(engine)
    }

    /// Loads `path`, or starts empty if it cannot be read. The path is
    /// remembered for [`DictionaryEngine::save_dictionary`].
    pub fn from_file_or_new(path: impl AsRef<Path>, lowercase: bool) -> Self {
        let path = path.as_ref();
        let mut engine = Self::new(lowercase);
        if let Err(e) = engine.load(path) {
            warn!(error = %e, "starting with an empty dictionary");
        }
        engine.dictionary_path = Some(path.to_path_buf());
        engine
    }

    pub fn lowercase(&self) -> bool {
        self.lowercase
    }

    pub fn trie(&self) -> &SymbolTrie {
        &self.trie
    }

    pub fn translations(&self) -> &TranslationStore {
        &self.translations
    }

    pub fn languages(&self) -> &[String] {
        self.translations.languages()
    }

    /// True once both the trie and the translations hold data.
    pub fn is_populated(&self) -> bool {
        !self.trie.is_empty() && !self.translations.is_empty()
    }

    fn fold<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<Symbol> {
        fold_symbols(symbols, self.lowercase)
    }

    fn require_populated(&self, op: &str) -> Result<()> {
        if self.is_populated() {
            Ok(())
        } else {
            Err(DictError::empty_index(format!(
                "the dictionary tree and/or translations are empty in {}",
                op
            )))
        }
    }

    fn require_sequence<S>(sequence: &[S], op: &str) -> Result<()> {
        if sequence.is_empty() {
            Err(DictError::validation(format!(
                "sequence is not a non-empty list of symbols in {}",
                op
            )))
        } else {
            Ok(())
        }
    }

    /// Replaces the whole dictionary with `entries` and `translations`.
    ///
    /// Entries that fail validation are skipped with a warning. The new
    /// state is built off to the side and only swapped in on success.
    pub fn populate<E, T>(&mut self, entries: E, translations: T) -> Result<()>
    where
        E: IntoIterator<Item = (EntryId, Vec<Symbol>)>,
        T: IntoIterator<Item = (EntryId, TranslationRecord)>,
    {
        let mut trie = SymbolTrie::new();
        let mut inserted = 0usize;
        let mut seen = 0usize;
        for (id, entry) in entries {
            seen += 1;
            match trie.insert(&self.fold(&entry), id.clone()) {
                Ok(()) => inserted += 1,
                Err(e) => warn!(entry_id = %id, error = %e, "skipping entry"),
            }
        }
        if seen == 0 {
            return Err(DictError::validation("entries must be a non-empty mapping"));
        }

        let mut store = TranslationStore::new();
        store.install(translations)?;

        debug!(entries = inserted, skipped = seen - inserted, records = store.len(), "populated dictionary");
        self.trie = trie;
        self.translations = store;
        Ok(())
    }

    /// Adds one entry to the trie. The caller must serialize concurrent
    /// writers.
    pub fn add_entry<S: AsRef<str>>(&mut self, entry: &[S], id: EntryId) -> Result<()> {
        let folded = self.fold(entry);
        self.trie.insert(&folded, id)
    }

    /// Adds or replaces one translation record.
    pub fn add_translation(&mut self, id: EntryId, record: TranslationRecord) -> Result<()> {
        id.validate()?;
        self.translations.put(id, record);
        Ok(())
    }

    /// Replaces every translation record.
    pub fn set_translations<T>(&mut self, translations: T) -> Result<()>
    where
        T: IntoIterator<Item = (EntryId, TranslationRecord)>,
    {
        self.translations.install(translations)
    }

    /// Raw trie lookup; no population check.
    pub fn lookup<S: AsRef<str>>(&self, sequence: &[S]) -> LookupOutcome {
        self.trie.lookup(&self.fold(sequence))
    }

    /// Diagnostic lookup that reports how far `sequence` got in the trie.
    pub fn has_entry<S: AsRef<str>>(&self, sequence: &[S]) -> Result<LookupOutcome> {
        self.require_populated("has_entry")?;
        Self::require_sequence(sequence, "has_entry")?;
        Ok(self.lookup(sequence))
    }

    /// Every window of `sequence` that is a complete entry.
    pub fn segment_matches<S: AsRef<str>>(&self, sequence: &[S]) -> Vec<SegmentMatch> {
        Segmenter::new(&self.trie, &self.translations).segment(&self.fold(sequence))
    }

    /// One row per entry id found in `sequence`, joined with its record.
    pub fn get_entries_in_sequence<S: AsRef<str>>(&self, sequence: &[S]) -> Result<Vec<EntryRow>> {
        Segmenter::new(&self.trie, &self.translations).entries_in_sequence(&self.fold(sequence))
    }

    /// [`DictionaryEngine::get_entries_in_sequence`] rendered for the
    /// boundary layer.
    pub fn segment<S: AsRef<str>>(&self, sequence: &[S]) -> Result<Vec<SegmentRow>> {
        let rows = self.get_entries_in_sequence(sequence)?;
        Ok(rows.iter().map(SegmentRow::from).collect())
    }

    /// Ids of records whose word matches `query` under `mode`
    /// (`exact`, `starts_with` or `contains`).
    pub fn find_matching_words<S: AsRef<str>>(&self, query: &[S], mode: &str) -> Result<Vec<EntryId>> {
        let mode: MatchMode = mode.parse()?;
        Ok(SearchEngine::new(&self.translations).find_matching_words(query, mode))
    }

    /// Records whose word contains, starts with, or equals `sequence`.
    pub fn entries_containing_sequence<S: AsRef<str>>(
        &self,
        sequence: &[S],
        mode: MatchMode,
    ) -> Result<Vec<(&EntryId, &TranslationRecord)>> {
        self.require_populated("entries_containing_sequence")?;
        Self::require_sequence(sequence, "entries_containing_sequence")?;
        Ok(SearchEngine::new(&self.translations).find_matching_records(sequence, mode))
    }

    /// Records whose `language` translation contains `term`, ignoring case.
    /// `None` searches the transliteration.
    pub fn find_words_by_translation(
        &self,
        term: &str,
        language: Option<&str>,
    ) -> Result<Vec<(&EntryId, &TranslationRecord)>> {
        self.require_populated("find_words_by_translation")?;
        if term.is_empty() {
            return Err(DictError::validation("search term is empty"));
        }
        SearchEngine::new(&self.translations)
            .find_words_by_translation(term, language.unwrap_or(TRANSLITERATION))
    }

    /// The record for `id`, or an empty record if there is none.
    pub fn get_entry(&self, id: &EntryId) -> Result<Cow<'_, TranslationRecord>> {
        self.translations.get(id)
    }

    /// Writes the trie and translations to `path` as one JSON document.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_to_disk(self, path.as_ref())
    }

    /// Replaces the trie and translations with the document at `path`.
    /// On failure the current state is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let (trie, translations) = load_from_disk(path.as_ref())?;
        self.trie = trie;
        self.translations = translations;
        Ok(())
    }

    /// Saves to the remembered dictionary path. Engines built with
    /// [`DictionaryEngine::new`] have no path, and then nothing is written.
    pub fn save_dictionary(&self) -> Result<()> {
        match &self.dictionary_path {
            Some(path) => self.save(path),
            None => {
                debug!("no dictionary path set; nothing saved");
                Ok(())
            }
        }
    }

    pub fn dictionary_path(&self) -> Option<&Path> {
        self.dictionary_path.as_deref()
    }
}
