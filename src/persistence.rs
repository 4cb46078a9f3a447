// File: src/persistence.rs
use crate::core::engine::DictionaryEngine;
use crate::core::translations::TranslationStore;
use crate::core::trie::SymbolTrie;
use crate::core::types::{EntryId, TranslationRecord};
use crate::error::{DictError, PersistenceFailure, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// The on-disk document: the trie under `tree`, the records under
/// `translations` keyed by entry id.
#[derive(Serialize)]
struct SerializableState<'a> {
    tree: &'a SymbolTrie,
    translations: TranslationsDoc<'a>,
}

struct TranslationsDoc<'a>(&'a TranslationStore);

impl Serialize for TranslationsDoc<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, record) in self.0.iter() {
            map.serialize_entry(&id.key(), record)?;
        }
        map.end()
    }
}

/// Both keys are optional here so a missing one is reported by name.
#[derive(Deserialize)]
struct LoadedState {
    tree: Option<SymbolTrie>,
    translations: Option<Map<String, Value>>,
}

/// Writes the whole dictionary to `path`, replacing any previous file.
/// The document goes to a temp file next to `path` first and is then
/// renamed over it.
pub fn save_to_disk(engine: &DictionaryEngine, path: &Path) -> Result<()> {
    let target = path.display().to_string();
    let fail = |e: PersistenceFailure| DictError::persistence(target.clone(), e);

    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir).map_err(|e| fail(e.into()))?;

    let state = SerializableState {
        tree: engine.trie(),
        translations: TranslationsDoc(engine.translations()),
    };

    let temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| fail(e.into()))?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer(&mut writer, &state).map_err(|e| fail(e.into()))?;
        writer.flush().map_err(|e| fail(e.into()))?;
    }
    temp_file.persist(path).map_err(|e| fail(e.into()))?;

    info!(path = %target, records = engine.translations().len(), "saved dictionary");
    Ok(())
}

/// Reads a dictionary document. Only the presence of both top-level keys
/// is checked; the content is trusted.
pub fn load_from_disk(path: &Path) -> Result<(SymbolTrie, TranslationStore)> {
    let target = path.display().to_string();
    let fail = |e: PersistenceFailure| DictError::persistence(target.clone(), e);

    let file = File::open(path).map_err(|e| fail(e.into()))?;
    let reader = BufReader::new(file);
    let state: LoadedState = serde_json::from_reader(reader).map_err(|e| fail(e.into()))?;

    let tree = state.tree.ok_or_else(|| fail(PersistenceFailure::MissingKey("tree")))?;
    let raw = state
        .translations
        .ok_or_else(|| fail(PersistenceFailure::MissingKey("translations")))?;

    let mut store = TranslationStore::new();
    for (key, value) in raw {
        let record: TranslationRecord = serde_json::from_value(value).map_err(|e| fail(e.into()))?;
        store.put(EntryId::Str(key), record);
    }

    info!(path = %target, records = store.len(), languages = ?store.languages(), "loaded dictionary");
    Ok((tree, store))
}
