// src/core/types.rs
use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An atomic token of the dictionary alphabet, e.g. a glyph code.
pub type Symbol = String;

/// Reserved key marking a terminator slot in the persisted tree.
pub const TERMINATOR_KEY: &str = "-1";

/// The translation language lifted into its own output field.
pub const TRANSLITERATION: &str = "transliteration";

/// Identifier of one dictionary entry. Homographs share a symbol sequence
/// but never an id.
///
/// Identity is the string form: `Int(3)` equals `Str("3")`, since the
/// persisted translations are keyed by strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Int(i64),
    Str(String),
}

impl EntryId {
    /// Rejects empty string ids. Integer ids are always valid.
    pub fn validate(&self) -> Result<()> {
        match self {
            EntryId::Str(s) if s.is_empty() => {
                Err(DictError::validation("entry id must be a non-empty string or an integer"))
            }
            _ => Ok(()),
        }
    }

    /// The key this id is stored under in the translations map.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for EntryId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EntryId::Int(a), EntryId::Int(b)) => a == b,
            (EntryId::Str(a), EntryId::Str(b)) => a == b,
            (EntryId::Int(n), EntryId::Str(s)) | (EntryId::Str(s), EntryId::Int(n)) => *s == n.to_string(),
        }
    }
}

impl Eq for EntryId {}

impl Hash for EntryId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            EntryId::Int(n) => n.to_string().hash(state),
            EntryId::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Int(n) => write!(f, "{}", n),
            EntryId::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId::Str(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        EntryId::Str(s)
    }
}

impl From<i64> for EntryId {
    fn from(n: i64) -> Self {
        EntryId::Int(n)
    }
}

/// The canonical word and its translations for one entry id.
///
/// `translations` keeps the language order of the source document. Values
/// are usually strings, but other JSON shapes are tolerated and skipped by
/// translation search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub word: Vec<Symbol>,
    pub translations: Map<String, Value>,
}

impl TranslationRecord {
    pub fn new(word: Vec<Symbol>) -> Self {
        Self { word, translations: Map::new() }
    }

    /// Builder-style helper used when assembling records in code.
    pub fn with_translation(mut self, lang: &str, text: &str) -> Self {
        self.translations.insert(lang.to_string(), Value::String(text.to_string()));
        self
    }

    /// The translation for `lang`, if present and a string.
    pub fn translation(&self, lang: &str) -> Option<&str> {
        self.translations.get(lang).and_then(Value::as_str)
    }

    pub fn transliteration(&self) -> Option<&str> {
        self.translation(TRANSLITERATION)
    }

    /// True for the placeholder returned when an id has no record.
    pub fn is_empty(&self) -> bool {
        self.word.is_empty() && self.translations.is_empty()
    }
}

/// How a query sequence must relate to a record's word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Exact,
    StartsWith,
    Contains,
}

impl FromStr for MatchMode {
    type Err = DictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(MatchMode::Exact),
            "starts_with" => Ok(MatchMode::StartsWith),
            "contains" => Ok(MatchMode::Contains),
            other => Err(DictError::validation(format!(
                "match mode '{}' is not one of [exact, starts_with, contains]",
                other
            ))),
        }
    }
}

/// Applies the case folding policy to a sequence of symbols.
pub fn fold_symbols<S: AsRef<str>>(symbols: &[S], lowercase: bool) -> Vec<Symbol> {
    symbols
        .iter()
        .map(|s| if lowercase { s.as_ref().to_lowercase() } else { s.as_ref().to_string() })
        .collect()
}
