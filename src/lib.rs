// src/lib.rs
//! Symbol-sequence dictionary: finds every dictionary entry inside an input
//! sequence of glyph codes and joins it with its translations.

pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::config::EngineConfig;
pub use crate::core::engine::DictionaryEngine;
pub use crate::core::segmenter::{EntryRow, LocaleTranslation, SegmentMatch, SegmentRow};
pub use crate::core::trie::{LookupOutcome, MAX_ENTRY_LEN};
pub use crate::core::types::{EntryId, MatchMode, Symbol, TranslationRecord};
pub use crate::error::{DictError, Result};
