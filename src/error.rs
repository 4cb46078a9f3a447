// File: src/error.rs
use thiserror::Error;

/// Result type for dictionary operations.
pub type Result<T> = std::result::Result<T, DictError>;

/// Domain failures surfaced by the dictionary core.
///
/// None of these are retried internally; the caller decides what to do.
#[derive(Debug, Error)]
pub enum DictError {
    /// Malformed entry, sequence, translations, entry id, or search mode.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A query was attempted before the trie and translations were populated.
    #[error("Empty index: {0}")]
    EmptyIndex(String),

    /// The requested language is not in the installed language set.
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Save or load of the dictionary document failed.
    #[error("Persistence error for '{target}': {source}")]
    Persistence {
        target: String,
        #[source]
        source: PersistenceFailure,
    },
}

/// Underlying cause of a [`DictError::Persistence`].
#[derive(Debug, Error)]
pub enum PersistenceFailure {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atomic replace failed: {0}")]
    Replace(#[from] tempfile::PersistError),

    #[error("document is missing the top-level key '{0}'")]
    MissingKey(&'static str),
}

impl DictError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DictError::Validation(msg.into())
    }

    pub fn empty_index(msg: impl Into<String>) -> Self {
        DictError::EmptyIndex(msg.into())
    }

    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        DictError::UnsupportedLanguage(lang.into())
    }

    pub fn persistence(target: impl Into<String>, source: impl Into<PersistenceFailure>) -> Self {
        DictError::Persistence {
            target: target.into(),
            source: source.into(),
        }
    }

    /// Short stable name of the error kind, for boundary layers that render
    /// a uniform failure body.
    pub fn kind(&self) -> &'static str {
        match self {
            DictError::Validation(_) => "validation",
            DictError::EmptyIndex(_) => "empty_index",
            DictError::UnsupportedLanguage(_) => "unsupported_language",
            DictError::Persistence { .. } => "persistence",
        }
    }
}
