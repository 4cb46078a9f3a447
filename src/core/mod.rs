// src/core/mod.rs

pub mod engine;
pub mod search;
pub mod segmenter;
pub mod translations;
pub mod trie;
pub mod types;
