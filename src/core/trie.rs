// --- File: src/core/trie.rs
use crate::core::types::{EntryId, Symbol, TERMINATOR_KEY};
use crate::error::{DictError, Result};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Longest entry the trie accepts. Each symbol is one level of JSON
/// nesting in the persisted tree, and the document must stay under
/// serde_json's nesting limit of 128 to load again.
pub const MAX_ENTRY_LEN: usize = 120;

/// One node of the symbol trie. A node can carry children and a terminator
/// at the same time: the terminator belongs to the entry ending here, the
/// children to longer entries sharing this prefix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrieNode {
    children: BTreeMap<Symbol, TrieNode>,
    terminator: Option<Vec<EntryId>>,
}

impl TrieNode {
    fn new() -> Self {
        Self::default()
    }

    pub fn child(&self, symbol: &str) -> Option<&TrieNode> {
        self.children.get(symbol)
    }

    /// Entry ids ending at this node, in insertion order.
    pub fn terminator(&self) -> Option<&[EntryId]> {
        self.terminator.as_deref()
    }
}

/// Result of walking the trie along a sequence.
///
/// Segmentation only cares whether ids were found; the other two cases are
/// kept apart for diagnostic callers.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Some symbol had no node. `last_matched` is the symbol before it, or
    /// `None` when the very first symbol failed.
    NoPath { last_matched: Option<Symbol> },
    /// The whole path exists but no entry ends at its last node.
    NoTerminator { last_matched: Symbol },
    /// The whole path exists and ends in a terminator.
    Found { ids: Vec<EntryId>, last_matched: Symbol },
}

impl LookupOutcome {
    /// The ids found, empty unless the outcome is [`LookupOutcome::Found`].
    pub fn ids(&self) -> &[EntryId] {
        match self {
            LookupOutcome::Found { ids, .. } => ids,
            _ => &[],
        }
    }

    /// The last symbol that matched, or the reserved terminator key as a
    /// sentinel if nothing matched.
    pub fn last_matched(&self) -> &str {
        match self {
            LookupOutcome::NoPath { last_matched: None } => TERMINATOR_KEY,
            LookupOutcome::NoPath { last_matched: Some(s) }
            | LookupOutcome::NoTerminator { last_matched: s }
            | LookupOutcome::Found { last_matched: s, .. } => s.as_str(),
        }
    }
}

/// A nested index over symbol sequences. Each complete entry ends in a
/// terminator holding every id inserted for that exact sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTrie {
    root: TrieNode,
}

impl SymbolTrie {
    pub fn new() -> Self {
        Self { root: TrieNode::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Inserts `entry` under `id`. Homographs append to the existing
    /// terminator. O(k) where k is the entry length.
    pub fn insert<S: AsRef<str>>(&mut self, entry: &[S], id: EntryId) -> Result<()> {
        if entry.is_empty() {
            return Err(DictError::validation("entry must be a non-empty sequence of symbols"));
        }
        if entry.len() > MAX_ENTRY_LEN {
            return Err(DictError::validation(format!(
                "entry has {} symbols, more than the limit of {}",
                entry.len(),
                MAX_ENTRY_LEN
            )));
        }
        id.validate()?;
        if let Some(bad) = entry.iter().find(|s| s.as_ref() == TERMINATOR_KEY) {
            return Err(DictError::validation(format!(
                "symbol '{}' is reserved for terminators",
                bad.as_ref()
            )));
        }

        let mut node = &mut self.root;
        for symbol in entry {
            node = node.children.entry(symbol.as_ref().to_string()).or_default();
        }
        node.terminator.get_or_insert_with(Vec::new).push(id);
        Ok(())
    }

    /// Walks the trie along `sequence`. O(k) where k is the sequence length.
    pub fn lookup<S: AsRef<str>>(&self, sequence: &[S]) -> LookupOutcome {
        let mut node = &self.root;
        let mut last_matched: Option<&str> = None;
        for symbol in sequence {
            match node.child(symbol.as_ref()) {
                Some(next) => {
                    node = next;
                    last_matched = Some(symbol.as_ref());
                }
                None => {
                    return LookupOutcome::NoPath {
                        last_matched: last_matched.map(str::to_string),
                    }
                }
            }
        }
        let Some(last) = last_matched else {
            return LookupOutcome::NoPath { last_matched: None };
        };
        match node.terminator() {
            Some(ids) if !ids.is_empty() => LookupOutcome::Found {
                ids: ids.to_vec(),
                last_matched: last.to_string(),
            },
            _ => LookupOutcome::NoTerminator { last_matched: last.to_string() },
        }
    }

    /// Walks from the start of `sequence` and reports every prefix that is a
    /// complete entry, shortest first, as `(prefix_len, ids)`. Stops at the
    /// first symbol with no node.
    pub fn terminators_along<'a, S: AsRef<str>>(&'a self, sequence: &[S]) -> Vec<(usize, &'a [EntryId])> {
        let mut found = Vec::new();
        let mut node = &self.root;
        for (i, symbol) in sequence.iter().enumerate() {
            match node.child(symbol.as_ref()) {
                Some(next) => node = next,
                None => break,
            }
            if let Some(ids) = node.terminator() {
                if !ids.is_empty() {
                    found.push((i + 1, ids));
                }
            }
        }
        found
    }

    /// Depth-first listing of every symbol node as `(symbol, depth)`.
    /// Debugging aid; walks the whole tree.
    pub fn flatten(&self) -> Vec<(Symbol, usize)> {
        fn walk(node: &TrieNode, depth: usize, out: &mut Vec<(Symbol, usize)>) {
            for (symbol, child) in &node.children {
                out.push((symbol.clone(), depth));
                walk(child, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.root, 0, &mut out);
        out
    }
}

// The persisted tree is a nested object: symbol keys map to child objects
// and the reserved terminator key maps to an array of entry ids.

impl Serialize for TrieNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = self.children.len() + usize::from(self.terminator.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (symbol, child) in &self.children {
            map.serialize_entry(symbol, child)?;
        }
        if let Some(ids) = &self.terminator {
            map.serialize_entry(TERMINATOR_KEY, ids)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TrieNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = TrieNode;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a trie node object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<TrieNode, A::Error> {
                let mut node = TrieNode::new();
                while let Some(key) = access.next_key::<String>()? {
                    if key == TERMINATOR_KEY {
                        node.terminator = Some(access.next_value::<Vec<EntryId>>()?);
                    } else {
                        let child = access.next_value::<TrieNode>()?;
                        node.children.insert(key, child);
                    }
                }
                Ok(node)
            }
        }

        deserializer.deserialize_map(NodeVisitor)
    }
}
