// Copyright 2026-present Talpa contributors
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a completion index.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **ID accumulation**: every node on an inserted phrase's filtered token
//!   path carries that phrase's ID in `contained`, in insertion order.
//!
//! - **Ancestor superset**: an ID present at a node is present at every
//!   non-root ancestor of that node. The short-circuit in `find` and the
//!   compaction pass both depend on this.
//!
//! - **Post-compaction leaf**: after `compact`, a node with exactly one
//!   contained ID has no children.
//!
//! - **Root**: always exists, never carries IDs, never pruned.
//!
//! The stop-word set is fixed at construction and never mutated afterwards;
//! `find` consults the same set the build used, so a persisted index must
//! carry it (see `binary`).

use std::collections::{HashMap, HashSet};

/// Identifier of an indexed phrase: its 0-based position in the build source.
pub type PhraseId = u32;

/// A node in the completion trie.
///
/// Children are exclusively owned; there are no parent back-references, so
/// the whole graph drops with the index and persistence can walk it
/// depth-first without cycle checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrieNode {
    pub(crate) children: HashMap<String, TrieNode>,
    pub(crate) contained: Vec<PhraseId>,
}

impl TrieNode {
    /// IDs of every phrase whose token path passes through this node,
    /// in insertion order.
    pub fn contained_ids(&self) -> &[PhraseId] {
        &self.contained
    }

    /// Look up the child for an exact token.
    pub fn child(&self, token: &str) -> Option<&TrieNode> {
        self.children.get(token)
    }

    /// Iterate over `(token, child)` pairs. Iteration order is unspecified.
    pub fn children(&self) -> impl Iterator<Item = (&str, &TrieNode)> {
        self.children.iter().map(|(token, node)| (token.as_str(), node))
    }

    /// Number of nodes in this subtree, including `self`.
    pub(crate) fn node_count(&self) -> usize {
        1 + self.children.values().map(TrieNode::node_count).sum::<usize>()
    }
}

/// A built completion index: the root of the trie plus the stop-word
/// configuration it was built with.
///
/// Constructed once by [`build_index`](crate::build_index) (bulk build, no
/// later insertions), optionally compacted once, optionally persisted, then
/// used read-only for any number of [`find`](TrieIndex::find) calls.
/// Refreshing the index means rebuilding from scratch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieIndex {
    pub(crate) root: TrieNode,
    /// `None` = filtering disabled. Immutable after construction.
    pub(crate) stop_words: Option<HashSet<String>>,
}

impl TrieIndex {
    pub(crate) fn new(stop_words: Option<HashSet<String>>) -> Self {
        Self {
            root: TrieNode::default(),
            stop_words,
        }
    }

    /// The root node. Never carries IDs of its own.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Whether stop-word filtering is active for this index.
    pub fn stop_words_enabled(&self) -> bool {
        self.stop_words.is_some()
    }

    /// Total number of nodes in the trie, root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub(crate) fn is_stop_word(&self, token: &str) -> bool {
        matches!(&self.stop_words, Some(set) if set.contains(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_index_has_root_only() {
        let index = TrieIndex::new(None);
        assert_eq!(index.node_count(), 1);
        assert!(index.root().contained_ids().is_empty());
        assert!(!index.stop_words_enabled());
    }

    #[test]
    fn stop_word_lookup_is_exact() {
        let set: HashSet<String> = ["the".to_string(), "I".to_string()].into();
        let index = TrieIndex::new(Some(set));
        assert!(index.is_stop_word("the"));
        assert!(index.is_stop_word("I"));
        // Lowercased tokens never match the mixed-case entry.
        assert!(!index.is_stop_word("i"));
        assert!(!index.is_stop_word("The"));
    }
}
