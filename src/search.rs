//! Query matching.
//!
//! `find` is a greedy, single-pass matcher — not a backtracking search. It
//! walks the query tokens once, descending while tokens match, and on a
//! mismatch performs exactly one kind of recovery: jump back to the root
//! and retry the *same* token (or skip the token if already at the root).
//! This can miss an overlapping match a full search would find, and that is
//! intentional: the exact control flow below is the contract, and existing
//! result sets depend on it. Treat any divergence as a bug, not an
//! improvement to make.
//!
//! Callers own query tokenization parity: `find` only lowercases and
//! splits on spaces, so a Han-script query must be transliterated to its
//! space-joined syllables before calling in.

use crate::types::{PhraseId, TrieIndex};

impl TrieIndex {
    /// Return the IDs of phrases matching a partial input, in insertion
    /// order. An empty result is the only no-match signal; `find` never
    /// fails.
    ///
    /// A unique match short-circuits: as soon as the walk reaches a node
    /// containing exactly one ID, that ID is returned — no further token
    /// can add information.
    pub fn find(&self, query: &str) -> Vec<PhraseId> {
        let query = query.to_lowercase();
        let tokens: Vec<&str> = query.split(' ').collect();

        let root = &self.root;
        let mut node = root;
        let mut i = 0;

        while i < tokens.len() {
            if self.is_stop_word(tokens[i]) {
                i += 1;
                continue;
            }

            if let Some(child) = node.child(tokens[i]) {
                if child.contained.len() == 1 {
                    return child.contained.clone();
                }
                node = child;
                i += 1;
                continue;
            }

            if std::ptr::eq(node, root) {
                // Nothing matched yet; skip the token and keep scanning.
                i += 1;
            } else {
                // Single-step fallback: retry this same token from the
                // root. The cursor does NOT advance here (see module docs).
                node = root;
            }
        }

        if !std::ptr::eq(node, root) && !node.contained.is_empty() {
            node.contained.clone()
        } else {
            Vec::new()
        }
    }
}
