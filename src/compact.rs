//! Tree compaction.
//!
//! Once a node contains exactly one phrase ID the match is already unique —
//! deeper tokens cannot add information, because `find` short-circuits the
//! moment it reaches such a node. Compaction deletes those unreachable
//! subtrees to shrink the in-memory and persisted footprint.
//!
//! Run it after the build is complete and before `save`. Exact-phrase
//! queries return the same results before and after; only queries that
//! previously matched via a deeper, now-pruned partial path can change.

use crate::types::{TrieIndex, TrieNode};

impl TrieIndex {
    /// Prune every subtree below a uniquely-identifying node.
    ///
    /// One-way and idempotent: compacting an already-compacted index is a
    /// no-op. The root is never pruned.
    pub fn compact(&mut self) {
        let before = self.node_count();
        compact_node(&mut self.root);
        log::debug!("compacted index: {} -> {} nodes", before, self.node_count());
    }
}

fn compact_node(node: &mut TrieNode) {
    if node.contained.len() == 1 {
        node.children.clear();
        return;
    }
    for child in node.children.values_mut() {
        compact_node(child);
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::index_from_phrases;

    #[test]
    fn unique_nodes_lose_children() {
        let mut index = index_from_phrases(&["american idol winner", "american pie"], true);

        let idol = index.root().child("american").unwrap().child("idol").unwrap();
        assert!(idol.child("winner").is_some());

        index.compact();

        let american = index.root().child("american").unwrap();
        assert_eq!(american.contained_ids(), &[0, 1]);
        // "idol" contains a single ID: its subtree is gone.
        assert!(american.child("idol").unwrap().children().next().is_none());
    }

    #[test]
    fn shared_branches_survive() {
        let mut index = index_from_phrases(&["the batman", "the batman returns"], true);
        index.compact();

        let batman = index.root().child("batman").unwrap();
        assert_eq!(batman.contained_ids(), &[0, 1]);
        // Two IDs: children stay, and the unique child below is a leaf.
        assert!(batman.child("returns").is_some());
    }

    #[test]
    fn compaction_is_idempotent() {
        let mut index = index_from_phrases(
            &["a ball in the ground", "the bat in the sky", "the ball hit his head"],
            true,
        );
        index.compact();
        let once = index.clone();
        index.compact();
        assert_eq!(index, once);
    }

    #[test]
    fn exact_phrase_results_unchanged() {
        let phrases = [
            "the batman",
            "american idol",
            "american pie",
            "the batman returns",
        ];
        let mut index = index_from_phrases(&phrases, true);
        let before: Vec<_> = phrases.iter().map(|p| index.find(p)).collect();
        index.compact();
        let after: Vec<_> = phrases.iter().map(|p| index.find(p)).collect();
        assert_eq!(before, after);
    }
}
