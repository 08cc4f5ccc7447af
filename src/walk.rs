//! Breadth-first traversal for diagnostics.
//!
//! A debugging aid, not part of the matching contract: the iterator yields
//! every token in the trie together with its depth, level by level, and the
//! caller decides how (or whether) to render it. Lazy, finite, and
//! restartable — call [`TrieIndex::levels`] again for a fresh walk.

use std::collections::VecDeque;

use crate::types::{TrieIndex, TrieNode};

/// Iterator over `(depth, token)` pairs in breadth-first order.
///
/// The root's own children are depth 0. Sibling order within a level is
/// unspecified (it follows the child map's iteration order).
pub struct Levels<'a> {
    queue: VecDeque<(usize, &'a str, &'a TrieNode)>,
}

impl TrieIndex {
    /// Walk the trie breadth-first, yielding each token with its depth.
    pub fn levels(&self) -> Levels<'_> {
        let mut queue = VecDeque::new();
        for (token, node) in self.root.children() {
            queue.push_back((0, token, node));
        }
        Levels { queue }
    }
}

impl<'a> Iterator for Levels<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, token, node) = self.queue.pop_front()?;
        for (child_token, child) in node.children() {
            self.queue.push_back((depth + 1, child_token, child));
        }
        Some((depth, token))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::testing::index_from_phrases;

    #[test]
    fn yields_every_token_once_in_depth_order() {
        let index = index_from_phrases(&["american idol", "american pie", "batman"], false);
        let walked: Vec<(usize, String)> = index
            .levels()
            .map(|(depth, token)| (depth, token.to_string()))
            .collect();

        // Depths never decrease in a BFS.
        let depths: Vec<usize> = walked.iter().map(|(d, _)| *d).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));

        let level0: HashSet<&str> = walked
            .iter()
            .filter(|(d, _)| *d == 0)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(level0, HashSet::from(["american", "batman"]));

        let level1: HashSet<&str> = walked
            .iter()
            .filter(|(d, _)| *d == 1)
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(level1, HashSet::from(["idol", "pie"]));

        assert_eq!(walked.len(), index.node_count() - 1);
    }

    #[test]
    fn restartable_and_finite() {
        let index = index_from_phrases(&["wonder woman"], false);
        assert_eq!(index.levels().count(), 2);
        assert_eq!(index.levels().count(), 2);
    }

    #[test]
    fn empty_index_yields_nothing() {
        let index = index_from_phrases(&[], false);
        assert_eq!(index.levels().next(), None);
    }
}
