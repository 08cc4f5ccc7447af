//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation. It
//! provides the canonical helpers so unit tests, integration tests, and
//! benches build indexes the same way.

#![doc(hidden)]

use std::io::Cursor;

use crate::index::build_index;
use crate::types::TrieIndex;

/// Build an index from a slice of phrases, one ID per slice position.
///
/// In-memory reads cannot fail, so the `Result` is unwrapped here to keep
/// test bodies flat.
pub fn index_from_phrases(phrases: &[&str], filter_stop_words: bool) -> TrieIndex {
    let source = phrases
        .iter()
        .map(|p| format!("{p}\n"))
        .collect::<String>();
    match build_index(Cursor::new(source), filter_stop_words) {
        Ok(index) => index,
        Err(e) => panic!("in-memory build failed: {e}"),
    }
}
