//! Index construction.
//!
//! A [`TrieIndex`] is built in one pass over a newline-delimited phrase
//! source: one phrase per line, ID = 0-based line index, phrase lowercased
//! before tokenization. There are no later insertions; rebuilding is the
//! only way to refresh an index.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **ID_ORDER**: IDs are appended along the token path in the order
//!    phrases are read, so every node's `contained` list is sorted by
//!    insertion order.
//! 2. **ANCESTOR_SUPERSET**: an ID appended at depth `d` was appended at
//!    every depth `< d` on the same path. Descending never loses candidates.
//! 3. **STOP_SYMMETRY**: the same stop set filters both insertion and
//!    queries; a token filtered here is also filtered in `find`.

use std::collections::HashSet;
use std::io::BufRead;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::tokenize::{default_stop_words, tokenize, Transliterate};
use crate::types::{PhraseId, TrieIndex};

/// Configuration for a single build.
///
/// Everything the original design kept in process-wide mutable state — the
/// active stop set and the transliteration setup — lives here instead, so
/// two builds with different configurations can run back to back (or
/// concurrently) without sharing anything.
#[derive(Default)]
pub struct BuildOptions {
    stop_words: Option<HashSet<String>>,
    transliterator: Option<Arc<dyn Transliterate>>,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable filtering with the built-in stop-word list.
    pub fn filter_stop_words(mut self, enabled: bool) -> Self {
        self.stop_words = enabled.then(default_stop_words);
        self
    }

    /// Enable filtering with a caller-supplied stop-word set.
    ///
    /// Matching is exact: pass lowercase entries if your phrases are
    /// lowercase (they are — the build lowercases every line).
    pub fn stop_words(mut self, words: HashSet<String>) -> Self {
        self.stop_words = Some(words);
        self
    }

    /// Use a custom transliterator for Han-script phrases instead of the
    /// built-in pinyin conversion.
    pub fn transliterator(mut self, transliterator: Arc<dyn Transliterate>) -> Self {
        self.transliterator = Some(transliterator);
        self
    }
}

/// Build a completion index from a newline-delimited phrase source.
///
/// The phrase on line `k` (0-based) gets ID `k`. Trailing newlines are
/// stripped; a phrase containing a literal newline cannot be represented.
/// IDs are 32-bit, so a source may hold at most `u32::MAX + 1` phrases.
///
/// # Errors
///
/// Returns [`Error::Ingest`] if the source fails mid-read for any reason
/// other than reaching its end, or if it holds more phrases than the ID
/// space admits. No partially built index is returned.
pub fn build_index<R: BufRead>(source: R, filter_stop_words: bool) -> Result<TrieIndex> {
    build_index_with(source, BuildOptions::new().filter_stop_words(filter_stop_words))
}

/// [`build_index`] with full configuration.
pub fn build_index_with<R: BufRead>(source: R, options: BuildOptions) -> Result<TrieIndex> {
    let mut index = TrieIndex::new(options.stop_words);
    let transliterator = options.transliterator;

    let mut count: usize = 0;
    for (line_no, line) in source.lines().enumerate() {
        let phrase = line.map_err(Error::Ingest)?;
        index.insert_phrase(
            &phrase.to_lowercase(),
            phrase_id(line_no)?,
            transliterator.as_deref(),
        );
        count = line_no + 1;
    }

    log::debug!(
        "built index: {} phrases, {} nodes",
        count,
        index.node_count()
    );
    Ok(index)
}

/// Map a 0-based line index to a phrase ID, failing instead of wrapping
/// once the source outgrows the 32-bit ID space.
fn phrase_id(line_no: usize) -> Result<PhraseId> {
    PhraseId::try_from(line_no).map_err(|_| {
        Error::Ingest(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("line {} exceeds the 32-bit phrase ID space", line_no),
        ))
    })
}

impl TrieIndex {
    /// Insert one tokenized phrase. Build-time only; `phrase` is already
    /// lowercased.
    fn insert_phrase(
        &mut self,
        phrase: &str,
        id: PhraseId,
        transliterator: Option<&dyn Transliterate>,
    ) {
        let tokens = tokenize(phrase, transliterator);
        let stop_words = self.stop_words.as_ref();

        let mut node = &mut self.root;
        for token in tokens {
            if matches!(stop_words, Some(set) if set.contains(&token)) {
                continue;
            }
            let child = node.children.entry(token).or_default();
            child.contained.push(id);
            node = child;
        }
    }
}
