//! Phrase-completion trie with greedy prefix matching and binary persistence.
//!
//! Talpa builds an in-memory trie over an ordered list of candidate phrases
//! and answers "which phrase(s) does this partial input refer to" queries,
//! returning the insertion positions of matching phrases. Latin-script
//! phrases are tokenized by whitespace; Han-script phrases are converted to
//! an ordered pinyin-syllable sequence. A fixed stop-word list can be
//! filtered out on both the build and query paths.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ tokenize.rs │────▶│  index.rs    │────▶│  search.rs  │
//! │ (scripts,   │     │ (build_index,│     │   (find)    │
//! │ stop words) │     │   insert)    │     │             │
//! └─────────────┘     └──────┬───────┘     └─────────────┘
//!                            │
//!                     ┌──────▼───────┐     ┌─────────────┐
//!                     │  compact.rs  │────▶│   binary/   │
//!                     │  (prune)     │     │ (save/load) │
//!                     └──────────────┘     └─────────────┘
//! ```
//!
//! # Lifecycle
//!
//! Strictly phased: build once (bulk, sequential), optionally [`compact`]
//! once, optionally [`save`], then serve unboundedly many [`find`] calls
//! against the frozen index. There is no deletion or incremental update;
//! refreshing means rebuilding. `find` takes `&self`, so a frozen index can
//! be shared across threads — but the crate provides no mutation guard, and
//! mutating concurrently with lookups is the caller's bug to prevent.
//!
//! [`compact`]: TrieIndex::compact
//! [`save`]: TrieIndex::save
//! [`find`]: TrieIndex::find
//!
//! # Usage
//!
//! ```
//! use std::io::Cursor;
//!
//! # fn main() -> talpa::Result<()> {
//! let phrases = "a ball in the ground\nthe bat in the sky\nthe ball hit his head\n";
//! let index = talpa::build_index(Cursor::new(phrases), true)?;
//!
//! assert_eq!(index.find("ball"), vec![0, 2]);
//! assert_eq!(index.find("bat"), vec![1]);
//! assert!(index.find("pitcher").is_empty());
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod binary;
mod compact;
mod error;
mod index;
mod search;
pub mod testing;
mod tokenize;
mod types;
mod walk;

// Re-exports for public API
pub use error::{Error, Result};
pub use index::{build_index, build_index_with, BuildOptions};
#[cfg(feature = "pinyin")]
pub use tokenize::HanPinyin;
pub use tokenize::{default_stop_words, detect_script, ScriptFamily, Transliterate, STOP_WORDS};
pub use types::{PhraseId, TrieIndex, TrieNode};
pub use walk::Levels;
