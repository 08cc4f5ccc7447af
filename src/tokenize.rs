//! Script detection, tokenization, and stop-word filtering.
//!
//! A phrase is routed to one of two tokenizers by the script of its *first*
//! character only. This is a deliberate simplification, not a per-character
//! classifier: a mixed-script phrase is tokenized entirely by whichever
//! family its first character belongs to.
//!
//! Latin-script phrases split on the single space character with no further
//! normalization; callers lowercase before tokenizing. Han-script phrases go
//! through a [`Transliterate`] implementation that produces an ordered
//! syllable sequence — by default lazy, tone-less pinyin, one syllable per
//! character.

use std::collections::HashSet;

use unicode_script::{Script, UnicodeScript};

/// The built-in stop-word list.
///
/// Mixed case is intentional and inherited: phrases and queries are
/// lowercased before filtering, so entries like `"I"` never match. Changing
/// the casing here would change query results for existing indexes.
pub const STOP_WORDS: &[&str] = &[
    "I", "a", "about", "an", "are", "as", "at", "be", "by", "com", "for",
    "from", "how", "in", "is", "it", "of", "on", "or", "that", "the", "this",
    "to", "was", "what", "when", "where", "who", "will", "with", "www",
];

/// Script family a phrase is tokenized under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFamily {
    /// Whitespace-separated words; split on `' '`.
    Latin,
    /// Han script; transliterated to an ordered syllable sequence.
    Han,
}

/// Classify a phrase by its first character.
///
/// Anything that is not Han (including the empty string) classifies as
/// Latin.
pub fn detect_script(phrase: &str) -> ScriptFamily {
    match phrase.chars().next() {
        Some(c) if c.script() == Script::Han => ScriptFamily::Han,
        _ => ScriptFamily::Latin,
    }
}

/// Converts a Han-script phrase into an ordered sequence of syllable tokens.
///
/// The index treats transliteration as a black box: implementations only
/// need to be deterministic, and the same implementation must be used for
/// phrases at build time and (by the caller) for queries.
pub trait Transliterate: Send + Sync {
    fn transliterate(&self, phrase: &str) -> Vec<String>;
}

/// Default transliterator: lazy pinyin without tone marks.
///
/// One syllable per Han character; characters without a pinyin reading
/// (punctuation, digits, Latin letters) are skipped rather than passed
/// through.
#[cfg(feature = "pinyin")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HanPinyin;

#[cfg(feature = "pinyin")]
impl Transliterate for HanPinyin {
    fn transliterate(&self, phrase: &str) -> Vec<String> {
        use pinyin::ToPinyin;

        phrase
            .to_pinyin()
            .flatten()
            .map(|syllable| syllable.plain().to_string())
            .collect()
    }
}

/// Tokenize a (pre-lowercased) phrase under its detected script family.
///
/// `transliterator` overrides the built-in pinyin conversion when set.
/// Without the `pinyin` feature and without an override, Han phrases fall
/// back to whitespace splitting.
pub(crate) fn tokenize(phrase: &str, transliterator: Option<&dyn Transliterate>) -> Vec<String> {
    if detect_script(phrase) == ScriptFamily::Han {
        if let Some(t) = transliterator {
            return t.transliterate(phrase);
        }
        if let Some(tokens) = builtin_transliterate(phrase) {
            return tokens;
        }
    }
    // Single-space split, not split_whitespace: runs of spaces produce empty
    // tokens, and existing indexes depend on that shape.
    phrase.split(' ').map(str::to_string).collect()
}

#[cfg(feature = "pinyin")]
fn builtin_transliterate(phrase: &str) -> Option<Vec<String>> {
    Some(HanPinyin.transliterate(phrase))
}

#[cfg(not(feature = "pinyin"))]
fn builtin_transliterate(_phrase: &str) -> Option<Vec<String>> {
    None
}

/// The built-in stop-word list as an owned set, for
/// [`BuildOptions::stop_words`](crate::BuildOptions::stop_words) callers
/// that want to extend it.
pub fn default_stop_words() -> HashSet<String> {
    STOP_WORDS.iter().map(|w| (*w).to_string()).collect()
}
