//! End-to-end completion scenarios over a realistic phrase file.

use std::io::Cursor;

use talpa::testing::index_from_phrases;
use talpa::{build_index, PhraseId, TrieIndex};

/// Phrase file used by the movie/title scenarios, one phrase per line,
/// ID = line number.
const TITLES: &[&str] = &[
    "the batman",         // 0
    "superman",           // 1
    "american idol",      // 2
    "american pie",       // 3
    "wonder woman",       // 4
    "wonder boy",         // 5
    "a robin hood",       // 6
    "the batman returns", // 7
];

fn titles_index() -> TrieIndex {
    index_from_phrases(TITLES, true)
}

#[test]
fn ball_and_bat_scenario() {
    let phrases = "A ball in the ground\nThe bat in the sky\nThe ball hit his head\n";
    let index = build_index(Cursor::new(phrases), true).unwrap();

    assert_eq!(index.find("Ball"), vec![0, 2]);
    assert_eq!(index.find("bat"), vec![1]);
}

#[test]
fn titles_scenario() {
    let index = titles_index();
    let cases: &[(&str, &[PhraseId])] = &[
        ("the batman", &[0, 7]),
        ("american", &[2, 3]),
        ("wonder", &[4, 5]),
        ("A robin", &[6]),
        ("wonder anything", &[]),
    ];
    for (query, expected) in cases {
        assert_eq!(&index.find(query), expected, "query {:?}", query);
    }
}

#[test]
fn stop_word_symmetry() {
    let index = index_from_phrases(&["the batman"], true);
    assert_eq!(index.find("batman"), vec![0]);
    assert_eq!(index.find("the batman"), index.find("batman"));
}

#[test]
fn shared_prefix_aggregation() {
    let index = titles_index();
    // Both american phrases share the leading run; either full phrase
    // still resolves, and the shared run returns both in insertion order.
    assert_eq!(index.find("american"), vec![2, 3]);
    assert_eq!(index.find("american idol"), vec![2]);
    assert_eq!(index.find("american pie"), vec![3]);
}

#[test]
fn self_containment_over_the_scenario_file() {
    let index = titles_index();
    for (id, phrase) in TITLES.iter().enumerate() {
        let results = index.find(phrase);
        assert!(
            results.contains(&(id as PhraseId)),
            "find({:?}) = {:?} missing {}",
            phrase,
            results,
            id
        );
    }
}

#[test]
fn scenario_results_survive_compaction_and_reload() {
    let mut index = titles_index();
    index.compact();
    let reloaded = TrieIndex::from_bytes(&index.to_bytes().unwrap()).unwrap();

    assert_eq!(reloaded.find("the batman"), vec![0, 7]);
    assert_eq!(reloaded.find("american"), vec![2, 3]);
    assert_eq!(reloaded.find("wonder anything"), Vec::<PhraseId>::new());
}

#[cfg(feature = "pinyin")]
mod pinyin_phrases {
    use super::*;
    use talpa::{detect_script, HanPinyin, ScriptFamily, Transliterate};

    #[test]
    fn han_phrases_match_via_pinyin_queries() {
        // "我们好" -> wo men hao, "我你" -> wo ni
        let index = index_from_phrases(&["我们好", "我你"], true);

        // Han queries are pre-transliterated by the caller, then space-joined.
        let query = |text: &str| -> Vec<PhraseId> {
            if detect_script(text) == ScriptFamily::Han {
                index.find(&HanPinyin.transliterate(text).join(" "))
            } else {
                index.find(text)
            }
        };

        assert_eq!(query("我"), vec![0, 1]);
        assert_eq!(query("我们"), vec![0]);
        assert_eq!(query("你"), Vec::<PhraseId>::new());
    }

    #[test]
    fn mixed_file_keeps_per_phrase_routing() {
        let index = index_from_phrases(&["the batman", "我们好", "我你"], true);
        assert_eq!(index.find("batman"), vec![0]);
        assert_eq!(index.find("wo"), vec![1, 2]);
    }
}
