//! Tests for matcher and store laws over sample inputs.

use crate::matcher::{best_match, similarity};
use crate::medium::{FileMedium, MemoryMedium};
use crate::store::KnowledgeStore;
use crate::types::QaEntry;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    /// Question corpus used by the matcher laws.
    fn known_questions() -> Vec<&'static str> {
        vec![
            "What is your name?",
            "How old are you?",
            "What is your name?",
            "Where do you live?",
            "What can you do?",
            "Do you like Rust?",
            "¿Cómo estás?",
            "",
        ]
    }

    fn queries() -> Vec<&'static str> {
        vec![
            "What is your name?",
            "what is ur name",
            "whats your name",
            "how old r u",
            "Where do you live",
            "what can u do?",
            "do you like rust",
            "como estas",
            "Tell me a joke",
            "",
            "x",
        ]
    }

    #[test]
    fn test_exact_query_is_always_found() {
        let questions = known_questions();
        for query in questions.iter().filter(|q| !q.is_empty()) {
            for cutoff in [0.0, 0.5, 0.8, 1.0] {
                assert_eq!(best_match(query, &questions, cutoff), Some(*query));
            }
        }
    }

    #[test]
    fn test_empty_candidates_never_match() {
        let empty: Vec<String> = Vec::new();
        for query in queries() {
            assert_eq!(best_match(query, &empty, 0.0), None);
            assert_eq!(best_match(query, &empty, 0.8), None);
        }
    }

    #[test]
    fn test_result_never_below_cutoff() {
        let questions = known_questions();
        for query in queries() {
            for cutoff in [0.0, 0.3, 0.6, 0.8, 0.9, 1.0] {
                if let Some(found) = best_match(query, &questions, cutoff) {
                    assert!(
                        similarity(query, found) >= cutoff,
                        "{:?} -> {:?} below {}",
                        query,
                        found,
                        cutoff
                    );
                }
            }
        }
    }

    #[test]
    fn test_result_is_highest_scoring() {
        let questions = known_questions();
        for query in queries() {
            if let Some(found) = best_match(query, &questions, 0.0) {
                let best = similarity(query, found);
                for candidate in &questions {
                    assert!(similarity(query, candidate) <= best);
                }
            }
        }
    }

    #[test]
    fn test_raising_cutoff_never_adds_matches() {
        let questions = known_questions();
        for query in queries() {
            let strict = best_match(query, &questions, 1.0);
            let loose = best_match(query, &questions, 0.8);
            if strict.is_some() {
                assert!(loose.is_some(), "{:?} matched at 1.0 but not 0.8", query);
            }
        }
    }

    #[test]
    fn test_similarity_bounds() {
        for query in queries() {
            for candidate in known_questions() {
                let score = similarity(query, candidate);
                assert!((0.0..=1.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_append_then_find_respects_shadowing() {
        let mut store = KnowledgeStore::new();
        store.append("Capital of France?", "Paris").unwrap();
        assert_eq!(store.find_answer("Capital of France?"), Some("Paris"));

        store.append("Capital of Italy?", "Rome").unwrap();
        assert_eq!(store.find_answer("Capital of Italy?"), Some("Rome"));

        // Earlier entry shadows the new one
        store.append("Capital of France?", "Lyon").unwrap();
        assert_eq!(store.find_answer("Capital of France?"), Some("Paris"));
    }

    fn round_trip_cases() -> Vec<Vec<QaEntry>> {
        vec![
            vec![],
            vec![QaEntry::new("hi", "hello")],
            vec![
                QaEntry::new("Wie geht's?", "Gut, danke 😊"),
                QaEntry::new("日本語を話せますか？", "はい、少し。"),
            ],
            vec![
                QaEntry::new("Say \"cheese\"", "\"cheese\""),
                QaEntry::new("multi\nline?", "line one\nline two\r\n\ttabbed"),
                QaEntry::new("back\\slash", "{\"questions\": []}"),
            ],
            vec![
                QaEntry::new("dup", "first"),
                QaEntry::new("dup", "second"),
                QaEntry::new("  padded  ", "  kept  "),
            ],
        ]
    }

    #[test]
    fn test_save_load_round_trip_in_memory() {
        for entries in round_trip_cases() {
            let store = KnowledgeStore::from_entries(entries.clone());
            let mut medium = MemoryMedium::new();
            store.save(&mut medium).unwrap();

            let loaded = KnowledgeStore::load(&medium).unwrap();
            assert_eq!(loaded.entries(), entries.as_slice());
        }
    }

    #[test]
    fn test_save_load_round_trip_on_disk() {
        let temp = TempDir::new().unwrap();
        for (i, entries) in round_trip_cases().into_iter().enumerate() {
            let mut medium = FileMedium::new(temp.path().join(format!("kb-{}.json", i)));
            let store = KnowledgeStore::from_entries(entries.clone());
            store.save(&mut medium).unwrap();

            let loaded = KnowledgeStore::load(&medium).unwrap();
            assert_eq!(loaded, store);
        }
    }
}
