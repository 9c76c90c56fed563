//! End-to-end tests through the file-backed operations.

use crate::matcher::Matcher;
use crate::medium::FileMedium;
use crate::session::{Session, SessionOptions};
use crate::store::KnowledgeStore;
use crate::{ask, stats, teach};
use recall_core::AppError;
use std::io::Cursor;
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teach_then_ask() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".recall").join("knowledge_base.json");

        assert_eq!(ask(&path, "What is your name?", 0.8).unwrap(), None);

        assert_eq!(teach(&path, "What is your name?", "Recall").unwrap(), 1);
        assert_eq!(teach(&path, "How old are you?", "Brand new").unwrap(), 2);

        let found = ask(&path, "what is ur name", 0.8).unwrap().unwrap();
        assert_eq!(found.question, "What is your name?");
        assert_eq!(found.answer, "Recall");
        assert!(found.score >= 0.8);

        assert_eq!(ask(&path, "what is ur name", 0.9).unwrap(), None);
    }

    #[test]
    fn test_ask_rejects_bad_cutoff() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kb.json");
        assert!(matches!(ask(&path, "hi", 2.0), Err(AppError::Config(_))));
    }

    #[test]
    fn test_teach_rejects_blank_answer_without_writing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kb.json");

        let err = teach(&path, "Question?", " ").unwrap_err();
        assert!(matches!(err, AppError::InvalidEntry(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_teach_refuses_corrupt_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kb.json");
        std::fs::write(&path, r#"{"qs": []}"#).unwrap();

        let err = teach(&path, "Question?", "Answer").unwrap_err();
        assert!(matches!(err, AppError::StoreCorrupt(_)));
        // Corrupt content is left for the operator to inspect
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"qs": []}"#);
    }

    #[test]
    fn test_stats() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kb.json");

        let empty = stats(&path).unwrap();
        assert!(!empty.exists);
        assert_eq!(empty.size_bytes, 0);
        assert_eq!(empty.counts.entries_count, 0);

        teach(&path, "a?", "1").unwrap();
        teach(&path, "a?", "2").unwrap();
        teach(&path, "b?", "3").unwrap();

        let report = stats(&path).unwrap();
        assert!(report.exists);
        assert_eq!(report.size_bytes, std::fs::metadata(&path).unwrap().len());
        assert_eq!(report.counts.entries_count, 3);
        assert_eq!(report.counts.unique_questions, 2);
        assert_eq!(report.counts.shadowed_entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_store_is_not_treated_as_missing() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        let path = locked.join("kb.json");
        teach(&path, "q?", "a").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        let opened = KnowledgeStore::open_or_init(&path);
        let report = stats(&path);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Privileged users can still read through the locked directory
        match opened {
            Ok(store) => assert_eq!(store.len(), 1),
            Err(err) => assert!(matches!(err, AppError::StoreUnavailable(_))),
        }
        match report {
            Ok(report) => assert!(report.exists && report.size_bytes > 0),
            Err(err) => assert!(matches!(err, AppError::StoreUnavailable(_))),
        }
    }

    #[test]
    fn test_session_persists_to_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kb.json");

        let mut session = Session::new(
            KnowledgeStore::open_or_init(&path).unwrap(),
            Matcher::default(),
            FileMedium::new(&path),
            SessionOptions::default(),
            Cursor::new(b"Favourite colour?\nBlue\nfavourite colour\nn\nGreen\nquit\n".to_vec()),
            Vec::new(),
        );
        let summary = session.run().unwrap();
        assert_eq!(summary.learned, 1);
        assert_eq!(summary.corrected, 1);
        assert_eq!(summary.save_failures, 0);

        let reloaded = KnowledgeStore::load(&FileMedium::new(&path)).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.find_answer("Favourite colour?"), Some("Blue"));
        assert_eq!(reloaded.find_answer("favourite colour"), Some("Green"));
    }

    #[test]
    fn test_session_survives_save_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut session = Session::new(
            KnowledgeStore::new(),
            Matcher::default(),
            FileMedium::new(blocker.join("kb.json")),
            SessionOptions::default(),
            Cursor::new(b"Question?\nAnswer\n".to_vec()),
            Vec::new(),
        );
        let summary = session.run().unwrap();
        assert_eq!(summary.learned, 1);
        assert_eq!(summary.save_failures, 1);
        assert_eq!(session.store().find_answer("Question?"), Some("Answer"));
    }
}
