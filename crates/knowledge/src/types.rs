//! Knowledge store type definitions.

use serde::{Deserialize, Serialize};

/// A learned question and its answer.
///
/// Entries are never edited once stored; a correction is a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QaEntry {
    /// Question text exactly as the user typed it
    pub question: String,

    /// Answer the user taught for this question
    pub answer: String,
}

impl QaEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// On-disk layout of the knowledge base.
///
/// `{ "questions": [ { "question": "...", "answer": "..." }, ... ] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeFile {
    pub questions: Vec<QaEntry>,
}

/// Aggregate numbers about a knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Total number of entries, duplicates included
    pub entries_count: usize,

    /// Number of distinct question strings
    pub unique_questions: usize,

    /// Entries whose question already appeared earlier in the store
    pub shadowed_entries: usize,
}
