//! The knowledge store: an ordered list of learned question/answer pairs.
//!
//! Insertion order matters. Exact lookups return the earliest entry for a
//! question, and the matcher breaks score ties by position.

use crate::medium::{FileMedium, StoreMedium};
use crate::types::{KnowledgeFile, QaEntry, StoreStats};
use recall_core::{AppError, AppResult};
use std::collections::HashSet;
use std::path::Path;

/// Owned, in-memory knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeStore {
    entries: Vec<QaEntry>,
}

impl KnowledgeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, keeping their order.
    pub fn from_entries(entries: Vec<QaEntry>) -> Self {
        Self { entries }
    }

    /// Load the whole store from a medium.
    ///
    /// Fails with `StoreUnavailable` if the medium cannot be read and with
    /// `StoreCorrupt` if the content is not a valid knowledge file.
    pub fn load(source: &dyn StoreMedium) -> AppResult<Self> {
        let bytes = source.read_all()?;
        let store = Self::from_json(&bytes).map_err(|e| match e {
            AppError::StoreCorrupt(msg) => {
                AppError::StoreCorrupt(format!("{}: {}", source.describe(), msg))
            }
            other => other,
        })?;

        tracing::debug!(
            "Loaded {} entries from {}",
            store.entries.len(),
            source.describe()
        );
        Ok(store)
    }

    /// Parse a store from its JSON representation.
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let file: KnowledgeFile =
            serde_json::from_slice(bytes).map_err(|e| AppError::StoreCorrupt(e.to_string()))?;

        for (position, entry) in file.questions.iter().enumerate() {
            if entry.question.trim().is_empty() || entry.answer.trim().is_empty() {
                tracing::warn!("Entry {} has an empty question or answer", position);
            }
        }

        Ok(Self {
            entries: file.questions,
        })
    }

    /// Load from a file, or start empty when the file does not exist yet.
    ///
    /// A file whose existence cannot be determined is `StoreUnavailable`.
    pub fn open_or_init(path: &Path) -> AppResult<Self> {
        let medium = FileMedium::new(path);
        if !medium.exists()? {
            tracing::info!("No knowledge base at {:?}, starting empty", path);
            return Ok(Self::new());
        }
        Self::load(&medium)
    }

    /// Serialize the full store and overwrite the destination.
    pub fn save(&self, destination: &mut dyn StoreMedium) -> AppResult<()> {
        let bytes = self.to_json()?;
        destination.write_all(&bytes)?;

        tracing::debug!(
            "Saved {} entries to {}",
            self.entries.len(),
            destination.describe()
        );
        Ok(())
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_json(&self) -> AppResult<Vec<u8>> {
        let file = KnowledgeFile {
            questions: self.entries.clone(),
        };
        let mut bytes = serde_json::to_vec_pretty(&file).map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to serialize knowledge base: {}", e))
        })?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Answer of the first entry whose question is exactly `question`.
    pub fn find_answer(&self, question: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.question == question)
            .map(|entry| entry.answer.as_str())
    }

    /// Add an entry at the end. Nothing is persisted until `save`.
    ///
    /// Rejects a blank question or answer.
    pub fn append(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> AppResult<()> {
        let entry = QaEntry::new(question, answer);

        if entry.question.trim().is_empty() {
            return Err(AppError::InvalidEntry("question is empty".to_string()));
        }
        if entry.answer.trim().is_empty() {
            return Err(AppError::InvalidEntry(format!(
                "answer to {:?} is empty",
                entry.question
            )));
        }

        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    /// Every known question in insertion order, duplicates included.
    pub fn questions(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.question.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> StoreStats {
        let unique: HashSet<&str> = self.entries.iter().map(|e| e.question.as_str()).collect();
        StoreStats {
            entries_count: self.entries.len(),
            unique_questions: unique.len(),
            shadowed_entries: self.entries.len() - unique.len(),
        }
    }
}
