//! Self-teaching question/answer knowledge base.
//!
//! Known questions are matched approximately against new ones; unknown
//! questions are taught by the user and persisted as JSON.

pub mod matcher;
pub mod medium;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use matcher::{best_match, similarity, Matcher, ScoredMatch};
pub use medium::{FileMedium, MemoryMedium, StoreMedium};
pub use session::{Session, SessionOptions, SessionSummary, TurnOutcome};
pub use store::KnowledgeStore;
pub use types::{KnowledgeFile, QaEntry, StoreStats};

use recall_core::{AppError, AppResult};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// An answer found for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    /// Known question the query matched
    pub question: String,

    /// Answer stored for that question
    pub answer: String,

    /// Similarity between the query and `question`
    pub score: f64,
}

/// Match `query` against every known question and fetch the answer.
///
/// The answer comes from an exact lookup of the matched question, so for
/// duplicated questions the earliest entry answers.
pub fn lookup(store: &KnowledgeStore, matcher: &Matcher, query: &str) -> Option<Lookup> {
    let questions = store.questions();
    let found = matcher.best_scored(query, &questions)?;
    let answer = store.find_answer(found.candidate)?;

    Some(Lookup {
        question: found.candidate.to_string(),
        answer: answer.to_string(),
        score: found.score,
    })
}

/// Answer a single question from the knowledge base at `store_path`.
pub fn ask(store_path: &Path, query: &str, cutoff: f64) -> AppResult<Option<Lookup>> {
    let matcher = Matcher::new(cutoff)?;
    let store = KnowledgeStore::open_or_init(store_path)?;

    let found = lookup(&store, &matcher, query);
    match &found {
        Some(found) => tracing::info!(
            "Matched {:?} with score {:.3}",
            found.question,
            found.score
        ),
        None => tracing::info!("No known question within cutoff {}", cutoff),
    }
    Ok(found)
}

/// Append a question/answer pair and save the knowledge base.
pub fn teach(store_path: &Path, question: &str, answer: &str) -> AppResult<usize> {
    let mut store = KnowledgeStore::open_or_init(store_path)?;
    store.append(question, answer)?;
    store.save(&mut FileMedium::new(store_path))?;

    tracing::info!("Taught {:?}, store now has {} entries", question, store.len());
    Ok(store.len())
}

/// Knowledge base statistics plus where it lives.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub store_path: PathBuf,
    pub exists: bool,
    pub size_bytes: u64,
    #[serde(flatten)]
    pub counts: StoreStats,
}

/// Collect statistics for the knowledge base at `store_path`.
pub fn stats(store_path: &Path) -> AppResult<BaseStats> {
    let medium = FileMedium::new(store_path);
    let exists = medium.exists()?;
    let store = KnowledgeStore::open_or_init(store_path)?;

    let size_bytes = if exists {
        std::fs::metadata(store_path)
            .map_err(|e| {
                AppError::StoreUnavailable(format!("Failed to stat {:?}: {}", store_path, e))
            })?
            .len()
    } else {
        0
    };

    Ok(BaseStats {
        store_path: store_path.to_path_buf(),
        exists,
        size_bytes,
        counts: store.stats(),
    })
}
