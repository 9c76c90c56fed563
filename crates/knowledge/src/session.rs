//! Interactive chat session.
//!
//! One turn: read a question, match it against the known questions, then
//! either show the stored answer (and accept a correction) or ask the user to
//! teach a new one. Input and output are generic so tests can script a whole
//! conversation.

use crate::matcher::Matcher;
use crate::medium::StoreMedium;
use crate::store::KnowledgeStore;
use crate::{lookup, Lookup};
use recall_core::{AppConfig, AppResult};
use std::io::{BufRead, Write};

/// Behaviour switches for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Save corrections immediately instead of only keeping them in memory
    pub persist_corrections: bool,

    /// Input that ends the session, compared case-insensitively
    pub quit_word: String,

    /// Reply that declines to teach, compared case-insensitively
    pub skip_word: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            persist_corrections: true,
            quit_word: "quit".to_string(),
            skip_word: "skip".to_string(),
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            persist_corrections: config.persist_corrections,
            quit_word: config.quit_word.clone(),
            skip_word: config.skip_word.clone(),
        }
    }
}

/// What a single turn did.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// A known answer was shown and accepted
    Answered { question: String, score: f64 },
    /// A known answer was shown and the user supplied a better one
    Corrected { question: String },
    /// No match; the user taught a new answer
    Learned,
    /// No match and nothing was learned
    Skipped,
    /// Quit word or end of input
    Quit,
}

/// Counts reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub turns: usize,
    pub answered: usize,
    pub corrected: usize,
    pub learned: usize,
    pub skipped: usize,
    pub save_failures: usize,
}

impl SessionSummary {
    fn record(&mut self, outcome: &TurnOutcome) {
        match outcome {
            TurnOutcome::Answered { .. } => self.answered += 1,
            TurnOutcome::Corrected { .. } => self.corrected += 1,
            TurnOutcome::Learned => self.learned += 1,
            TurnOutcome::Skipped => self.skipped += 1,
            TurnOutcome::Quit => return,
        }
        self.turns += 1;
    }
}

/// A chat session that owns the store for its whole lifetime.
pub struct Session<M, R, W> {
    store: KnowledgeStore,
    matcher: Matcher,
    medium: M,
    options: SessionOptions,
    input: R,
    output: W,
    save_failures: usize,
}

impl<M: StoreMedium, R: BufRead, W: Write> Session<M, R, W> {
    pub fn new(
        store: KnowledgeStore,
        matcher: Matcher,
        medium: M,
        options: SessionOptions,
        input: R,
        output: W,
    ) -> Self {
        Self {
            store,
            matcher,
            medium,
            options,
            input,
            output,
            save_failures: 0,
        }
    }

    /// Run turns until the quit word or end of input.
    pub fn run(&mut self) -> AppResult<SessionSummary> {
        let mut summary = SessionSummary::default();

        loop {
            let outcome = self.turn()?;
            if outcome == TurnOutcome::Quit {
                break;
            }
            summary.record(&outcome);
        }

        summary.save_failures = self.save_failures;
        tracing::info!(
            "Session ended after {} turns ({} learned, {} corrected)",
            summary.turns,
            summary.learned,
            summary.corrected
        );
        Ok(summary)
    }

    /// Play a single turn. Blank input lines are ignored and re-prompted.
    pub fn turn(&mut self) -> AppResult<TurnOutcome> {
        let query = loop {
            match self.prompt("You: ")? {
                None => return Ok(TurnOutcome::Quit),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => break line,
            }
        };

        if query.to_lowercase() == self.options.quit_word.to_lowercase() {
            return Ok(TurnOutcome::Quit);
        }

        match lookup(&self.store, &self.matcher, &query) {
            Some(found) => self.answer(query, found),
            None => self.teach(query),
        }
    }

    fn answer(&mut self, query: String, found: Lookup) -> AppResult<TurnOutcome> {
        tracing::debug!(
            "Matched {:?} to {:?} with score {:.3}",
            query,
            found.question,
            found.score
        );
        writeln!(self.output, "Bot: {}", found.answer)?;

        let satisfied = self
            .prompt("Are you satisfied with the answer (Y/N): ")?
            .map_or(true, |reply| reply.to_lowercase() != "n");
        if satisfied {
            return Ok(TurnOutcome::Answered {
                question: found.question,
                score: found.score,
            });
        }

        let correction = self.prompt("What answer are you looking for: ")?;
        let Some(correction) = correction.filter(|c| !c.trim().is_empty()) else {
            writeln!(self.output, "Bot: Nothing learned.")?;
            return Ok(TurnOutcome::Answered {
                question: found.question,
                score: found.score,
            });
        };

        self.store.append(query, correction)?;
        if self.options.persist_corrections {
            self.persist()?;
        }
        writeln!(self.output, "Bot: Thanks, I'll remember that.")?;

        Ok(TurnOutcome::Corrected {
            question: found.question,
        })
    }

    fn teach(&mut self, query: String) -> AppResult<TurnOutcome> {
        tracing::debug!("No match for {:?}", query);
        writeln!(self.output, "I don't know the answer. Can you teach me?")?;

        let prompt = format!("Type the answer or \"{}\" to skip\n", self.options.skip_word);
        let Some(reply) = self.prompt(&prompt)? else {
            return Ok(TurnOutcome::Skipped);
        };

        if reply.to_lowercase() == self.options.skip_word.to_lowercase() {
            return Ok(TurnOutcome::Skipped);
        }
        if reply.trim().is_empty() {
            writeln!(self.output, "Bot: Nothing learned.")?;
            return Ok(TurnOutcome::Skipped);
        }

        self.store.append(query, reply)?;
        self.persist()?;
        writeln!(self.output, "Bot: Thank you! I learned a new response.")?;

        Ok(TurnOutcome::Learned)
    }

    /// Save the store. A failed save is reported to the user and the session
    /// continues; the entry stays in memory and goes out with the next save.
    fn persist(&mut self) -> AppResult<()> {
        if let Err(e) = self.store.save(&mut self.medium) {
            tracing::error!("Failed to save knowledge base: {}", e);
            self.save_failures += 1;
            writeln!(self.output, "Bot: I could not save that ({}).", e)?;
        }
        Ok(())
    }

    /// Print `text` and read one line without its line ending. `None` on EOF.
    fn prompt(&mut self, text: &str) -> AppResult<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Hand the store back, e.g. for a final save by the caller.
    pub fn into_store(self) -> KnowledgeStore {
        self.store
    }
}
