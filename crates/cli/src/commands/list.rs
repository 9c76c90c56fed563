//! List command handler.
//!
//! Prints every stored entry in insertion order.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};
use recall_knowledge::KnowledgeStore;

/// List everything the assistant knows
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing list command");

        let store = KnowledgeStore::open_or_init(&config.store_path())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(store.entries())?);
            return Ok(());
        }

        if store.is_empty() {
            println!("The knowledge base is empty.");
            return Ok(());
        }

        for (position, entry) in store.entries().iter().enumerate() {
            println!("{:>4}. Q: {}", position + 1, entry.question);
            println!("      A: {}", entry.answer);
        }

        Ok(())
    }
}
