//! Stats command handler.
//!
//! Handles knowledge base statistics display.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};

/// Show knowledge base statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = recall_knowledge::stats(&config.store_path())?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Knowledge base: {}", stats.store_path.display());
        if !stats.exists {
            println!("  (not created yet)");
        }
        println!("  Entries: {}", stats.counts.entries_count);
        println!("  Distinct questions: {}", stats.counts.unique_questions);
        println!("  Shadowed duplicates: {}", stats.counts.shadowed_entries);
        println!("  Size: {} bytes", stats.size_bytes);
        println!("  Cutoff: {}", config.cutoff);

        Ok(())
    }
}
