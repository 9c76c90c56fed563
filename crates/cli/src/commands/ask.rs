//! Ask command handler.
//!
//! Answers one question from the knowledge base. Never learns anything.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};

/// Answer one question without learning
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let found = recall_knowledge::ask(&config.store_path(), &self.question, config.cutoff)?;

        if self.json {
            let output = serde_json::json!({
                "query": self.question,
                "cutoff": config.cutoff,
                "match": found,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        match found {
            Some(found) => println!("{}", found.answer),
            None => println!("I don't know the answer to that yet."),
        }

        Ok(())
    }
}
