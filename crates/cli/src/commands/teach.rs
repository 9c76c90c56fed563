//! Teach command handler.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};

/// Teach an answer to a question
#[derive(Args, Debug)]
pub struct TeachCommand {
    /// Question exactly as it should be remembered
    pub question: String,

    /// Answer to give for it
    pub answer: String,
}

impl TeachCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing teach command");

        let count = recall_knowledge::teach(&config.store_path(), &self.question, &self.answer)?;

        println!("Learned. The knowledge base now holds {} answers.", count);
        Ok(())
    }
}
