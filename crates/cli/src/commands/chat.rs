//! Chat command handler.
//!
//! Runs the interactive question/answer loop on stdin and stdout.

use clap::Args;
use recall_core::{config::AppConfig, AppResult};
use recall_knowledge::{FileMedium, KnowledgeStore, Matcher, Session, SessionOptions};

/// Start an interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Keep corrections in memory only (they are saved with the next new answer)
    #[arg(long)]
    pub no_save_corrections: bool,
}

impl ChatCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let store_path = config.store_path();
        config.ensure_store_dir()?;

        let store = KnowledgeStore::open_or_init(&store_path)?;
        let matcher = Matcher::new(config.cutoff)?;

        let mut options = SessionOptions::from_config(config);
        if self.no_save_corrections {
            options.persist_corrections = false;
        }

        tracing::info!(
            "Loaded {} known questions from {:?}",
            store.len(),
            store_path
        );

        let stdin = std::io::stdin();
        let mut session = Session::new(
            store,
            matcher,
            FileMedium::new(&store_path),
            options,
            stdin.lock(),
            std::io::stdout(),
        );
        let summary = session.run()?;

        tracing::debug!("Session summary: {:?}", summary);
        Ok(())
    }
}
