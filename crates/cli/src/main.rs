//! Recall CLI
//!
//! Main entry point for the recall command-line tool: a question/answer
//! assistant that learns new answers from its user.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, ListCommand, StatsCommand, TeachCommand};
use recall_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Recall - a question/answer assistant that learns from you
#[derive(Parser, Debug)]
#[command(name = "recall")]
#[command(about = "A question/answer assistant that learns from you", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "RECALL_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "RECALL_CONFIG")]
    config: Option<PathBuf>,

    /// Knowledge base file (default: <workspace>/.recall/knowledge_base.json)
    #[arg(short, long, global = true, env = "RECALL_STORE")]
    store: Option<PathBuf>,

    /// Similarity cutoff between 0.0 and 1.0
    #[arg(long, global = true, env = "RECALL_CUTOFF")]
    cutoff: Option<f64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive chat session
    Chat(ChatCommand),

    /// Answer one question without learning
    Ask(AskCommand),

    /// Teach an answer to a question
    Teach(TeachCommand),

    /// List everything the assistant knows
    List(ListCommand),

    /// Show knowledge base statistics
    Stats(StatsCommand),
}

fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.workspace, cli.config)?;
    let config = config.with_overrides(
        cli.store,
        cli.cutoff,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Store: {:?}", config.store_path());
    tracing::debug!("Cutoff: {}", config.cutoff);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Teach(_) => "teach",
        Commands::List(_) => "list",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config),
        Commands::Ask(cmd) => cmd.execute(&config),
        Commands::Teach(cmd) => cmd.execute(&config),
        Commands::List(cmd) => cmd.execute(&config),
        Commands::Stats(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
