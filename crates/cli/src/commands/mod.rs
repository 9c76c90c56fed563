//! Command handlers for the recall CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod chat;
pub mod list;
pub mod stats;
pub mod teach;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use list::ListCommand;
pub use stats::StatsCommand;
pub use teach::TeachCommand;
