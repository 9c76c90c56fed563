//! Configuration management for recall.
//!
//! Configuration is merged from, in increasing precedence:
//! - Built-in defaults
//! - The YAML config file (`.recall/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric: the knowledge base and config file
//! live under `<workspace>/.recall/` unless pointed elsewhere.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default similarity cutoff for approximate question matching.
pub const DEFAULT_CUTOFF: f64 = 0.8;

/// Default knowledge base file name inside the `.recall` directory.
pub const DEFAULT_STORE_FILE: &str = "knowledge_base.json";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .recall/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Knowledge base location; relative paths resolve against the workspace
    pub store_path: Option<PathBuf>,

    /// Minimum similarity for a known question to count as a match
    pub cutoff: f64,

    /// Save corrections to disk as soon as they are given
    pub persist_corrections: bool,

    /// Input that ends a chat session (compared case-insensitively)
    pub quit_word: String,

    /// Reply that declines to teach an answer (compared case-insensitively)
    pub skip_word: String,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    workspace: Option<WorkspaceConfig>,
    store: Option<StoreConfig>,
    matcher: Option<MatcherConfig>,
    session: Option<SessionConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MatcherConfig {
    cutoff: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionConfig {
    #[serde(rename = "persistCorrections")]
    persist_corrections: Option<bool>,

    #[serde(rename = "quitWord")]
    quit_word: Option<String>,

    #[serde(rename = "skipWord")]
    skip_word: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            store_path: None,
            cutoff: DEFAULT_CUTOFF,
            persist_corrections: true,
            quit_word: "quit".to_string(),
            skip_word: "skip".to_string(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, the config file and defaults.
    ///
    /// Environment variables:
    /// - `RECALL_WORKSPACE`: Override workspace path
    /// - `RECALL_CONFIG`: Path to config file
    /// - `RECALL_STORE`: Knowledge base file
    /// - `RECALL_CUTOFF`: Similarity cutoff
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use recall_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Store: {:?}", config.store_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration with an explicit workspace and config file.
    ///
    /// Explicit arguments win over `RECALL_WORKSPACE` and `RECALL_CONFIG`, so
    /// command-line flags select which config file is read.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env_path("RECALL_WORKSPACE")) {
            config.workspace = workspace;
        }
        config.config_file = config_file.or_else(|| env_path("RECALL_CONFIG"));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.recall_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file does not exist: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Some(store) = env_path("RECALL_STORE") {
            config.store_path = Some(store);
        }

        if let Ok(cutoff) = std::env::var("RECALL_CUTOFF") {
            config.cutoff = parse_cutoff(&cutoff)?;
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(path) = config_file.store.and_then(|store| store.path) {
            result.store_path = Some(PathBuf::from(path));
        }

        if let Some(cutoff) = config_file.matcher.and_then(|m| m.cutoff) {
            result.cutoff = cutoff;
        }

        if let Some(session) = config_file.session {
            if let Some(persist) = session.persist_corrections {
                result.persist_corrections = persist;
            }
            if let Some(word) = session.quit_word {
                result.quit_word = word;
            }
            if let Some(word) = session.skip_word {
                result.skip_word = word;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the config file.
    pub fn with_overrides(
        mut self,
        store_path: Option<PathBuf>,
        cutoff: Option<f64>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(store_path) = store_path {
            self.store_path = Some(store_path);
        }

        if let Some(cutoff) = cutoff {
            self.cutoff = cutoff;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .recall directory.
    pub fn recall_dir(&self) -> PathBuf {
        self.workspace.join(".recall")
    }

    /// Resolved knowledge base path.
    pub fn store_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.workspace.join(path),
            None => self.recall_dir().join(DEFAULT_STORE_FILE),
        }
    }

    /// Ensure the directory holding the knowledge base exists.
    pub fn ensure_store_dir(&self) -> AppResult<()> {
        let store_path = self.store_path();
        if let Some(parent) = store_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Config(format!(
                        "Failed to create store directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Validate the merged configuration.
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(AppError::Config(format!(
                "Cutoff must be within [0.0, 1.0], got {}",
                self.cutoff
            )));
        }

        if self.quit_word.trim().is_empty() {
            return Err(AppError::Config("quitWord must not be empty".to_string()));
        }

        if self.skip_word.trim().is_empty() {
            return Err(AppError::Config("skipWord must not be empty".to_string()));
        }

        Ok(())
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name).ok().map(PathBuf::from)
}

fn parse_cutoff(raw: &str) -> AppResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| AppError::Config(format!("Invalid cutoff '{}': {}", raw, e)))
}
