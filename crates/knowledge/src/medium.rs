//! Persistence media for the knowledge store.
//!
//! A medium is a named byte resource that supports reading its whole content
//! and overwriting its whole content. The store never appends or seeks.

use recall_core::{AppError, AppResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for knowledge store backends.
///
/// Implementations must:
/// - Return the full current content from `read_all`
/// - Replace the full content in `write_all`, never exposing a partial write
/// - Report failures as `AppError::StoreUnavailable`
pub trait StoreMedium {
    /// Read the whole persisted content.
    fn read_all(&self) -> AppResult<Vec<u8>>;

    /// Overwrite the persisted content.
    fn write_all(&mut self, bytes: &[u8]) -> AppResult<()>;

    /// Human-readable name for logs and error messages.
    fn describe(&self) -> String;
}

/// A knowledge base stored in a single file.
///
/// Writes go to a sibling `<name>.tmp` file which is synced and then renamed
/// over the target, so readers see either the old or the new content.
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file exists. Metadata errors (e.g. permission denied) are
    /// `StoreUnavailable`, never "absent".
    pub fn exists(&self) -> AppResult<bool> {
        self.path.try_exists().map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to inspect {:?}: {}", self.path, e))
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "knowledge_base".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StoreMedium for FileMedium {
    fn read_all(&self) -> AppResult<Vec<u8>> {
        fs::read(&self.path).map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to read {:?}: {}", self.path, e))
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::StoreUnavailable(format!(
                        "Failed to create directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }

        let temp_path = self.temp_path();
        let written = fs::File::create(&temp_path)
            .and_then(|mut file| {
                file.write_all(bytes)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&temp_path, &self.path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(AppError::StoreUnavailable(format!(
                "Failed to write {:?}: {}",
                self.path, e
            )));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A knowledge base held in memory.
///
/// Useful for tests and for embedding the assistant without a filesystem.
/// Reading an empty medium is `StoreUnavailable`, like a missing file.
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium {
    contents: Option<Vec<u8>>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Some(bytes.into()),
        }
    }

    /// Last written content, if any.
    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }
}

impl StoreMedium for MemoryMedium {
    fn read_all(&self) -> AppResult<Vec<u8>> {
        self.contents
            .clone()
            .ok_or_else(|| AppError::StoreUnavailable("memory medium is empty".to_string()))
    }

    fn write_all(&mut self, bytes: &[u8]) -> AppResult<()> {
        self.contents = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
