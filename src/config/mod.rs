//! Compose file loading and safe rewriting.
//!
//! This module owns every filesystem access in the crate:
//!
//! - **Whole-file loads**: the file is read once, up front, and decoded
//!   explicitly so missing, unreadable and non-UTF-8 files are told apart
//! - **Automatic backups**: every rewrite creates a timestamped backup
//! - **Atomic writes**: temp-file-then-rename via `ComposeTransaction`
//!
//! # Example
//!
//! ```no_run
//! use compose_lint::config;
//!
//! let table = config::parse("~/.XCompose")?;
//! println!("{} sequences", table.len());
//! # Ok::<(), compose_lint::config::ConfigError>(())
//! ```

use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::parser::parse_content;
use crate::core::table::SequenceTable;

pub mod error;
pub mod tagger;
pub mod transaction;
pub mod validator;

pub use error::ConfigError;
pub use transaction::ComposeTransaction;

/// Expands a leading `~` in a user-supplied path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Reads a whole compose file into memory
///
/// # Errors
///
/// - `ConfigError::NotFound` if the path does not exist
/// - `ConfigError::Unreadable` if it cannot be read
/// - `ConfigError::Encoding` if it is not valid UTF-8
pub fn read_compose_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "compose file not found");
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let content = String::from_utf8(bytes).map_err(|source| ConfigError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "loaded compose file");
    Ok(content)
}

/// Loads and parses a compose file in one call
///
/// `~` is expanded. Only load failures are errors; everything wrong
/// inside the file is left for the conflict detector to report.
pub fn parse(path: impl AsRef<str>) -> Result<SequenceTable, ConfigError> {
    let path = expand_path(path.as_ref());
    let content = read_compose_file(&path)?;
    Ok(parse_content(&content))
}

/// A compose file that may be rewritten in place.
///
/// Reads need no setup; writes go through `ComposeTransaction`, which
/// backs the file up first.
#[derive(Debug)]
pub struct ComposeFile {
    path: PathBuf,
    backup_dir: PathBuf,
}

impl ComposeFile {
    /// Opens a compose file for rewriting.
    ///
    /// Creates a `.compose-backups/` directory next to the file if needed. If the
    /// file is a symlink a warning is logged but the operation continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist.
    /// Returns `ConfigError::BackupDirNotWritable` if the backup directory
    /// cannot be created.
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        if path.read_link().is_ok() {
            warn!(path = %path.display(), "compose file is a symlink; the link target will be rewritten");
        }

        // e.g., ~/.XCompose → ~/.compose-backups/
        let backup_dir = path
            .parent()
            .map(|parent| parent.join(".compose-backups"))
            .ok_or_else(|| ConfigError::BackupDirNotWritable(PathBuf::from("File has no parent directory")))?;

        if !backup_dir.exists() {
            fs::create_dir_all(&backup_dir)
                .map_err(|_| ConfigError::BackupDirNotWritable(backup_dir.clone()))?;
        }

        if backup_dir.metadata()?.permissions().readonly() {
            return Err(ConfigError::BackupDirNotWritable(backup_dir));
        }

        Ok(Self { path, backup_dir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Reads the current file content.
    pub fn read(&self) -> Result<String, ConfigError> {
        read_compose_file(&self.path)
    }

    /// Copies the current file to `.compose-backups/<name>.<YYYY-MM-DD_HHMMSS>`.
    pub(crate) fn create_timestamped_backup(&self) -> Result<PathBuf, ConfigError> {
        let content = fs::read(&self.path)?;

        let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");

        let original_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ConfigError::BackupFailed("File name is not valid UTF-8".to_string()))?;

        let backup_path = self
            .backup_dir
            .join(format!("{}.{}", original_name, timestamp));

        fs::write(&backup_path, &content)
            .map_err(|e| ConfigError::BackupFailed(format!("{}: {}", backup_path.display(), e)))?;

        debug!(backup = %backup_path.display(), "created backup");
        Ok(backup_path)
    }

    /// Lists backups of this file, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let prefix = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{}.", name))
            .unwrap_or_default();

        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();

        backups.sort();
        backups.reverse();
        Ok(backups)
    }
}

#[cfg(test)]
mod tests;
