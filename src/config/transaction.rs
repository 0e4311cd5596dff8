// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Compose file rewrites with automatic backups
//!
//! Provides atomic write operations for the auto-tagger.

use atomic_write_file::AtomicWriteFile;
use std::{fs, io::Write, path::Path, path::PathBuf};
use tracing::{info, warn};

use crate::config::{ComposeFile, ConfigError};
use crate::core::parser::parse_content;

/// Atomic rewrite of a compose file with a backup taken up front.
///
/// # Lifecycle
///
/// 1. `begin()` - Creates timestamped backup immediately
/// 2. Caller prepares new content (in memory)
/// 3. `commit()`/`commit_preserving()` - Writes atomically, or `rollback()` - Restores original
///
/// # Example
///
/// ```no_run
/// use compose_lint::config::{tagger, ComposeFile, ComposeTransaction};
/// use std::path::PathBuf;
///
/// let file = ComposeFile::new(PathBuf::from("XCompose"))?;
/// let outcome = tagger::retag_content(&file.read()?);
///
/// let tx = ComposeTransaction::begin(&file)?;
/// if let Err(e) = tx.commit_preserving(&outcome.content) {
///     eprintln!("Rewrite refused: {}", e);
/// }
/// # Ok::<(), compose_lint::config::ConfigError>(())
/// ```
pub struct ComposeTransaction<'a> {
    file: &'a ComposeFile,
    backup_path: Option<PathBuf>,
}

impl<'a> ComposeTransaction<'a> {
    /// Begins a new transaction by creating a timestamped backup.
    ///
    /// The transaction cannot outlive the `ComposeFile` it rewrites.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the backup cannot be
    /// written. Nothing has been modified in that case.
    pub fn begin(file: &'a ComposeFile) -> Result<Self, ConfigError> {
        // Rollback point exists before any modification
        let backup_path = file.create_timestamped_backup()?;

        Ok(Self {
            file,
            backup_path: Some(backup_path),
        })
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    /// Commits only if the new content defines the same sequences.
    ///
    /// Both the current file and `new_content` are parsed; the ordered
    /// list of `(keys, symbol)` pairs must be identical. Comments, tags
    /// and layout may change.
    ///
    /// # Errors
    ///
    /// `ConfigError::ValidationFailed` names the first differing position;
    /// the file is left untouched.
    pub fn commit_preserving(self, new_content: &str) -> Result<(), ConfigError> {
        let current = parse_content(&self.file.read()?);
        let proposed = parse_content(new_content);

        let before: Vec<(&[String], &str)> = current
            .all()
            .iter()
            .map(|s| (s.keys.as_slice(), s.symbol.as_str()))
            .collect();
        let after: Vec<(&[String], &str)> = proposed
            .all()
            .iter()
            .map(|s| (s.keys.as_slice(), s.symbol.as_str()))
            .collect();

        if before != after {
            let position = before
                .iter()
                .zip(&after)
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| before.len().min(after.len()));

            warn!(
                before = before.len(),
                after = after.len(),
                position,
                "rewrite would change sequence definitions"
            );

            return Err(ConfigError::ValidationFailed(format!(
                "rewritten content changes sequence definitions (first difference at sequence {} of {})",
                position + 1,
                before.len()
            )));
        }

        self.commit(new_content)
    }

    /// Commits the transaction by atomically writing new content.
    ///
    /// Temp file plus rename, so the file is never half-written. The backup
    /// from `begin()` stays in place. Consumes the transaction.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WriteFailed` if the temp file cannot be
    /// created, written or renamed; the original file is unchanged.
    pub fn commit(self, new_content: &str) -> Result<(), ConfigError> {
        write_atomically(self.file.path(), new_content)?;

        info!(path = %self.file.path().display(), "compose file rewritten");
        Ok(())
    }

    /// Restores the file from the backup created during `begin()`.
    ///
    /// Borrows immutably, so it may be retried.
    pub fn rollback(&self) -> Result<(), ConfigError> {
        let Some(backup_path) = &self.backup_path else {
            return Err(ConfigError::BackupFailed(
                "No backup available for rollback".to_string(),
            ));
        };

        let backup_content = fs::read_to_string(backup_path)?;
        write_atomically(self.file.path(), &backup_content)?;

        info!(backup = %backup_path.display(), "compose file restored from backup");
        Ok(())
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
