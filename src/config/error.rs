use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

use crate::config::validator::ExitStatus;
use crate::core::finding::{Finding, FindingDetails, FindingKind, Severity};

/// Errors that can occur while loading or rewriting a compose file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Compose file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Compose file exists but could not be read.
    #[error("Failed to read file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Compose file is not valid UTF-8.
    #[error("Invalid UTF-8 encoding in {path}: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
    /// Backup directory cannot be created or written to.
    #[error("Backup directory not writable: {0}")]
    BackupDirNotWritable(PathBuf),
    /// Failed to create backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// Rewritten content would change the parsed sequences.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// True for errors that mean the input could not be loaded at all
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ConfigError::NotFound(_) | ConfigError::Unreadable { .. } | ConfigError::Encoding { .. }
        )
    }

    /// Exit status for a command that stopped on this error
    ///
    /// Load failures map to `LoadFailure`; anything else is an error of
    /// another kind and maps to `Multiple`, never to a single-class code.
    pub fn exit_status(&self) -> ExitStatus {
        if self.is_load_failure() {
            ExitStatus::LoadFailure
        } else {
            ExitStatus::Multiple
        }
    }

    /// Critical finding describing a load failure
    pub fn to_finding(&self) -> Finding {
        let (kind, path) = match self {
            ConfigError::NotFound(path) => (FindingKind::FileError, Some(path)),
            ConfigError::Unreadable { path, .. } => (FindingKind::ReadError, Some(path)),
            ConfigError::Encoding { path, .. } => (FindingKind::EncodingError, Some(path)),
            _ => (FindingKind::ReadError, None),
        };

        let details = path
            .map(|p| FindingDetails::File {
                path: p.display().to_string(),
            })
            .unwrap_or_default();

        Finding::new(kind, Severity::Critical, 0, self.to_string(), details)
    }
}
