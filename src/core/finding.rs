//! Structured diagnostics produced by the checks
//!
//! Every finding carries a kind, a severity, a message, a 1-based line
//! number (0 for file-scoped findings) and structured details for
//! machine-readable reports.

use serde::Serialize;
use std::fmt;

/// Severity of a finding
///
/// Ordered so that `Critical > Error > Warning > Info`. Only `Error` and
/// `Critical` fail a validation run.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only
    Info = 0,
    /// Worth fixing, never fails the run
    Warning = 1,
    /// Breaks real input at typing time
    Error = 2,
    /// File could not be loaded; nothing else was checked
    Critical = 3,
}

impl Severity {
    pub fn is_failure(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// What a finding is about
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Input file does not exist
    FileError,
    /// Input file exists but could not be read
    ReadError,
    /// Input file is not valid UTF-8
    EncodingError,
    /// Line starts a sequence but is malformed
    SyntaxError,
    /// Line matches no recognised form
    UnrecognizedLine,
    /// Same key-path defined more than once with the same output
    DuplicateHarmless,
    /// Same key-path defined more than once with different outputs
    DuplicateConflict,
    /// A complete sequence makes a longer one unreachable
    PrefixShadowing,
    /// Declared codepoint differs from the output character
    CodepointMismatch,
    /// Codepoint declared on a multi-character output
    MultiCharWithCodepoint,
    /// Key token with whitespace or an unusual length
    SuspiciousKey,
    /// Sequence without a comment
    MissingComment,
    /// Tagged comment with no description
    EmptyDescription,
    /// Comment without a type tag
    UntaggedComment,
    /// File-wide tagging summary
    TaggingProgress,
}

impl FindingKind {
    /// Stable snake_case name, matching the JSON form
    pub fn as_str(self) -> &'static str {
        match self {
            FindingKind::FileError => "file_error",
            FindingKind::ReadError => "read_error",
            FindingKind::EncodingError => "encoding_error",
            FindingKind::SyntaxError => "syntax_error",
            FindingKind::UnrecognizedLine => "unrecognized_line",
            FindingKind::DuplicateHarmless => "duplicate_harmless",
            FindingKind::DuplicateConflict => "duplicate_conflict",
            FindingKind::PrefixShadowing => "prefix_shadowing",
            FindingKind::CodepointMismatch => "codepoint_mismatch",
            FindingKind::MultiCharWithCodepoint => "multi_char_with_codepoint",
            FindingKind::SuspiciousKey => "suspicious_key",
            FindingKind::MissingComment => "missing_comment",
            FindingKind::EmptyDescription => "empty_description",
            FindingKind::UntaggedComment => "untagged_comment",
            FindingKind::TaggingProgress => "tagging_progress",
        }
    }

    /// True for the load failures that abort a run
    pub fn is_load_failure(self) -> bool {
        matches!(
            self,
            FindingKind::FileError | FindingKind::ReadError | FindingKind::EncodingError
        )
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One occurrence inside a duplicate group
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Occurrence {
    pub line: usize,
    pub symbol: String,
}

/// Kind-specific structured payload
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FindingDetails {
    #[default]
    None,
    /// Offending source text (truncated)
    Line { line: String },
    /// Sequence the finding refers to
    Sequence { sequence: String },
    /// Every occurrence of a duplicated key-path
    Occurrences {
        sequence: String,
        occurrences: Vec<Occurrence>,
    },
    /// Both sides of a shadowing pair
    Shadowing {
        shadowing_sequence: String,
        shadowing_symbol: String,
        shadowing_line: usize,
        shadowed_sequence: String,
        shadowed_symbol: String,
        shadowed_line: usize,
    },
    /// Tag on a comment with no description
    Tag { tag: String },
    /// Untagged comment text (truncated)
    Comment { comment: String },
    /// Tagged/untagged totals
    Tagging { tagged: usize, untagged: usize },
    /// Path of a file that could not be loaded
    File { path: String },
}

/// A single structured diagnostic
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub message: String,
    #[serde(rename = "line")]
    pub line_number: usize,
    pub severity: Severity,
    pub details: FindingDetails,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        severity: Severity,
        line_number: usize,
        message: impl Into<String>,
        details: FindingDetails,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line_number,
            severity,
            details,
        }
    }

    pub fn error(kind: FindingKind, line_number: usize, message: impl Into<String>, details: FindingDetails) -> Self {
        Self::new(kind, Severity::Error, line_number, message, details)
    }

    pub fn warning(kind: FindingKind, line_number: usize, message: impl Into<String>, details: FindingDetails) -> Self {
        Self::new(kind, Severity::Warning, line_number, message, details)
    }

    pub fn info(kind: FindingKind, line_number: usize, message: impl Into<String>, details: FindingDetails) -> Self {
        Self::new(kind, Severity::Info, line_number, message, details)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_number > 0 {
            write!(f, "Line {}: {}", self.line_number, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Truncates display text to `max` characters on a char boundary
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
