//! File-level validation run.
//!
//! This module ties the pieces together for one run:
//! - **Load** (`config/mod.rs`): whole-file read, critical errors short-circuit
//! - **Detect** (`core/conflict.rs`): every finding over the parsed table
//! - **Summarise** (`core/stats.rs`): statistics for the report
//!
//! The result is a `ValidationReport` carrying the verdict and the exit
//! code CI pipelines branch on.
//!
//! # Example
//! ```
//! use compose_lint::config::validator::ComposeValidator;
//!
//! let validator = ComposeValidator::new();
//! let report = validator.validate_content("<Multi_key> <g> <a> : \"α\" U03B1 # [MNEMONIC] alpha\n");
//!
//! assert!(report.passed());
//! assert_eq!(report.exit_code(), 0);
//! ```

use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::read_compose_file;
use crate::core::conflict::{ConflictDetector, DetectorSettings};
use crate::core::finding::{Finding, FindingKind, Severity};
use crate::core::parser::parse_content;
use crate::core::stats::{classify_with, Statistics};
use crate::core::table::SequenceTable;

/// Process exit status of a validation run
///
/// Each failure class gets its own code so pipelines can branch without
/// parsing text output.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitStatus {
    /// No error or critical findings
    Passed = 0,
    /// Only prefix shadowing
    Shadowing = 1,
    /// Only duplicate conflicts
    DuplicateConflict = 2,
    /// Only syntax errors
    Syntax = 3,
    /// More than one failure class
    Multiple = 4,
    /// The file could not be loaded
    LoadFailure = 5,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Everything a validation run produced
///
/// A run that failed to load holds exactly one critical finding and no
/// statistics.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    /// File that was checked (absent for in-memory content)
    pub file: Option<PathBuf>,
    /// All findings, in detector order
    pub findings: Vec<Finding>,
    /// Statistics over the parsed table
    pub statistics: Option<Statistics>,
}

impl ValidationReport {
    /// Report for a file that could not be loaded
    pub fn load_failure(file: PathBuf, finding: Finding) -> Self {
        Self {
            file: Some(file),
            findings: vec![finding],
            statistics: None,
        }
    }

    /// True iff there are no error or critical findings
    ///
    /// Warnings and info never change the verdict.
    pub fn passed(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_failure())
    }

    /// Error and critical findings
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.severity.is_failure()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn info_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count()
    }

    /// Findings of a single kind, in order
    pub fn findings_of(&self, kind: FindingKind) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.kind == kind).collect()
    }

    /// Classifies the failing findings into an exit status
    ///
    /// Load failures win outright. Otherwise each of shadowing, duplicate
    /// conflicts and syntax errors is a class; one class maps to its own
    /// code, several (or an error of any other kind) map to `Multiple`.
    pub fn exit_status(&self) -> ExitStatus {
        if self.findings.iter().any(|f| f.severity == Severity::Critical) {
            return ExitStatus::LoadFailure;
        }

        let failing: Vec<FindingKind> = self
            .findings
            .iter()
            .filter(|f| f.severity.is_failure())
            .map(|f| f.kind)
            .collect();

        if failing.is_empty() {
            return ExitStatus::Passed;
        }

        let shadowing = failing.contains(&FindingKind::PrefixShadowing);
        let conflicts = failing.contains(&FindingKind::DuplicateConflict);
        let syntax = failing.contains(&FindingKind::SyntaxError);
        let other = failing.iter().any(|kind| {
            !matches!(
                kind,
                FindingKind::PrefixShadowing | FindingKind::DuplicateConflict | FindingKind::SyntaxError
            )
        });

        let classes = [shadowing, conflicts, syntax].iter().filter(|&&c| c).count();

        match (classes, other) {
            (1, false) if shadowing => ExitStatus::Shadowing,
            (1, false) if conflicts => ExitStatus::DuplicateConflict,
            (1, false) => ExitStatus::Syntax,
            _ => ExitStatus::Multiple,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_status().code()
    }

    /// Machine-readable form for CI
    ///
    /// Errors and critical findings go under `errors`, warnings under
    /// `warnings`, info findings under `info`.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "file": self.file.as_ref().map(|p| p.display().to_string()),
            "statistics": self.statistics,
            "errors": self.with_severity(Severity::is_failure),
            "warnings": self.with_severity(|s| s == Severity::Warning),
            "info": self.with_severity(|s| s == Severity::Info),
            "passed": self.passed(),
        })
    }

    fn with_severity(&self, wanted: impl Fn(Severity) -> bool) -> Vec<&Finding> {
        self.findings.iter().filter(|f| wanted(f.severity)).collect()
    }
}

/// Runs load, detection and statistics for one compose file
#[derive(Default)]
pub struct ComposeValidator {
    detector: ConflictDetector,
}

impl ComposeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DetectorSettings) -> Self {
        Self {
            detector: ConflictDetector::with_settings(settings),
        }
    }

    /// Validates a file on disk
    ///
    /// A missing, unreadable or non-UTF-8 file yields a report with a
    /// single critical finding; nothing else is computed.
    pub fn validate_file(&self, path: &Path) -> ValidationReport {
        let content = match read_compose_file(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "compose file could not be loaded");
                return ValidationReport::load_failure(path.to_path_buf(), e.to_finding());
            }
        };

        let mut report = self.validate_content(&content);
        report.file = Some(path.to_path_buf());
        report
    }

    /// Validates in-memory content
    pub fn validate_content(&self, content: &str) -> ValidationReport {
        self.validate_table(&parse_content(content))
    }

    /// Validates an already parsed table
    pub fn validate_table(&self, table: &SequenceTable) -> ValidationReport {
        let findings = self.detector.detect(table);
        let statistics = classify_with(table, self.detector.settings());

        let report = ValidationReport {
            file: None,
            findings,
            statistics: Some(statistics),
        };

        info!(
            passed = report.passed(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validation finished"
        );

        report
    }
}
