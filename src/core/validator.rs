// Copyright 2025 bakri (tidynest@proton.me)
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

//! Per-sequence consistency checks
//!
//! This module checks each parsed sequence on its own:
//! - Declared codepoints against the actual output character
//! - Key tokens that contain whitespace or are unusually long
//! - Comment format (missing comment, tag without description, untagged)
//!
//! None of these are fatal. Declared codepoints are documentation, not
//! authoritative, so a mismatch is a warning.

use thiserror::Error;

use crate::core::finding::{Finding, FindingDetails, FindingKind, Severity};
use crate::core::types::Sequence;

/// Key names longer than this are almost always copy-paste errors
pub const MAX_KEY_LENGTH: usize = 20;

/// Problems found on a single sequence
#[derive(Debug, Error, PartialEq)]
pub enum SequenceIssue {
    /// Declared codepoint differs from the output character
    #[error("Symbol \"{symbol}\" (U+{actual}) does not match declared codepoint U+{declared}")]
    CodepointMismatch {
        symbol: String,
        actual: String,
        declared: String,
    },

    /// Codepoint annotation on a multi-character output
    #[error("Multi-character output \"{symbol}\" has codepoint U+{declared} (unusual)")]
    MultiCharWithCodepoint { symbol: String, declared: String },

    /// Key token containing whitespace
    #[error("Key contains space: \"<{0}>\"")]
    KeyContainsSpace(String),

    /// Key token longer than the configured limit
    #[error("Unusually long key name: \"<{0}>\"")]
    KeyTooLong(String),

    /// No comment at all
    #[error("Sequence has no comment")]
    MissingComment,

    /// Tag present, description empty
    #[error("Comment has tag [{0}] but no description")]
    EmptyDescription(String),

    /// Comment present, no tag
    #[error("Comment not tagged with [ICONIC] or [MNEMONIC]")]
    UntaggedComment(String),
}

impl SequenceIssue {
    pub fn kind(&self) -> FindingKind {
        match self {
            SequenceIssue::CodepointMismatch { .. } => FindingKind::CodepointMismatch,
            SequenceIssue::MultiCharWithCodepoint { .. } => FindingKind::MultiCharWithCodepoint,
            SequenceIssue::KeyContainsSpace(_) | SequenceIssue::KeyTooLong(_) => {
                FindingKind::SuspiciousKey
            }
            SequenceIssue::MissingComment => FindingKind::MissingComment,
            SequenceIssue::EmptyDescription(_) => FindingKind::EmptyDescription,
            SequenceIssue::UntaggedComment(_) => FindingKind::UntaggedComment,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            SequenceIssue::UntaggedComment(_) => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Converts the issue into a finding located at the sequence's line
    pub fn into_finding(self, sequence: &Sequence) -> Finding {
        let details = match &self {
            SequenceIssue::EmptyDescription(tag) => FindingDetails::Tag { tag: tag.clone() },
            SequenceIssue::UntaggedComment(comment) => FindingDetails::Comment {
                comment: crate::core::finding::truncate(comment, 40),
            },
            SequenceIssue::MissingComment => FindingDetails::Line {
                line: crate::core::finding::truncate(&sequence.to_string(), 60),
            },
            _ => FindingDetails::Sequence {
                sequence: sequence.sequence_string(),
            },
        };

        Finding::new(
            self.kind(),
            self.severity(),
            sequence.line_number,
            self.to_string(),
            details,
        )
    }
}

/// Cross-checks a declared codepoint against the output
///
/// Single-character outputs must declare their own scalar value as
/// uppercase hex, at least four digits wide. Case is ignored (`U00e9`
/// matches `é`) but padding is not (`U0000E9` does not). Multi-character
/// outputs should not declare a codepoint at all.
pub fn check_codepoint(sequence: &Sequence) -> Result<(), SequenceIssue> {
    let Some(declared) = &sequence.codepoint else {
        return Ok(());
    };

    let mut chars = sequence.symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => {
            let actual = format!("{:04X}", ch as u32);
            if declared.to_uppercase() == actual {
                Ok(())
            } else {
                Err(SequenceIssue::CodepointMismatch {
                    symbol: sequence.symbol.clone(),
                    actual,
                    declared: declared.clone(),
                })
            }
        }
        (Some(_), Some(_)) => Err(SequenceIssue::MultiCharWithCodepoint {
            symbol: sequence.symbol.clone(),
            declared: declared.clone(),
        }),
        (None, _) => Ok(()),
    }
}

/// Flags suspicious key tokens
///
/// A token can trip both checks, in which case both issues are returned.
pub fn check_key_token(key: &str, max_length: usize) -> Vec<SequenceIssue> {
    let mut issues = Vec::new();

    if key.chars().any(char::is_whitespace) {
        issues.push(SequenceIssue::KeyContainsSpace(key.to_string()));
    }

    if key.chars().count() > max_length {
        issues.push(SequenceIssue::KeyTooLong(key.to_string()));
    }

    issues
}

/// Checks the comment format
///
/// Untagged comments are only reported when `verbose` is set.
pub fn check_comment(sequence: &Sequence, verbose: bool) -> Option<SequenceIssue> {
    match (&sequence.tag, &sequence.comment) {
        (None, None) => Some(SequenceIssue::MissingComment),
        (Some(tag), None) => Some(SequenceIssue::EmptyDescription(tag.to_string())),
        (None, Some(comment)) if verbose => Some(SequenceIssue::UntaggedComment(comment.clone())),
        _ => None,
    }
}

/// Runs the codepoint and key-token checks on one sequence
pub fn validate_sequence(sequence: &Sequence, max_key_length: usize) -> Vec<SequenceIssue> {
    let mut issues = Vec::new();

    if let Err(issue) = check_codepoint(sequence) {
        issues.push(issue);
    }

    for key in &sequence.keys {
        issues.extend(check_key_token(key, max_key_length));
    }

    issues
}
