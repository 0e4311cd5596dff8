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

//! src/core/tokenizer.rs
//!
//! Line classifier for compose files
//!
//! Every input line is classified exactly once, in this priority order:
//! 1. Blank or `include` directive → skipped
//! 2. Decorative separator (`#####…`) → skipped
//! 3. Section header (`# GREEK LETTERS - lowercase`) → new category
//! 4. Subsection header (`## LOWERCASE`) → new subcategory
//! 5. Plain comment (any other `#` line) → skipped
//! 6. Sequence definition → `Sequence`
//! 7. Anything else → `Unrecognized`, never dropped
//!
//! Header tracking is an explicit fold: `classify` takes the previous
//! `HeaderState` by value and returns the next one alongside the
//! classification, so single lines can be tested without a whole file.

use regex::Regex;
use serde::Serialize;

use crate::core::parser::{build_sequence, diagnose_malformed, parse_sequence_line};
use crate::core::types::{Sequence, MULTI_KEY, UNCATEGORIZED};

/// Category context carried from one line to the next
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderState {
    pub category: String,
    pub subcategory: Option<String>,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            category: UNCATEGORIZED.to_string(),
            subcategory: None,
        }
    }
}

/// Why a line could not be used
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Starts a multi-key sequence but does not match the grammar
    MalformedSequence(String),
    /// Matches no known line form at all
    Unrecognized,
}

/// A line the classifier could not turn into anything useful
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RejectedLine {
    pub line_number: usize,
    pub text: String,
    pub reason: RejectReason,
}

/// Result of classifying one line
#[derive(Clone, Debug, PartialEq)]
pub enum LineClass {
    /// Blank, include directive or separator
    Skip,
    /// Comment that is not a header
    Comment,
    /// Section header title
    Category(String),
    /// Subsection header title
    Subcategory(String),
    /// Parsed sequence with its category context attached
    Sequence(Sequence),
    /// Line kept for diagnostics
    Unrecognized(RejectedLine),
}

/// Compiled header grammars
///
/// `section_with_description` is tried before `section_title` so a
/// trailing dash-description is split off greedily, the same way for
/// every title.
pub struct LineClassifier {
    separator: Regex,
    section_with_description: Regex,
    section_title: Regex,
    subsection: Regex,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self {
            separator: Regex::new(r"^#{5,}\s*$").expect("separator pattern should be valid regex"),
            section_with_description: Regex::new(
                r"^#\s+([A-Z][A-Z\s/&\-]+(?:\([^)]+\))?)\s*(?:—|–|-)\s*(.*)$",
            )
            .expect("section header pattern should be valid regex"),
            section_title: Regex::new(r"^#\s+([A-Z][A-Z\s/&\-]+(?:\([^)]+\))?)\s*$")
                .expect("bare section header pattern should be valid regex"),
            subsection: Regex::new(r"^##\s+([A-Z][A-Z\s/&\-]+)$")
                .expect("subsection header pattern should be valid regex"),
        }
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one line and returns the updated header state
    ///
    /// Never fails: lines that match nothing come back as
    /// `LineClass::Unrecognized` carrying their text and line number.
    pub fn classify(
        &self,
        state: HeaderState,
        line_number: usize,
        line: &str,
    ) -> (HeaderState, LineClass) {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("include") {
            return (state, LineClass::Skip);
        }

        if self.separator.is_match(trimmed) {
            return (state, LineClass::Skip);
        }

        if let Some(title) = self.section_header(trimmed) {
            let next = HeaderState {
                category: title.clone(),
                subcategory: None,
            };
            return (next, LineClass::Category(title));
        }

        if let Some(caps) = self.subsection.captures(trimmed) {
            let title = caps[1].trim().to_string();
            let next = HeaderState {
                category: state.category,
                subcategory: Some(title.clone()),
            };
            return (next, LineClass::Subcategory(title));
        }

        if trimmed.starts_with('#') {
            return (state, LineClass::Comment);
        }

        match parse_sequence_line(trimmed) {
            Ok((_, parsed)) => {
                let sequence = build_sequence(parsed, &state, line_number);
                (state, LineClass::Sequence(sequence))
            }
            Err(_) => {
                let reason = if trimmed.starts_with(MULTI_KEY) {
                    RejectReason::MalformedSequence(diagnose_malformed(trimmed).to_string())
                } else {
                    RejectReason::Unrecognized
                };
                let rejected = RejectedLine {
                    line_number,
                    text: trimmed.to_string(),
                    reason,
                };
                (state, LineClass::Unrecognized(rejected))
            }
        }
    }

    fn section_header(&self, line: &str) -> Option<String> {
        self.section_with_description
            .captures(line)
            .or_else(|| self.section_title.captures(line))
            .map(|caps| caps[1].trim().to_string())
    }
}
