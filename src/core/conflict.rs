//! Sequence conflict detection
//!
//! This module runs independent passes over a `SequenceTable` and returns
//! every problem found, in a stable order:
//! 1. Syntax: lines the classifier rejected
//! 2. Per-sequence checks: codepoints and key tokens
//! 3. Duplicates: one key-path defined more than once
//! 4. Prefix shadowing: a complete sequence hiding a longer one
//! 5. Comment format (optional)
//!
//! # Shadowing
//! The input method commits to a sequence the moment its last key is
//! typed. If `m 1` is complete, `m 1 2` can never be reached. Prefix
//! comparison is token-exact. The scan algorithm is swappable through
//! `ShadowScan`:
//! - `TrieScan`: prefix tree keyed by token, O(n · depth) (default)
//! - `PairwiseScan`: all ordered pairs, O(n²)
//!
//! Both report every shadowing pair, not merely that shadowing exists.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::core::finding::{truncate, Finding, FindingDetails, FindingKind, Occurrence};
use crate::core::table::SequenceTable;
use crate::core::tokenizer::RejectReason;
use crate::core::types::{KeyPath, Sequence};
use crate::core::validator::{self, MAX_KEY_LENGTH};

/// Tunable thresholds for the detector and statistics
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
    /// Key tokens longer than this are flagged
    pub max_key_length: usize,
    /// Report untagged comments and the tagging summary
    pub verbose: bool,
    /// Run the comment-format pass
    pub check_comments: bool,
    /// Two-key prefixes with more members than this are flagged in statistics
    pub fan_out_threshold: usize,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            max_key_length: MAX_KEY_LENGTH,
            verbose: false,
            check_comments: true,
            fan_out_threshold: 5,
        }
    }
}

/// Strategy for finding shadowing pairs among distinct key-paths
///
/// Returns `(short, long)` index pairs into `paths` for every pair where
/// `paths[short]` is a strict token-prefix of `paths[long]`. Callers pass
/// distinct key-paths.
pub trait ShadowScan {
    fn scan(&self, paths: &[&KeyPath]) -> Vec<(usize, usize)>;
}

/// Compares every ordered pair of key-paths
#[derive(Clone, Copy, Debug, Default)]
pub struct PairwiseScan;

impl ShadowScan for PairwiseScan {
    fn scan(&self, paths: &[&KeyPath]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();

        for (short, short_path) in paths.iter().enumerate() {
            for (long, long_path) in paths.iter().enumerate() {
                if short != long && short_path.is_strict_prefix_of(long_path) {
                    pairs.push((short, long));
                }
            }
        }

        pairs
    }
}

/// Builds a prefix tree over key tokens
///
/// Each key-path marks a terminal node; every terminal below another
/// terminal is shadowed by each terminal above it on the same branch.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrieScan;

#[derive(Default)]
struct TrieNode<'a> {
    children: BTreeMap<&'a str, usize>,
    terminal: Option<usize>,
}

impl ShadowScan for TrieScan {
    fn scan(&self, paths: &[&KeyPath]) -> Vec<(usize, usize)> {
        let mut nodes: Vec<TrieNode<'_>> = vec![TrieNode::default()];

        for (index, path) in paths.iter().enumerate() {
            let mut current = 0;
            for token in path.tokens() {
                let existing = nodes[current].children.get(token.as_str()).copied();
                current = match existing {
                    Some(child) => child,
                    None => {
                        let child = nodes.len();
                        nodes.push(TrieNode::default());
                        nodes[current].children.insert(token.as_str(), child);
                        child
                    }
                };
            }
            nodes[current].terminal = Some(index);
        }

        let mut pairs = Vec::new();
        let mut ancestors = Vec::new();
        collect_shadowed(&nodes, 0, &mut ancestors, &mut pairs);
        pairs
    }
}

fn collect_shadowed(
    nodes: &[TrieNode<'_>],
    node: usize,
    ancestors: &mut Vec<usize>,
    pairs: &mut Vec<(usize, usize)>,
) {
    let terminal = nodes[node].terminal;

    if let Some(long) = terminal {
        pairs.extend(ancestors.iter().map(|&short| (short, long)));
        ancestors.push(long);
    }

    for &child in nodes[node].children.values() {
        collect_shadowed(nodes, child, ancestors, pairs);
    }

    if terminal.is_some() {
        ancestors.pop();
    }
}

/// Runs every check over a sequence table
///
/// The detector never stops on a finding; it always returns the full set.
pub struct ConflictDetector {
    settings: DetectorSettings,
    scan: Box<dyn ShadowScan>,
}

impl ConflictDetector {
    /// Creates a detector with default settings and the trie scan
    pub fn new() -> Self {
        Self::with_settings(DetectorSettings::default())
    }

    pub fn with_settings(settings: DetectorSettings) -> Self {
        Self {
            settings,
            scan: Box::new(TrieScan),
        }
    }

    /// Replaces the shadowing scan algorithm
    pub fn with_scan(mut self, scan: Box<dyn ShadowScan>) -> Self {
        self.scan = scan;
        self
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Runs all passes and returns every finding
    pub fn detect(&self, table: &SequenceTable) -> Vec<Finding> {
        let mut findings = self.find_syntax_errors(table);
        findings.extend(self.find_sequence_issues(table));
        findings.extend(self.find_duplicates(table));
        findings.extend(self.find_shadowing(table));

        if self.settings.check_comments {
            findings.extend(self.find_comment_issues(table));
        }

        info!(
            sequences = table.len(),
            findings = findings.len(),
            failures = findings.iter().filter(|f| f.severity.is_failure()).count(),
            "conflict detection finished"
        );

        findings
    }

    /// Rejected lines: malformed sequences are errors, foreign lines warnings
    pub fn find_syntax_errors(&self, table: &SequenceTable) -> Vec<Finding> {
        let findings: Vec<Finding> = table
            .rejected_lines()
            .iter()
            .map(|rejected| {
                let details = FindingDetails::Line {
                    line: truncate(&rejected.text, 60),
                };
                match &rejected.reason {
                    RejectReason::MalformedSequence(reason) => Finding::error(
                        FindingKind::SyntaxError,
                        rejected.line_number,
                        reason.clone(),
                        details,
                    ),
                    RejectReason::Unrecognized => Finding::warning(
                        FindingKind::UnrecognizedLine,
                        rejected.line_number,
                        "Unrecognized line",
                        details,
                    ),
                }
            })
            .collect();

        debug!(count = findings.len(), "syntax pass");
        findings
    }

    /// Codepoint and key-token checks on every occurrence
    pub fn find_sequence_issues(&self, table: &SequenceTable) -> Vec<Finding> {
        let findings: Vec<Finding> = table
            .all()
            .iter()
            .flat_map(|sequence| {
                validator::validate_sequence(sequence, self.settings.max_key_length)
                    .into_iter()
                    .map(move |issue| issue.into_finding(sequence))
            })
            .collect();

        debug!(count = findings.len(), "sequence pass");
        findings
    }

    /// Groups occurrences by key-path
    ///
    /// Same output everywhere → `duplicate_harmless` warning.
    /// Differing outputs → `duplicate_conflict` error naming every line.
    pub fn find_duplicates(&self, table: &SequenceTable) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (_, occurrences) in table.key_path_groups() {
            if occurrences.len() < 2 {
                continue;
            }

            let first = occurrences[0];
            let sequence = first.sequence_string();
            let listed: Vec<Occurrence> = occurrences
                .iter()
                .map(|seq| Occurrence {
                    line: seq.line_number,
                    symbol: seq.symbol.clone(),
                })
                .collect();

            let all_same = occurrences.iter().all(|seq| seq.symbol == first.symbol);

            if all_same {
                findings.push(Finding::warning(
                    FindingKind::DuplicateHarmless,
                    first.line_number,
                    format!("Duplicate sequence (same symbol): {} → {}", sequence, first.symbol),
                    FindingDetails::Occurrences {
                        sequence,
                        occurrences: listed,
                    },
                ));
            } else {
                let lines = listed
                    .iter()
                    .map(|occ| format!("line {} → {}", occ.line, occ.symbol))
                    .collect::<Vec<_>>()
                    .join(", ");
                findings.push(Finding::error(
                    FindingKind::DuplicateConflict,
                    first.line_number,
                    format!("Duplicate sequence with different symbols: {} ({})", sequence, lines),
                    FindingDetails::Occurrences {
                        sequence,
                        occurrences: listed,
                    },
                ));
            }
        }

        debug!(count = findings.len(), "duplicate pass");
        findings
    }

    /// Reports every `(short, long)` pair where `short` makes `long` unreachable
    ///
    /// Compares distinct key-paths using their first definitions. Ordered
    /// by the shadowing line, then the shadowed line.
    pub fn find_shadowing(&self, table: &SequenceTable) -> Vec<Finding> {
        let definitions = table.first_definitions();
        let paths: Vec<&KeyPath> = definitions.iter().map(|(path, _)| *path).collect();

        let mut pairs: Vec<(&Sequence, &Sequence)> = self
            .scan
            .scan(&paths)
            .into_iter()
            .map(|(short, long)| (definitions[short].1, definitions[long].1))
            .collect();
        pairs.sort_by_key(|(short, long)| (short.line_number, long.line_number));

        let findings: Vec<Finding> = pairs
            .into_iter()
            .map(|(short, long)| {
                let shadowing = short.sequence_string();
                let shadowed = long.sequence_string();
                Finding::error(
                    FindingKind::PrefixShadowing,
                    short.line_number,
                    format!(
                        "{} → {} shadows {} → {} (line {})",
                        shadowing, short.symbol, shadowed, long.symbol, long.line_number
                    ),
                    FindingDetails::Shadowing {
                        shadowing_sequence: shadowing,
                        shadowing_symbol: short.symbol.clone(),
                        shadowing_line: short.line_number,
                        shadowed_sequence: shadowed,
                        shadowed_symbol: long.symbol.clone(),
                        shadowed_line: long.line_number,
                    },
                )
            })
            .collect();

        debug!(count = findings.len(), "shadowing pass");
        findings
    }

    /// Comment format checks plus, in verbose mode, a tagging summary
    pub fn find_comment_issues(&self, table: &SequenceTable) -> Vec<Finding> {
        let mut findings: Vec<Finding> = table
            .all()
            .iter()
            .filter_map(|sequence| {
                validator::check_comment(sequence, self.settings.verbose)
                    .map(|issue| issue.into_finding(sequence))
            })
            .collect();

        let tagged = table.all().iter().filter(|s| s.tag.is_some()).count();
        let untagged = table
            .all()
            .iter()
            .filter(|s| s.tag.is_none() && s.comment.is_some())
            .count();

        if self.settings.verbose && tagged + untagged > 0 {
            let total = tagged + untagged;
            let percent = tagged as f64 / total as f64 * 100.0;
            findings.push(Finding::info(
                FindingKind::TaggingProgress,
                0,
                format!("Comment tagging: {}/{} ({:.1}%) tagged", tagged, total, percent),
                FindingDetails::Tagging { tagged, untagged },
            ));
        }

        debug!(count = findings.len(), "comment pass");
        findings
    }

    /// True if the key-path is defined more than once with differing outputs
    pub fn has_conflict(&self, table: &SequenceTable, key_path: &KeyPath) -> bool {
        let occurrences = table.by_key_path(key_path);
        occurrences
            .first()
            .map(|first| occurrences.iter().any(|seq| seq.symbol != first.symbol))
            .unwrap_or(false)
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs every check with default settings
pub fn detect_conflicts(table: &SequenceTable) -> Vec<Finding> {
    ConflictDetector::new().detect(table)
}
