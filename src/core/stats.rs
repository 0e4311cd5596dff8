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

//! Access-mode classification and aggregate statistics
//!
//! Pure reads of a `SequenceTable`. Statistics are computed over the first
//! definition of each distinct key-path, so redundant duplicates do not
//! inflate the numbers.
//!
//! # Classification Order
//! 1. **Explicit tag** - `[ICONIC]` → ASCII shortcut, `[MNEMONIC]` → mnemonic
//! 2. **Mnemonic prefix** - first key is a category prefix letter
//! 3. **ASCII shortcut** - at most 5 keys, all punctuation or digits
//! 4. **Variant** - everything else
//!
//! Steps 2-4 look only at the key tokens; authorial intent (step 1) and
//! inferred intent are kept apart so the heuristic can also suggest tags.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::conflict::DetectorSettings;
use crate::core::table::SequenceTable;
use crate::core::types::{AccessMode, Sequence, TypeTag};

/// First keys that open a mnemonic family (h: Hebrew, g: Greek, k: keyboard, …)
pub const MNEMONIC_PREFIXES: &[&str] = &["h", "g", "k", "b", "p", "u", "c", "i"];

/// Key names that count as ASCII-art material
pub const SHORTCUT_KEYS: &[&str] = &[
    "minus", "greater", "less", "equal", "exclam", "asciitilde",
    "asciicircum", "bar", "plus", "asterisk", "slash", "colon",
    "period", "v", "question", "quotedbl", "apostrophe", "comma",
    "ampersand", "at", "numbersign", "dollar", "percent",
    "parenleft", "parenright", "underscore", "grave", "d",
];

/// Key names that need Shift on a US layout
pub const SHIFTED_KEYS: &[&str] = &[
    "asciicircum", "quotedbl", "exclam", "asterisk", "parenleft",
    "parenright", "plus", "colon", "less", "greater", "underscore",
];

/// Longest sequence still considered an ASCII shortcut
pub const MAX_SHORTCUT_LENGTH: usize = 5;

/// Sequences with at least this many keys are reported as long
pub const LONG_SEQUENCE_LENGTH: usize = 6;

const TOP_LIMIT: usize = 10;

/// Classifies a sequence, honouring an explicit tag first
pub fn classify_access(sequence: &Sequence) -> AccessMode {
    match sequence.tag {
        Some(TypeTag::Iconic) => AccessMode::AsciiShortcut,
        Some(TypeTag::Mnemonic) => AccessMode::Mnemonic,
        None => infer_access(&sequence.keys),
    }
}

/// Heuristic classification from key tokens alone
pub fn infer_access(keys: &[String]) -> AccessMode {
    let Some(first) = keys.first() else {
        return AccessMode::Variant;
    };

    if MNEMONIC_PREFIXES.contains(&first.as_str()) {
        return AccessMode::Mnemonic;
    }

    let is_shortcut_key = |key: &String| {
        SHORTCUT_KEYS.contains(&key.as_str())
            || (key.len() == 1 && key.chars().all(|c| c.is_ascii_digit()))
    };

    if keys.len() <= MAX_SHORTCUT_LENGTH && keys.iter().all(is_shortcut_key) {
        AccessMode::AsciiShortcut
    } else {
        AccessMode::Variant
    }
}

/// Tag the heuristic would assign, ignoring any existing tag
///
/// Variants get no suggestion.
pub fn suggest_tag(sequence: &Sequence) -> Option<TypeTag> {
    match infer_access(&sequence.keys) {
        AccessMode::AsciiShortcut => Some(TypeTag::Iconic),
        AccessMode::Mnemonic => Some(TypeTag::Mnemonic),
        AccessMode::Variant => None,
    }
}

/// Sequence-length distribution
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
    /// Key count → number of sequences
    pub histogram: BTreeMap<usize, usize>,
}

/// Number of sequences per access mode
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AccessCounts {
    pub ascii_shortcut: usize,
    pub mnemonic: usize,
    pub variant: usize,
}

/// A symbol and the first sequence producing it
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SymbolCoverage {
    pub symbol: String,
    pub keys: String,
    pub comment: Option<String>,
}

/// Whether each symbol is reachable both as a shortcut and as a mnemonic
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DualAccess {
    pub both: Vec<SymbolCoverage>,
    pub ascii_only: Vec<SymbolCoverage>,
    pub mnemonic_only: Vec<SymbolCoverage>,
    pub neither: Vec<SymbolCoverage>,
    /// Share of unique symbols in `both`, 0–100
    pub coverage_percent: f64,
}

/// Number of sequences sharing a key prefix
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PrefixCount {
    pub prefix: String,
    pub count: usize,
}

/// Shortest way to type a symbol
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SymbolAccess {
    pub symbol: String,
    pub shortest_length: usize,
    pub shortest_keys: String,
    pub alternatives: usize,
}

/// Compact reference to a sequence in a report
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SequenceRef {
    pub keys: String,
    pub length: usize,
    pub symbol: String,
    pub line: usize,
    pub comment: Option<String>,
}

impl SequenceRef {
    fn from_sequence(sequence: &Sequence) -> Self {
        Self {
            keys: sequence.key_string(),
            length: sequence.keys.len(),
            symbol: sequence.symbol.clone(),
            line: sequence.line_number,
            comment: sequence.comment.clone(),
        }
    }
}

/// Sequence needing many shifted keys
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ShiftBurden {
    pub sequence: SequenceRef,
    pub shifted_keys: usize,
}

/// Aggregate metrics over a sequence table
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Statistics {
    /// Every parsed occurrence
    pub total_sequences: usize,
    /// Distinct key-paths
    pub distinct_sequences: usize,
    pub unique_symbols: usize,
    pub total_lines: usize,
    pub length: LengthStats,
    pub access_modes: AccessCounts,
    pub dual_access: DualAccess,
    /// Distinct first keys
    pub unique_prefixes: usize,
    /// Most used first keys
    pub top_prefixes: Vec<PrefixCount>,
    /// Two-key prefixes with more members than the fan-out threshold
    pub confusing_prefixes: Vec<PrefixCount>,
    /// Per symbol, in order of first appearance
    pub shortest_paths: Vec<SymbolAccess>,
    /// Sequences of 6+ keys, longest first
    pub long_sequences: Vec<SequenceRef>,
    /// 3+ keys with two identical keys in a row
    pub typo_prone: Vec<SequenceRef>,
    /// 3+ shifted keys within at most 4 keys
    pub heavy_shift: Vec<ShiftBurden>,
    /// Mnemonic prefix → categories using it
    pub prefix_categories: BTreeMap<String, BTreeSet<String>>,
}

/// Computes statistics with default settings
pub fn classify(table: &SequenceTable) -> Statistics {
    classify_with(table, &DetectorSettings::default())
}

/// Computes statistics using the given fan-out threshold
pub fn classify_with(table: &SequenceTable, settings: &DetectorSettings) -> Statistics {
    let sequences: Vec<&Sequence> = table
        .first_definitions()
        .into_iter()
        .map(|(_, sequence)| sequence)
        .collect();

    let modes: Vec<AccessMode> = sequences.iter().map(|s| classify_access(s)).collect();
    let symbol_groups = group_by_symbol(&sequences, &modes);

    Statistics {
        total_sequences: table.len(),
        distinct_sequences: sequences.len(),
        unique_symbols: symbol_groups.len(),
        total_lines: table.total_lines(),
        length: length_stats(&sequences),
        access_modes: access_counts(&modes),
        dual_access: dual_access(&symbol_groups),
        unique_prefixes: count_prefixes(&sequences, 1).len(),
        top_prefixes: top_counts(count_prefixes(&sequences, 1), 0),
        confusing_prefixes: top_counts(count_prefixes(&sequences, 2), settings.fan_out_threshold),
        shortest_paths: shortest_paths(&symbol_groups),
        long_sequences: long_sequences(&sequences),
        typo_prone: typo_prone(&sequences),
        heavy_shift: heavy_shift(&sequences),
        prefix_categories: prefix_categories(&sequences, &modes),
    }
}

type SymbolGroup<'a> = (&'a str, Vec<(&'a Sequence, AccessMode)>);

fn group_by_symbol<'a>(sequences: &[&'a Sequence], modes: &[AccessMode]) -> Vec<SymbolGroup<'a>> {
    let mut groups: Vec<SymbolGroup<'a>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (&sequence, &mode) in sequences.iter().zip(modes) {
        let position = *index.entry(sequence.symbol.as_str()).or_insert_with(|| {
            groups.push((sequence.symbol.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push((sequence, mode));
    }

    groups
}

fn length_stats(sequences: &[&Sequence]) -> LengthStats {
    let mut histogram = BTreeMap::new();
    for sequence in sequences {
        *histogram.entry(sequence.keys.len()).or_insert(0) += 1;
    }

    let lengths = sequences.iter().map(|s| s.keys.len());
    let total: usize = lengths.clone().sum();

    LengthStats {
        min: lengths.clone().min().unwrap_or(0),
        max: lengths.max().unwrap_or(0),
        avg: if sequences.is_empty() {
            0.0
        } else {
            total as f64 / sequences.len() as f64
        },
        histogram,
    }
}

fn access_counts(modes: &[AccessMode]) -> AccessCounts {
    let mut counts = AccessCounts::default();
    for mode in modes {
        match mode {
            AccessMode::AsciiShortcut => counts.ascii_shortcut += 1,
            AccessMode::Mnemonic => counts.mnemonic += 1,
            AccessMode::Variant => counts.variant += 1,
        }
    }
    counts
}

fn dual_access(groups: &[SymbolGroup<'_>]) -> DualAccess {
    let mut dual = DualAccess::default();

    for (symbol, members) in groups {
        let has_ascii = members.iter().any(|(_, mode)| *mode == AccessMode::AsciiShortcut);
        let has_mnemonic = members.iter().any(|(_, mode)| *mode == AccessMode::Mnemonic);

        let first = members[0].0;
        let coverage = SymbolCoverage {
            symbol: symbol.to_string(),
            keys: first.key_string(),
            comment: first.comment.clone(),
        };

        match (has_ascii, has_mnemonic) {
            (true, true) => dual.both.push(coverage),
            (true, false) => dual.ascii_only.push(coverage),
            (false, true) => dual.mnemonic_only.push(coverage),
            (false, false) => dual.neither.push(coverage),
        }
    }

    if !groups.is_empty() {
        dual.coverage_percent = dual.both.len() as f64 / groups.len() as f64 * 100.0;
    }

    dual
}

/// Counts sequences by their first `depth` keys (shorter sequences are skipped)
fn count_prefixes(sequences: &[&Sequence], depth: usize) -> Vec<PrefixCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for sequence in sequences.iter().filter(|s| s.keys.len() >= depth) {
        let prefix = sequence.keys[..depth].join(" ");
        if !counts.contains_key(&prefix) {
            order.push(prefix.clone());
        }
        *counts.entry(prefix).or_insert(0) += 1;
    }

    order
        .into_iter()
        .map(|prefix| {
            let count = counts.get(&prefix).copied().unwrap_or(0);
            PrefixCount { prefix, count }
        })
        .collect()
}

/// Keeps prefixes above `threshold`, most used first, at most ten
fn top_counts(mut prefixes: Vec<PrefixCount>, threshold: usize) -> Vec<PrefixCount> {
    prefixes.retain(|p| p.count > threshold);
    prefixes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.prefix.cmp(&b.prefix)));
    prefixes.truncate(TOP_LIMIT);
    prefixes
}

fn shortest_paths(groups: &[SymbolGroup<'_>]) -> Vec<SymbolAccess> {
    groups
        .iter()
        .filter_map(|(symbol, members)| {
            members
                .iter()
                .map(|(sequence, _)| *sequence)
                .min_by_key(|sequence| sequence.keys.len())
                .map(|shortest| SymbolAccess {
                    symbol: symbol.to_string(),
                    shortest_length: shortest.keys.len(),
                    shortest_keys: shortest.key_string(),
                    alternatives: members.len(),
                })
        })
        .collect()
}

fn long_sequences(sequences: &[&Sequence]) -> Vec<SequenceRef> {
    let mut long: Vec<&Sequence> = sequences
        .iter()
        .copied()
        .filter(|s| s.keys.len() >= LONG_SEQUENCE_LENGTH)
        .collect();
    long.sort_by(|a, b| b.keys.len().cmp(&a.keys.len()));
    long.into_iter()
        .take(TOP_LIMIT)
        .map(SequenceRef::from_sequence)
        .collect()
}

fn typo_prone(sequences: &[&Sequence]) -> Vec<SequenceRef> {
    sequences
        .iter()
        .filter(|s| s.keys.len() >= 3 && s.keys.windows(2).any(|pair| pair[0] == pair[1]))
        .map(|s| SequenceRef::from_sequence(s))
        .collect()
}

fn heavy_shift(sequences: &[&Sequence]) -> Vec<ShiftBurden> {
    let mut burdens: Vec<ShiftBurden> = sequences
        .iter()
        .filter(|s| s.keys.len() <= 4)
        .filter_map(|s| {
            let shifted_keys = s
                .keys
                .iter()
                .filter(|k| {
                    SHIFTED_KEYS.contains(&k.as_str())
                        || (k.chars().count() == 1 && k.chars().all(char::is_uppercase))
                })
                .count();
            (shifted_keys >= 3).then(|| ShiftBurden {
                sequence: SequenceRef::from_sequence(s),
                shifted_keys,
            })
        })
        .collect();
    burdens.sort_by(|a, b| b.shifted_keys.cmp(&a.shifted_keys));
    burdens.truncate(TOP_LIMIT);
    burdens
}

fn prefix_categories(
    sequences: &[&Sequence],
    modes: &[AccessMode],
) -> BTreeMap<String, BTreeSet<String>> {
    let mut usage: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for (sequence, mode) in sequences.iter().zip(modes) {
        if *mode == AccessMode::Mnemonic {
            if let Some(first) = sequence.keys.first() {
                usage
                    .entry(first.clone())
                    .or_default()
                    .insert(sequence.category.clone());
            }
        }
    }

    usage
}
