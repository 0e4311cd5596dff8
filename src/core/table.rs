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

//! Parsed sequence storage with first-occurrence indexing
//!
//! The table keeps every occurrence of every sequence. Indexes hold
//! positions into the file-order list, so each index stays in file order
//! and the first entry of a key-path group is "the" definition.
//!
//! # Performance
//! - Insert: O(1) average case
//! - Lookup by category or key-path: O(1) average case

use std::collections::HashMap;

use crate::core::tokenizer::RejectedLine;
use crate::core::types::{KeyPath, Sequence};

/// Ordered collection of parsed sequences plus lookup indexes
///
/// Built once per parse pass; consumers only read it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceTable {
    /// Every sequence in file order
    sequences: Vec<Sequence>,

    /// Category names in order of first appearance
    category_order: Vec<String>,

    /// Category name → positions in `sequences`
    categories: HashMap<String, Vec<usize>>,

    /// Key-path identity → positions of every occurrence
    key_paths: HashMap<KeyPath, Vec<usize>>,

    /// Key-paths in order of first appearance
    key_path_order: Vec<KeyPath>,

    /// Lines that could not be classified or parsed
    rejected: Vec<RejectedLine>,

    /// Number of lines in the source
    total_lines: usize,
}

impl SequenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sequence to every index
    ///
    /// Nothing is merged or overwritten; duplicates are the conflict
    /// detector's business.
    pub fn insert(&mut self, sequence: Sequence) {
        let position = self.sequences.len();

        if !self.categories.contains_key(&sequence.category) {
            self.category_order.push(sequence.category.clone());
        }
        self.categories
            .entry(sequence.category.clone())
            .or_default()
            .push(position);

        let key_path = sequence.key_path();
        if !self.key_paths.contains_key(&key_path) {
            self.key_path_order.push(key_path.clone());
        }
        self.key_paths.entry(key_path).or_default().push(position);

        self.sequences.push(sequence);
    }

    /// Records a line that produced no sequence
    pub fn reject(&mut self, line: RejectedLine) {
        self.rejected.push(line);
    }

    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
    }

    /// All sequences in file order
    pub fn all(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Category → sequences, categories in order of first appearance
    pub fn by_category(&self) -> Vec<(&str, Vec<&Sequence>)> {
        self.category_order
            .iter()
            .map(|name| (name.as_str(), self.category(name)))
            .collect()
    }

    /// Sequences of one category in file order (empty if unknown)
    pub fn category(&self, name: &str) -> Vec<&Sequence> {
        self.resolve(self.categories.get(name))
    }

    /// Category names in order of first appearance
    pub fn categories(&self) -> &[String] {
        &self.category_order
    }

    /// Every occurrence of a key-path in file order
    pub fn by_key_path(&self, key_path: &KeyPath) -> Vec<&Sequence> {
        self.resolve(self.key_paths.get(key_path))
    }

    /// First definition of a key-path
    pub fn first_definition(&self, key_path: &KeyPath) -> Option<&Sequence> {
        self.key_paths
            .get(key_path)
            .and_then(|positions| positions.first())
            .map(|&position| &self.sequences[position])
    }

    /// Distinct key-paths with all their occurrences, in order of first appearance
    pub fn key_path_groups(&self) -> Vec<(&KeyPath, Vec<&Sequence>)> {
        self.key_path_order
            .iter()
            .map(|key_path| (key_path, self.by_key_path(key_path)))
            .collect()
    }

    /// Distinct key-paths with their first definition, in order of first appearance
    pub fn first_definitions(&self) -> Vec<(&KeyPath, &Sequence)> {
        self.key_path_order
            .iter()
            .filter_map(|key_path| self.first_definition(key_path).map(|seq| (key_path, seq)))
            .collect()
    }

    pub fn rejected_lines(&self) -> &[RejectedLine] {
        &self.rejected
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Number of sequences (all occurrences)
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Number of distinct key-paths
    pub fn distinct_len(&self) -> usize {
        self.key_path_order.len()
    }

    fn resolve(&self, positions: Option<&Vec<usize>>) -> Vec<&Sequence> {
        positions
            .map(|positions| positions.iter().map(|&p| &self.sequences[p]).collect())
            .unwrap_or_default()
    }
}
