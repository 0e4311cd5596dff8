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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the sequence model and the analysis engine:
//! - Type definitions for sequences and key-paths
//! - Line classification and sequence parsing
//! - The sequence table with file-order indexes
//! - Conflict detection (duplicates, prefix shadowing, sanity checks)
//! - Access-mode classification and statistics
//!
//! Nothing here touches the filesystem, so every stage can be tested on
//! in-memory strings.

pub mod conflict;
pub mod finding;
pub mod parser;
pub mod stats;
pub mod table;
pub mod tokenizer;
pub mod types;
pub mod validator;

pub use conflict::{detect_conflicts, ConflictDetector, DetectorSettings, PairwiseScan, ShadowScan, TrieScan};
pub use finding::{Finding, FindingDetails, FindingKind, Severity};
pub use stats::{classify, Statistics};
pub use table::SequenceTable;
pub use types::*;

#[cfg(test)]
mod tests;
