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

//! Compose Lint
//!
//! A checker for XCompose files: parses `<Multi_key>` sequences into a
//! queryable model and reports the mistakes that silently break typing.
//!
//! # Features
//!
//! - **Duplicate Detection:** Same key sequence defined more than once
//! - **Prefix Shadowing:** Complete sequences that make longer ones unreachable
//! - **Sanity Checks:** Codepoint mismatches, suspicious key names, malformed lines
//! - **Statistics:** Access modes, dual-access coverage, prefix fan-out
//! - **Auto-Tagging:** `[ICONIC]`/`[MNEMONIC]` comment tags with automatic backups
//!
//! # Architecture
//!
//! - **`core`:** Pure analysis (types, tokenizer, parser, table, detection, statistics)
//! - **`config`:** File operations (loading, validation runs, backups, atomic rewrites)
//!
//! # Examples
//!
//! ## Parsing a compose file
//!
//! ```no_run
//! use compose_lint::config;
//!
//! let table = config::parse("~/.XCompose")?;
//! for (category, sequences) in table.by_category() {
//!     println!("{}: {} sequences", category, sequences.len());
//! }
//! # Ok::<(), compose_lint::config::ConfigError>(())
//! ```
//!
//! ## Detecting conflicts
//!
//! ```
//! use compose_lint::core::{detect_conflicts, parser::parse_content, FindingKind};
//!
//! let table = parse_content("<Multi_key> <m> <1> : \"x\"\n<Multi_key> <m> <1> <2> : \"y\"\n");
//! let findings = detect_conflicts(&table);
//!
//! assert!(findings.iter().any(|f| f.kind == FindingKind::PrefixShadowing));
//! ```

pub mod config;
pub mod core;

// Re-export commonly used types for convenience
pub use config::validator::{ComposeValidator, ValidationReport};
pub use core::{Finding, FindingKind, KeyPath, Sequence, SequenceTable, Severity};
