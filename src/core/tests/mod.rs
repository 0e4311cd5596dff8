//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Sequence line grammar and whole-file parsing
//! - Sequence table indexing
//! - Conflict detection (duplicates, shadowing, syntax)
//! - Per-sequence checks (codepoints, key tokens, comments)
//! - Access-mode classification and statistics
//! - Property-based invariants

#[cfg(test)]
mod conflict_tests;
#[cfg(test)]
mod parser_tests;
#[cfg(test)]
mod table_tests;
#[cfg(test)]
mod validator_tests;
