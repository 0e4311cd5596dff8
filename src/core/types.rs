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

//! src/core/types.rs
//!
//! Core type definitions for compose sequence analysis
//!
//! This module defines the fundamental types used throughout the crate:
//! - `TypeTag`: Explicit authorial classification written in a comment
//! - `AccessMode`: How a sequence is meant to be typed (shortcut, mnemonic, variant)
//! - `KeyPath`: Canonical identity of a sequence's key tokens
//! - `Sequence`: One complete compose rule with its metadata
//!
//! All types implement serialization so reports can be exported as JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to sequences that appear before any section header
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Fixed prefix marker that opens every multi-key sequence
pub const MULTI_KEY: &str = "<Multi_key>";

/// Explicit type tag written at the start of a sequence comment
///
/// `# [ICONIC] right arrow` or `# [MNEMONIC] alpha`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeTag {
    /// Visual shortcut: the keys look like the symbol (`- >` for →)
    Iconic,
    /// Mnemonic: the keys spell a name (`g a` for α)
    Mnemonic,
}

impl TypeTag {
    /// Parses the bracketed tag name, case-sensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ICONIC" => Some(TypeTag::Iconic),
            "MNEMONIC" => Some(TypeTag::Mnemonic),
            _ => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Iconic => write!(f, "ICONIC"),
            TypeTag::Mnemonic => write!(f, "MNEMONIC"),
        }
    }
}

/// How a sequence is accessed by the person typing it
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Short punctuation/ASCII-art sequence
    AsciiShortcut,
    /// Category prefix followed by a spelled name
    Mnemonic,
    /// Anything else (alternative spellings, long forms)
    Variant,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::AsciiShortcut => write!(f, "ascii-shortcut"),
            AccessMode::Mnemonic => write!(f, "mnemonic"),
            AccessMode::Variant => write!(f, "variant"),
        }
    }
}

/// Canonical key-path of a sequence
///
/// Identity is the ordered token list, so prefix tests are token-exact:
/// `g a` is a prefix of `g a b` but never of `g ab`, even when a token
/// itself contains whitespace.
///
/// # Example
/// ```
/// use compose_lint::core::KeyPath;
///
/// let short = KeyPath::new(vec!["m".to_string(), "1".to_string()]);
/// let long = KeyPath::new(vec!["m".into(), "1".into(), "2".into()]);
/// assert!(short.is_strict_prefix_of(&long));
/// assert_eq!(short.to_string(), "m 1");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `self` is shorter than `other` and matches its leading tokens
    pub fn is_strict_prefix_of(&self, other: &KeyPath) -> bool {
        self.0.len() < other.0.len() && other.0.starts_with(&self.0)
    }

    /// Bracketed source form without the prefix marker, e.g. `<g> <a>`
    pub fn bracketed(&self) -> String {
        self.0
            .iter()
            .map(|k| format!("<{}>", k))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// One compose rule
///
/// Invariants (upheld by the parser): `keys` is never empty, `symbol` is
/// never empty, and `category` always has a value.
///
/// # Example
/// ```ignore
/// // <Multi_key> <g> <a> : "α" U03B1 # [MNEMONIC] alpha
/// let seq = Sequence {
///     keys: vec!["g".into(), "a".into()],
///     symbol: "α".into(),
///     codepoint: Some("03B1".into()),
///     comment: Some("alpha".into()),
///     tag: Some(TypeTag::Mnemonic),
///     category: "GREEK LETTERS".into(),
///     subcategory: None,
///     line_number: 12,
/// };
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Sequence {
    /// Key tokens in typing order, prefix marker excluded
    pub keys: Vec<String>,

    /// Output text produced by the sequence
    pub symbol: String,

    /// Declared codepoint (hex digits only), when written in the source
    pub codepoint: Option<String>,

    /// Description with any leading type tag removed
    pub comment: Option<String>,

    /// Explicit type tag from the comment
    pub tag: Option<TypeTag>,

    /// Nearest preceding section header
    pub category: String,

    /// Nearest preceding subsection header within the category
    pub subcategory: Option<String>,

    /// 1-based source line
    pub line_number: usize,
}

impl Sequence {
    /// Canonical identity used for duplicate and shadowing comparisons
    pub fn key_path(&self) -> KeyPath {
        KeyPath::new(self.keys.clone())
    }

    /// Space-separated key string, e.g. `g a`
    pub fn key_string(&self) -> String {
        self.keys.join(" ")
    }

    /// Full left-hand side as written, e.g. `<Multi_key> <g> <a>`
    pub fn sequence_string(&self) -> String {
        format!("{} {}", MULTI_KEY, self.key_path().bracketed())
    }

    /// Number of output characters (Unicode scalar values)
    pub fn symbol_len(&self) -> usize {
        self.symbol.chars().count()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.symbol.replace('\\', "\\\\").replace('"', "\\\"");
        write!(f, "{} : \"{}\"", self.sequence_string(), symbol)?;

        if let Some(codepoint) = &self.codepoint {
            write!(f, " U{}", codepoint)?;
        }

        match (&self.tag, &self.comment) {
            (Some(tag), Some(comment)) => write!(f, " # [{}] {}", tag, comment)?,
            (Some(tag), None) => write!(f, " # [{}]", tag)?,
            (None, Some(comment)) => write!(f, " # {}", comment)?,
            (None, None) => {}
        }

        Ok(())
    }
}
