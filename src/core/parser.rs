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

//! src/core/parser.rs
//!
//! Compose file sequence parser
//!
//! This module turns sequence lines into `Sequence` records. It handles:
//! - Bracketed key tokens after the `<Multi_key>` marker
//! - The quoted output string, with `\"` and `\\` escapes
//! - An optional `U` + 4–6 hex digit codepoint
//! - An optional trailing comment with an `[ICONIC]`/`[MNEMONIC]` tag
//!
//! # Architecture
//! Sequence lines are parsed with nom combinators; line classification
//! (headers, comments, rejects) lives in `tokenizer.rs`. `parse_content`
//! folds the classifier over every line and inserts the results into a
//! `SequenceTable`.
//!
//! # Grammar
//! ```text
//! <Multi_key> (SPACE "<" TOKEN ">")+ SPACE* ":" SPACE* "\"" OUTPUT "\""
//!     (SPACE "U" HEX{4,6})? (SPACE* "#" REST)?
//! ```

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1, take_while_m_n},
    character::complete::{anychar, char, space0, space1},
    combinator::{eof, opt, recognize, rest},
    multi::many1,
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use tracing::debug;

use crate::core::table::SequenceTable;
use crate::core::tokenizer::{HeaderState, LineClass, LineClassifier};
use crate::core::types::{Sequence, TypeTag, MULTI_KEY};

/// Raw fields of one sequence line, borrowed from the input
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SequenceLine<'a> {
    pub keys: Vec<&'a str>,
    /// Output as written between the quotes, escapes included
    pub symbol: &'a str,
    pub codepoint: Option<&'a str>,
    pub comment: Option<&'a str>,
}

/// Parses a complete compose file into a sequence table
///
/// Header context is threaded through the classifier as an explicit
/// value. Lines that cannot be used are kept in the table's rejected
/// list; parsing never stops early.
///
/// # Example
/// ```
/// use compose_lint::core::parser::parse_content;
///
/// let table = parse_content("# GREEK - letters\n<Multi_key> <g> <a> : \"α\"\n");
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.all()[0].category, "GREEK");
/// ```
pub fn parse_content(content: &str) -> SequenceTable {
    let classifier = LineClassifier::new();
    let mut table = SequenceTable::new();
    let mut state = HeaderState::default();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1; // Human-readable numbers start at 1

        let (next, class) = classifier.classify(state, line_number, line);
        state = next;

        match class {
            LineClass::Sequence(sequence) => table.insert(sequence),
            LineClass::Unrecognized(rejected) => table.reject(rejected),
            LineClass::Category(title) => debug!(line = line_number, %title, "section header"),
            LineClass::Subcategory(_) | LineClass::Comment | LineClass::Skip => {}
        }
    }

    table.set_total_lines(content.lines().count());

    debug!(
        sequences = table.len(),
        rejected = table.rejected_lines().len(),
        categories = table.by_category().len(),
        "parsed compose content"
    );

    table
}

/// Parses a single sequence line
///
/// The line must already be trimmed. Returns the borrowed fields or a
/// nom error when the line does not match the sequence grammar.
pub fn parse_sequence_line(input: &str) -> IResult<&str, SequenceLine<'_>> {
    let (input, _) = tag(MULTI_KEY).parse(input)?;
    let (input, keys) = many1(preceded(space1, parse_key_token)).parse(input)?;
    let (input, _) = (space0, char(':'), space0).parse(input)?;
    let (input, symbol) = parse_output(input)?;
    let (input, codepoint) = opt(preceded((space1, char('U')), parse_codepoint)).parse(input)?;
    let (input, comment) = opt(preceded((space0, char('#')), rest)).parse(input)?;
    let (input, _) = eof(input)?;

    Ok((
        input,
        SequenceLine {
            keys,
            symbol,
            codepoint,
            comment: comment.map(str::trim),
        },
    ))
}

/// Parses one bracketed key token, e.g. `<asciicircum>`
pub fn parse_key_token(input: &str) -> IResult<&str, &str> {
    delimited(char('<'), take_while1(|c: char| c != '>'), char('>')).parse(input)
}

/// Parses the quoted output string
///
/// Returns the text between the quotes as written; a backslash escapes
/// the character after it, so `"\""` is a one-quote output.
pub fn parse_output(input: &str) -> IResult<&str, &str> {
    delimited(
        char('"'),
        recognize(many1(alt((is_not("\\\""), recognize(pair(char('\\'), anychar)))))),
        char('"'),
    )
    .parse(input)
}

/// Resolves `\"` and `\\` in a raw output; other backslashes are kept
pub fn unescape_output(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            output.push(ch);
            continue;
        }
        match chars.next() {
            Some(escaped @ ('"' | '\\')) => output.push(escaped),
            Some(other) => {
                output.push('\\');
                output.push(other);
            }
            None => output.push('\\'),
        }
    }

    output
}

/// Parses 4 to 6 hex digits (the `U` is consumed by the caller)
pub fn parse_codepoint(input: &str) -> IResult<&str, &str> {
    take_while_m_n(4, 6, |c: char| c.is_ascii_hexdigit()).parse(input)
}

/// Splits a leading `[ICONIC]`/`[MNEMONIC]` tag off a comment
///
/// Returns the tag (if any) and the remaining description. An empty
/// description comes back as `None`.
pub fn split_tag(comment: &str) -> (Option<TypeTag>, Option<String>) {
    let comment = comment.trim();

    let tagged = comment
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .and_then(|(name, rest)| TypeTag::from_name(name).map(|tag| (tag, rest)));

    match tagged {
        Some((tag, rest)) => (Some(tag), non_empty(rest.trim())),
        None => (None, non_empty(comment)),
    }
}

/// Builds a `Sequence` from parsed fields and the active header state
pub fn build_sequence(line: SequenceLine<'_>, state: &HeaderState, line_number: usize) -> Sequence {
    let (tag, comment) = match line.comment {
        Some(raw) => split_tag(raw),
        None => (None, None),
    };

    Sequence {
        keys: line.keys.into_iter().map(str::to_string).collect(),
        symbol: unescape_output(line.symbol),
        codepoint: line.codepoint.map(str::to_string),
        comment,
        tag,
        category: state.category.clone(),
        subcategory: state.subcategory.clone(),
        line_number,
    }
}

/// Byte offset of the comment marker in a sequence line
///
/// The marker is the first `#` after the closing quote of the output, so
/// outputs of `"#"` or `"\"#"` are never mistaken for a comment.
pub fn comment_offset(line: &str) -> Option<usize> {
    let open = line.find('"')?;
    let mut escaped = false;
    let close = line[open + 1..].char_indices().find_map(|(i, c)| {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(open + 1 + i),
            _ => {}
        }
        None
    })?;
    let hash = close + 1 + line[close + 1..].find('#')?;
    Some(hash)
}

/// Explains why a line starting with `<Multi_key>` failed to parse
pub fn diagnose_malformed(line: &str) -> &'static str {
    if !line.contains(':') {
        "Missing colon separator"
    } else if !line.contains('"') {
        "Missing output string in quotes"
    } else {
        "Malformed sequence definition"
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
