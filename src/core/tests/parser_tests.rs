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

//! Parser module tests
//!
//! Tests for parsing compose files:
//! - Key token, output and codepoint parsing
//! - Full sequence lines with and without comments
//! - Type tag extraction
//! - Malformed line diagnosis
//! - Whole-file parsing with header context

use crate::core::{
    parser::*,
    tokenizer::RejectReason,
    types::{TypeTag, UNCATEGORIZED},
};

#[test]
fn test_parse_key_token() {
    assert_eq!(parse_key_token("<asciicircum> rest"), Ok((" rest", "asciicircum")));
    assert!(parse_key_token("<>").is_err());
    assert!(parse_key_token("asciicircum").is_err());
}

#[test]
fn test_parse_output() {
    assert_eq!(parse_output("\"α\" U03B1"), Ok((" U03B1", "α")));
    assert_eq!(parse_output("\"<=>\""), Ok(("", "<=>")));
    assert!(parse_output("\"\"").is_err(), "Empty output is not a sequence");
}

#[test]
fn test_parse_output_with_escaped_quote() {
    assert_eq!(parse_output(r#""\"" # quote"#), Ok((" # quote", r#"\""#)));
    assert_eq!(parse_output(r#""a\\b""#), Ok(("", r#"a\\b"#)));
    assert!(parse_output(r#""\""#).is_err(), "Escaped quote leaves the output unterminated");
}

#[test]
fn test_unescape_output() {
    assert_eq!(unescape_output(r#"\""#), "\"");
    assert_eq!(unescape_output(r#"a\\b"#), r"a\b");
    assert_eq!(unescape_output(r"\n"), r"\n", "Unknown escapes are kept");
    assert_eq!(unescape_output("α"), "α");
}

#[test]
fn test_escaped_quote_sequence_is_parsed() {
    let line = r#"<Multi_key> <quotedbl> <quotedbl> : "\"" U0022 # [ICONIC] double quote"#;
    let table = parse_content(line);

    assert!(table.rejected_lines().is_empty());
    let seq = &table.all()[0];
    assert_eq!(seq.symbol, "\"");
    assert_eq!(seq.comment.as_deref(), Some("double quote"));
    assert_eq!(seq.to_string(), line);
}

#[test]
fn test_parse_codepoint_length() {
    assert_eq!(parse_codepoint("03B1"), Ok(("", "03B1")));
    assert_eq!(parse_codepoint("1F600 #"), Ok((" #", "1F600")));
    assert!(parse_codepoint("3B1").is_err(), "Fewer than four digits");
}

#[test]
fn test_parse_full_sequence_line() {
    let (_, line) = parse_sequence_line("<Multi_key> <g> <a> : \"α\" U03B1 # [MNEMONIC] alpha").unwrap();

    assert_eq!(line.keys, vec!["g", "a"]);
    assert_eq!(line.symbol, "α");
    assert_eq!(line.codepoint, Some("03B1"));
    assert_eq!(line.comment, Some("[MNEMONIC] alpha"));
}

#[test]
fn test_parse_minimal_sequence_line() {
    let (_, line) = parse_sequence_line("<Multi_key> <m> <1>:\"x\"").unwrap();

    assert_eq!(line.keys, vec!["m", "1"]);
    assert_eq!(line.symbol, "x");
    assert_eq!(line.codepoint, None);
    assert_eq!(line.comment, None);
}

#[test]
fn test_parse_comment_without_codepoint() {
    let (_, line) = parse_sequence_line("<Multi_key> <minus> <greater> : \"→\"#arrow").unwrap();
    assert_eq!(line.comment, Some("arrow"));
}

#[test]
fn test_parse_rejects_trailing_garbage() {
    assert!(parse_sequence_line("<Multi_key> <g> <a> : \"α\" junk").is_err());
    assert!(parse_sequence_line("<Multi_key> <g> <a> : \"α\" U1234567").is_err());
    assert!(parse_sequence_line("<Multi_key> : \"α\"").is_err(), "At least one key");
}

#[test]
fn test_split_tag() {
    assert_eq!(
        split_tag("[ICONIC] right arrow"),
        (Some(TypeTag::Iconic), Some("right arrow".to_string()))
    );
    assert_eq!(split_tag("[MNEMONIC]"), (Some(TypeTag::Mnemonic), None));
    assert_eq!(split_tag("plain text"), (None, Some("plain text".to_string())));
    assert_eq!(
        split_tag("[VISUAL] old tag"),
        (None, Some("[VISUAL] old tag".to_string())),
        "Unknown tags stay in the comment"
    );
    assert_eq!(split_tag("   "), (None, None));
}

#[test]
fn test_comment_offset_skips_quoted_hash() {
    let line = "<Multi_key> <numbersign> : \"#\" # hash";
    let offset = comment_offset(line).unwrap();
    assert_eq!(&line[offset..], "# hash");

    assert_eq!(comment_offset("<Multi_key> <g> : \"γ\""), None);

    let line = r##"<Multi_key> <quotedbl> : "\"#" # quote hash"##;
    let offset = comment_offset(line).unwrap();
    assert_eq!(&line[offset..], "# quote hash");
}

#[test]
fn test_diagnose_malformed() {
    assert_eq!(diagnose_malformed("<Multi_key> <g> <a> \"α\""), "Missing colon separator");
    assert_eq!(diagnose_malformed("<Multi_key> <g> <a> : α"), "Missing output string in quotes");
    assert_eq!(diagnose_malformed("<Multi_key> <g> <a> : \"\""), "Malformed sequence definition");
}

#[test]
fn test_parse_content_tracks_headers() {
    let content = "\
<Multi_key> <x> : \"x\"
# GREEK LETTERS - lowercase and uppercase
## LOWERCASE
<Multi_key> <g> <a> : \"α\"
# MATH (OPERATORS)
<Multi_key> <p> <l> : \"+\"
";
    let table = parse_content(content);
    let all = table.all();

    assert_eq!(all.len(), 3);
    assert_eq!(all[0].category, UNCATEGORIZED);
    assert_eq!(all[1].category, "GREEK LETTERS");
    assert_eq!(all[1].subcategory.as_deref(), Some("LOWERCASE"));
    assert_eq!(all[2].category, "MATH (OPERATORS)");
    assert_eq!(all[2].subcategory, None, "New section clears the subsection");
    assert_eq!(all[1].line_number, 4);
}

#[test]
fn test_parse_content_keeps_going_after_bad_lines() {
    let content = "\
<Multi_key> <g> <a> \"α\"
something else
<Multi_key> <g> <b> : \"β\"
";
    let table = parse_content(content);

    assert_eq!(table.len(), 1);
    assert_eq!(table.all()[0].line_number, 3);

    let rejected = table.rejected_lines();
    assert_eq!(rejected.len(), 2);
    assert_eq!(
        rejected[0].reason,
        RejectReason::MalformedSequence("Missing colon separator".to_string())
    );
    assert_eq!(rejected[1].reason, RejectReason::Unrecognized);
    assert_eq!(rejected[1].line_number, 2);
}

#[test]
fn test_parse_content_indented_line() {
    let table = parse_content("   <Multi_key> <g> <a> : \"α\"   \n");
    assert_eq!(table.len(), 1);
    assert!(table.rejected_lines().is_empty());
}

#[test]
fn test_scenario_tagged_sequence() {
    let table = parse_content("<Multi_key> <g> <a> : \"α\" U03B1 # [MNEMONIC] alpha");
    let seq = &table.all()[0];

    assert_eq!(table.len(), 1);
    assert_eq!(seq.keys, vec!["g".to_string(), "a".to_string()]);
    assert_eq!(seq.symbol, "α");
    assert_eq!(seq.codepoint.as_deref(), Some("03B1"));
    assert_eq!(seq.tag, Some(TypeTag::Mnemonic));
    assert_eq!(seq.comment.as_deref(), Some("alpha"));
}

#[test]
fn test_parse_is_deterministic() {
    let content = "# ARROWS\n<Multi_key> <minus> <greater> : \"→\"\nbad\n";
    assert_eq!(parse_content(content), parse_content(content));
}
