use crate::core::finding::{FindingDetails, FindingKind, Severity};
use crate::core::types::{Sequence, TypeTag, UNCATEGORIZED};
use crate::core::validator::*;

fn sequence(symbol: &str, codepoint: Option<&str>) -> Sequence {
    Sequence {
        keys: vec!["m".to_string(), "1".to_string()],
        symbol: symbol.to_string(),
        codepoint: codepoint.map(str::to_string),
        comment: None,
        tag: None,
        category: UNCATEGORIZED.to_string(),
        subcategory: None,
        line_number: 9,
    }
}

#[test]
fn test_codepoint_matches() {
    assert_eq!(check_codepoint(&sequence("é", Some("00E9"))), Ok(()));
    assert_eq!(check_codepoint(&sequence("é", Some("00e9"))), Ok(()), "Case-insensitive");
    assert_eq!(check_codepoint(&sequence("😀", Some("1F600"))), Ok(()));
    assert_eq!(check_codepoint(&sequence("é", None)), Ok(()));
}

#[test]
fn test_codepoint_mismatch() {
    let issue = check_codepoint(&sequence("é", Some("0041"))).unwrap_err();

    assert_eq!(
        issue,
        SequenceIssue::CodepointMismatch {
            symbol: "é".to_string(),
            actual: "00E9".to_string(),
            declared: "0041".to_string(),
        }
    );
    assert_eq!(
        issue.to_string(),
        "Symbol \"é\" (U+00E9) does not match declared codepoint U+0041"
    );
}

#[test]
fn test_lowercase_codepoint_matches() {
    assert_eq!(check_codepoint(&sequence("é", Some("00e9"))), Ok(()));
    assert_eq!(check_codepoint(&sequence("😀", Some("1f600"))), Ok(()));
}

#[test]
fn test_padded_codepoint_is_mismatch() {
    let issue = check_codepoint(&sequence("é", Some("0000E9"))).unwrap_err();
    assert_eq!(
        issue,
        SequenceIssue::CodepointMismatch {
            symbol: "é".to_string(),
            actual: "00E9".to_string(),
            declared: "0000E9".to_string(),
        }
    );

    let issue = check_codepoint(&sequence("😀", Some("01F600"))).unwrap_err();
    assert!(matches!(issue, SequenceIssue::CodepointMismatch { ref actual, .. } if actual == "1F600"));
}

#[test]
fn test_padded_codepoint_surfaces_once_per_line() {
    use crate::core::conflict::detect_conflicts;
    use crate::core::parser::parse_content;

    for line in [
        "<Multi_key> <e> <apostrophe> : \"é\" U0000E9",
        "<Multi_key> <s> <m> : \"😀\" U01F600",
    ] {
        let mismatches = detect_conflicts(&parse_content(line))
            .into_iter()
            .filter(|f| f.kind == FindingKind::CodepointMismatch)
            .count();
        assert_eq!(mismatches, 1, "{}", line);
    }

    let lowercase = detect_conflicts(&parse_content("<Multi_key> <e> <apostrophe> : \"é\" U00e9"));
    assert!(lowercase.iter().all(|f| f.kind != FindingKind::CodepointMismatch));
}

#[test]
fn test_multi_char_with_codepoint() {
    let issue = check_codepoint(&sequence("ﬁx", Some("FB01"))).unwrap_err();
    assert!(matches!(issue, SequenceIssue::MultiCharWithCodepoint { .. }));
    assert_eq!(issue.kind(), FindingKind::MultiCharWithCodepoint);
    assert_eq!(issue.severity(), Severity::Warning);
}

#[test]
fn test_key_token_checks() {
    assert!(check_key_token("asciicircum", MAX_KEY_LENGTH).is_empty());
    assert_eq!(
        check_key_token("a b", MAX_KEY_LENGTH),
        vec![SequenceIssue::KeyContainsSpace("a b".to_string())]
    );

    let long = "x".repeat(MAX_KEY_LENGTH + 1);
    assert_eq!(
        check_key_token(&long, MAX_KEY_LENGTH),
        vec![SequenceIssue::KeyTooLong(long.clone())]
    );
    assert!(check_key_token(&"x".repeat(MAX_KEY_LENGTH), MAX_KEY_LENGTH).is_empty());

    let both = format!("{} y", long);
    assert_eq!(check_key_token(&both, MAX_KEY_LENGTH).len(), 2);
}

#[test]
fn test_comment_checks() {
    let mut seq = sequence("x", None);
    assert_eq!(check_comment(&seq, false), Some(SequenceIssue::MissingComment));

    seq.tag = Some(TypeTag::Iconic);
    assert_eq!(
        check_comment(&seq, false),
        Some(SequenceIssue::EmptyDescription("ICONIC".to_string()))
    );

    seq.comment = Some("cross".to_string());
    assert_eq!(check_comment(&seq, true), None);

    seq.tag = None;
    assert_eq!(check_comment(&seq, false), None);
    assert_eq!(
        check_comment(&seq, true),
        Some(SequenceIssue::UntaggedComment("cross".to_string()))
    );
}

#[test]
fn test_into_finding() {
    let seq = sequence("é", Some("0041"));
    let finding = validate_sequence(&seq, MAX_KEY_LENGTH)
        .into_iter()
        .next()
        .unwrap()
        .into_finding(&seq);

    assert_eq!(finding.kind, FindingKind::CodepointMismatch);
    assert_eq!(finding.line_number, 9);
    assert_eq!(
        finding.details,
        FindingDetails::Sequence {
            sequence: "<Multi_key> <m> <1>".to_string()
        }
    );

    let untagged = SequenceIssue::UntaggedComment("a".repeat(50)).into_finding(&seq);
    assert_eq!(untagged.severity, Severity::Info);
    assert_eq!(
        untagged.details,
        FindingDetails::Comment {
            comment: "a".repeat(40)
        }
    );
}
