use crate::core::conflict::{detect_conflicts, ConflictDetector, DetectorSettings, PairwiseScan, TrieScan};
use crate::core::finding::{Finding, FindingDetails, FindingKind, Occurrence, Severity};
use crate::core::parser::parse_content;
use crate::core::types::KeyPath;

/// Detector without the comment pass, so fixtures can stay uncommented
fn detector() -> ConflictDetector {
    ConflictDetector::with_settings(DetectorSettings {
        check_comments: false,
        ..DetectorSettings::default()
    })
}

fn detect(content: &str) -> Vec<Finding> {
    detector().detect(&parse_content(content))
}

fn of_kind(findings: &[Finding], kind: FindingKind) -> Vec<&Finding> {
    findings.iter().filter(|f| f.kind == kind).collect()
}

#[test]
fn test_no_findings_for_clean_input() {
    let findings = detect("<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <b> : \"β\"\n");
    assert!(findings.is_empty(), "{:?}", findings);
}

#[test]
fn test_empty_table_has_no_findings() {
    assert!(detect("").is_empty());
}

#[test]
fn test_duplicate_conflict() {
    let findings = detect("<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <a> : \"β\"\n");
    let conflicts = of_kind(&findings, FindingKind::DuplicateConflict);

    assert_eq!(findings.len(), 1);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert_eq!(conflicts[0].line_number, 1);
    assert_eq!(
        conflicts[0].message,
        "Duplicate sequence with different symbols: <Multi_key> <g> <a> (line 1 → α, line 2 → β)"
    );
    assert_eq!(
        conflicts[0].details,
        FindingDetails::Occurrences {
            sequence: "<Multi_key> <g> <a>".to_string(),
            occurrences: vec![
                Occurrence { line: 1, symbol: "α".to_string() },
                Occurrence { line: 2, symbol: "β".to_string() },
            ],
        }
    );
}

#[test]
fn test_duplicate_harmless() {
    let findings = detect("<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <a> : \"α\"\n");

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::DuplicateHarmless);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(
        findings[0].message,
        "Duplicate sequence (same symbol): <Multi_key> <g> <a> → α"
    );
}

#[test]
fn test_triple_duplicate_is_one_conflict() {
    let findings = detect(
        "<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <a> : \"β\"\n",
    );

    assert_eq!(of_kind(&findings, FindingKind::DuplicateConflict).len(), 1);
    assert!(of_kind(&findings, FindingKind::DuplicateHarmless).is_empty());
}

#[test]
fn test_prefix_shadowing() {
    let findings = detect("<Multi_key> <m> <1> : \"x\"\n<Multi_key> <m> <1> <2> : \"y\"\n");

    assert_eq!(findings.len(), 1);
    let shadow = &findings[0];
    assert_eq!(shadow.kind, FindingKind::PrefixShadowing);
    assert_eq!(shadow.severity, Severity::Error);
    assert_eq!(shadow.line_number, 1);
    assert_eq!(
        shadow.message,
        "<Multi_key> <m> <1> → x shadows <Multi_key> <m> <1> <2> → y (line 2)"
    );
}

#[test]
fn test_shadowing_is_token_exact() {
    // "g a" does not shadow "g ab"
    let findings = detect("<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <ab> : \"x\"\n");
    assert!(of_kind(&findings, FindingKind::PrefixShadowing).is_empty());
}

#[test]
fn test_shadowing_reports_every_pair() {
    let findings = detect(
        "<Multi_key> <a> <b> <c> : \"3\"\n<Multi_key> <a> : \"1\"\n<Multi_key> <a> <b> : \"2\"\n",
    );
    let shadows = of_kind(&findings, FindingKind::PrefixShadowing);

    assert_eq!(shadows.len(), 3);
    // Sorted by the shadowing line, then the shadowed line
    let pairs: Vec<(usize, usize)> = shadows
        .iter()
        .map(|f| match &f.details {
            FindingDetails::Shadowing {
                shadowing_line,
                shadowed_line,
                ..
            } => (*shadowing_line, *shadowed_line),
            other => panic!("unexpected details {:?}", other),
        })
        .collect();
    assert_eq!(pairs, vec![(2, 1), (2, 3), (3, 1)]);
}

#[test]
fn test_shadowing_order_independent_of_file_order() {
    let findings = detect("<Multi_key> <m> <1> <2> : \"y\"\n<Multi_key> <m> <1> : \"x\"\n");
    let shadows = of_kind(&findings, FindingKind::PrefixShadowing);

    assert_eq!(shadows.len(), 1);
    assert_eq!(shadows[0].line_number, 2);
}

#[test]
fn test_shadowing_uses_first_definition_once() {
    let findings = detect(
        "<Multi_key> <m> : \"x\"\n<Multi_key> <m> : \"x\"\n<Multi_key> <m> <1> : \"y\"\n",
    );

    assert_eq!(of_kind(&findings, FindingKind::PrefixShadowing).len(), 1);
    assert_eq!(of_kind(&findings, FindingKind::DuplicateHarmless).len(), 1);
}

#[test]
fn test_trie_and_pairwise_agree() {
    let content = "\
<Multi_key> <a> : \"1\"
<Multi_key> <a> <b> : \"2\"
<Multi_key> <a> <b> <c> : \"3\"
<Multi_key> <a> <c> : \"4\"
<Multi_key> <b> : \"5\"
<Multi_key> <b> <a> : \"6\"
<Multi_key> <c> <a> : \"7\"
";
    let table = parse_content(content);

    let trie = detector().with_scan(Box::new(TrieScan)).find_shadowing(&table);
    let pairwise = detector().with_scan(Box::new(PairwiseScan)).find_shadowing(&table);

    assert_eq!(trie, pairwise);
    assert_eq!(trie.len(), 5);
}

#[test]
fn test_syntax_and_unrecognized_lines() {
    let findings = detect("<Multi_key> <g> <a> \"α\"\nxkb garbage\n");

    let syntax = of_kind(&findings, FindingKind::SyntaxError);
    assert_eq!(syntax.len(), 1);
    assert_eq!(syntax[0].severity, Severity::Error);
    assert_eq!(syntax[0].message, "Missing colon separator");
    assert_eq!(
        syntax[0].details,
        FindingDetails::Line {
            line: "<Multi_key> <g> <a> \"α\"".to_string()
        }
    );

    let unrecognized = of_kind(&findings, FindingKind::UnrecognizedLine);
    assert_eq!(unrecognized.len(), 1);
    assert_eq!(unrecognized[0].severity, Severity::Warning);
    assert_eq!(unrecognized[0].line_number, 2);
}

#[test]
fn test_codepoint_findings_surface_in_detector() {
    let ok = detect("<Multi_key> <m> <1> : \"é\" U00E9\n");
    assert!(of_kind(&ok, FindingKind::CodepointMismatch).is_empty());

    let bad = detect("<Multi_key> <m> <1> : \"é\" U0041\n");
    let mismatches = of_kind(&bad, FindingKind::CodepointMismatch);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].severity, Severity::Warning);
}

#[test]
fn test_suspicious_keys() {
    let findings = detect("<Multi_key> <a b> : \"x\"\n<Multi_key> <abcdefghijklmnopqrstuvwxyz> : \"y\"\n");
    let suspicious = of_kind(&findings, FindingKind::SuspiciousKey);

    assert_eq!(suspicious.len(), 2);
    assert!(suspicious[0].message.contains("Key contains space"));
    assert!(suspicious[1].message.contains("Unusually long key name"));
}

#[test]
fn test_comment_checks() {
    let content = "\
<Multi_key> <g> <a> : \"α\"
<Multi_key> <g> <b> : \"β\" # [MNEMONIC]
<Multi_key> <g> <c> : \"χ\" # chi
<Multi_key> <g> <d> : \"δ\" # [MNEMONIC] delta
";
    let table = parse_content(content);
    let findings = ConflictDetector::new().detect(&table);

    assert_eq!(of_kind(&findings, FindingKind::MissingComment).len(), 1);
    assert_eq!(of_kind(&findings, FindingKind::EmptyDescription).len(), 1);
    assert!(
        of_kind(&findings, FindingKind::UntaggedComment).is_empty(),
        "Untagged comments are verbose-only"
    );

    let verbose = ConflictDetector::with_settings(DetectorSettings {
        verbose: true,
        ..DetectorSettings::default()
    })
    .detect(&table);

    assert_eq!(of_kind(&verbose, FindingKind::UntaggedComment).len(), 1);
    let progress = of_kind(&verbose, FindingKind::TaggingProgress);
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].line_number, 0);
    assert_eq!(progress[0].message, "Comment tagging: 2/3 (66.7%) tagged");
}

#[test]
fn test_has_conflict() {
    let table = parse_content("<Multi_key> <g> <a> : \"α\"\n<Multi_key> <g> <a> : \"β\"\n");
    let detector = ConflictDetector::new();

    assert!(detector.has_conflict(&table, &KeyPath::new(vec!["g".into(), "a".into()])));
    assert!(!detector.has_conflict(&table, &KeyPath::new(vec!["g".into()])));
}

#[test]
fn test_detect_conflicts_runs_all_passes() {
    let table = parse_content("<Multi_key> <m> <1> : \"x\" # [ICONIC] x\n<Multi_key> <m> <1> <2> : \"y\" # [ICONIC] y\n");
    let findings = detect_conflicts(&table);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].kind, FindingKind::PrefixShadowing);
}
