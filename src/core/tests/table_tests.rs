use crate::core::parser::parse_content;
use crate::core::table::SequenceTable;
use crate::core::tokenizer::{RejectReason, RejectedLine};
use crate::core::types::{KeyPath, Sequence, UNCATEGORIZED};

fn sequence(keys: &[&str], symbol: &str, category: &str, line_number: usize) -> Sequence {
    Sequence {
        keys: keys.iter().map(|k| k.to_string()).collect(),
        symbol: symbol.to_string(),
        codepoint: None,
        comment: None,
        tag: None,
        category: category.to_string(),
        subcategory: None,
        line_number,
    }
}

fn path(keys: &[&str]) -> KeyPath {
    KeyPath::new(keys.iter().map(|k| k.to_string()).collect())
}

#[test]
fn test_empty_table() {
    let table = SequenceTable::new();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
    assert!(table.by_category().is_empty());
    assert!(table.first_definition(&path(&["g"])).is_none());
}

#[test]
fn test_insert_keeps_every_occurrence() {
    let mut table = SequenceTable::new();
    table.insert(sequence(&["g", "a"], "α", "GREEK", 1));
    table.insert(sequence(&["g", "a"], "β", "GREEK", 2));
    table.insert(sequence(&["g", "b"], "β", "GREEK", 3));

    assert_eq!(table.len(), 3);
    assert_eq!(table.distinct_len(), 2);

    let occurrences = table.by_key_path(&path(&["g", "a"]));
    assert_eq!(occurrences.len(), 2);
    assert_eq!(occurrences[0].line_number, 1);
    assert_eq!(occurrences[1].line_number, 2);

    let first = table.first_definition(&path(&["g", "a"])).unwrap();
    assert_eq!(first.symbol, "α", "First occurrence is the definition");
}

#[test]
fn test_categories_in_first_appearance_order() {
    let mut table = SequenceTable::new();
    table.insert(sequence(&["m"], "x", "MATH", 1));
    table.insert(sequence(&["g", "a"], "α", "GREEK", 2));
    table.insert(sequence(&["m", "2"], "y", "MATH", 3));

    assert_eq!(table.categories(), ["MATH".to_string(), "GREEK".to_string()]);

    let grouped = table.by_category();
    assert_eq!(grouped[0].0, "MATH");
    assert_eq!(
        grouped[0].1.iter().map(|s| s.line_number).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(table.category("GREEK").len(), 1);
    assert!(table.category("NONE").is_empty());
}

#[test]
fn test_key_path_groups_and_first_definitions() {
    let table = parse_content(
        "<Multi_key> <a> : \"1\"\n<Multi_key> <b> : \"2\"\n<Multi_key> <a> : \"3\"\n",
    );

    let groups = table.key_path_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0, &path(&["a"]));
    assert_eq!(groups[0].1.len(), 2);

    let firsts = table.first_definitions();
    assert_eq!(
        firsts.iter().map(|(_, s)| s.symbol.as_str()).collect::<Vec<_>>(),
        vec!["1", "2"]
    );
}

#[test]
fn test_rejected_lines_are_kept() {
    let mut table = SequenceTable::new();
    table.reject(RejectedLine {
        line_number: 4,
        text: "junk".to_string(),
        reason: RejectReason::Unrecognized,
    });

    assert!(table.is_empty());
    assert_eq!(table.rejected_lines().len(), 1);
    assert_eq!(table.rejected_lines()[0].line_number, 4);
}

#[test]
fn test_uncategorized_default() {
    let table = parse_content("<Multi_key> <a> : \"1\"\n");
    assert_eq!(table.categories(), [UNCATEGORIZED.to_string()]);
    assert_eq!(table.total_lines(), 1);
}
