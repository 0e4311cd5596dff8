//! Adds `[ICONIC]`/`[MNEMONIC]` tags to untagged comments
//!
//! Only sequence lines that already carry a comment, have no tag yet and
//! get a suggestion from the heuristic are rewritten, as
//! `<sequence part>  # [TAG] <comment>`. Every other line, including its
//! line ending, comes back byte-identical.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::config::{read_compose_file, ConfigError};
use crate::core::parser::comment_offset;
use crate::core::stats::suggest_tag;
use crate::core::tokenizer::{HeaderState, LineClass, LineClassifier};
use crate::core::types::TypeTag;

/// One rewritten line
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct TagChange {
    pub line_number: usize,
    pub before: String,
    pub after: String,
    pub tag: TypeTag,
}

/// Tally of a tagging pass
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TagCounts {
    pub iconic: usize,
    pub mnemonic: usize,
    pub already_tagged: usize,
    /// Untagged comments with no suggestion (variants)
    pub unclassified: usize,
}

impl TagCounts {
    pub fn added(&self) -> usize {
        self.iconic + self.mnemonic
    }
}

/// Rewritten content plus what changed
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TagOutcome {
    pub content: String,
    pub changes: Vec<TagChange>,
    pub counts: TagCounts,
}

impl TagOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Tags every untagged, commented sequence line the heuristic can classify
pub fn retag_content(content: &str) -> TagOutcome {
    let classifier = LineClassifier::new();
    let mut state = HeaderState::default();
    let mut outcome = TagOutcome {
        content: String::with_capacity(content.len() + content.len() / 8),
        ..TagOutcome::default()
    };

    for (index, piece) in content.split_inclusive('\n').enumerate() {
        let line_number = index + 1;
        let (line, ending) = split_line_ending(piece);

        let (next, class) = classifier.classify(state, line_number, line);
        state = next;

        let rewritten = match class {
            LineClass::Sequence(sequence) if sequence.comment.is_some() || sequence.tag.is_some() => {
                match (sequence.tag, sequence.comment.as_deref(), suggest_tag(&sequence)) {
                    (Some(_), _, _) => {
                        outcome.counts.already_tagged += 1;
                        None
                    }
                    (None, Some(comment), Some(tag)) => tag_line(line, comment, tag),
                    (None, _, None) => {
                        outcome.counts.unclassified += 1;
                        None
                    }
                    (None, None, Some(_)) => None,
                }
            }
            _ => None,
        };

        match rewritten {
            Some((after, tag)) => {
                match tag {
                    TypeTag::Iconic => outcome.counts.iconic += 1,
                    TypeTag::Mnemonic => outcome.counts.mnemonic += 1,
                }
                outcome.content.push_str(&after);
                outcome.content.push_str(ending);
                outcome.changes.push(TagChange {
                    line_number,
                    before: line.to_string(),
                    after,
                    tag,
                });
            }
            None => outcome.content.push_str(piece),
        }
    }

    debug!(
        added = outcome.counts.added(),
        already_tagged = outcome.counts.already_tagged,
        "tagging pass"
    );

    outcome
}

/// Computes the tagging pass for a file on disk without touching it
///
/// Nothing is created or written, not even the backup directory; pass
/// the outcome to `ComposeTransaction::commit_preserving` to apply it.
pub fn retag_file(path: &Path) -> Result<TagOutcome, ConfigError> {
    let content = read_compose_file(path)?;
    Ok(retag_content(&content))
}

/// Builds the tagged form of a line, keeping leading indentation
fn tag_line(line: &str, comment: &str, tag: TypeTag) -> Option<(String, TypeTag)> {
    let hash = comment_offset(line)?;
    let head = line[..hash].trim_end();
    Some((format!("{}  # [{}] {}", head, tag, comment), tag))
}

fn split_line_ending(piece: &str) -> (&str, &str) {
    if let Some(line) = piece.strip_suffix("\r\n") {
        (line, "\r\n")
    } else if let Some(line) = piece.strip_suffix('\n') {
        (line, "\n")
    } else {
        (piece, "")
    }
}
