//! Heuristic checks over formatted text.
//!
//! The classifier is a handful of line heuristics, so some input is formatted in ways
//! the author probably did not intend. `check` points those spots out.
//! Returns a list of `Diagnostic` items (non-fatal).

use crate::classify::is_heuristic_code;
use crate::error::{Diagnostic, Severity};
use crate::types::{Block, FormattedText};

/// Check a formatted document and return any diagnostics.
///
/// This function never modifies the document.
pub fn check(doc: &FormattedText) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for block in &doc.blocks {
        check_block(block, &mut diagnostics);
    }
    diagnostics
}

fn check_block(block: &Block, diagnostics: &mut Vec<Diagnostic>) {
    let span = Some(block.span());
    match block {
        Block::Code { content, .. } => {
            if is_heuristic_code(content) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Info,
                    message: format!(
                        "Line treated as code by keyword or assignment match: '{}'",
                        content.trim()
                    ),
                    span,
                    code: Some("C001".into()),
                });
            }
        }

        Block::NumberedList { items, .. } => {
            let out_of_sequence = items
                .windows(2)
                .find(|pair| pair[1].number != pair[0].number.saturating_add(1));
            if let Some(pair) = out_of_sequence {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    message: format!(
                        "Numbered list jumps from {} to {}",
                        pair[0].number, pair[1].number
                    ),
                    span,
                    code: Some("C002".into()),
                });
            }
        }

        Block::BulletList { items, .. } => {
            let empty = items.iter().filter(|item| item.is_empty()).count();
            if empty > 0 {
                diagnostics.push(Diagnostic {
                    severity: Severity::Info,
                    message: format!("Bulleted list has {empty} empty item(s)"),
                    span,
                    code: Some("C003".into()),
                });
            }
        }

        Block::Paragraph { content, .. } => {
            if content.starts_with("**") {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    message: "Paragraph starts with '**' but is not a header".into(),
                    span,
                    code: Some("C004".into()),
                });
            }
        }

        Block::Header { .. } => {}
    }
}
