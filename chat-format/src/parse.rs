use serde_json::Value;

use crate::classify::{LineKind, classify_line};
use crate::error::{Diagnostic, INVALID_INPUT, Severity};
use crate::types::{Block, FormattedText, NumberedItem, Span};

/// Result of formatting a text value.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// The formatted document.
    pub doc: FormattedText,
    /// Non-fatal diagnostics collected while formatting.
    pub diagnostics: Vec<Diagnostic>,
}

/// Format a text block into display blocks.
///
/// This function never panics and never fails: every line matches at least
/// the paragraph rule.
pub fn parse(input: &str) -> ParseResult {
    let source = input.replace("\r\n", "\n");
    let blocks = scan_lines(&source);
    log::debug!("formatted {} bytes into {} blocks", source.len(), blocks.len());

    ParseResult {
        doc: FormattedText { blocks, source },
        diagnostics: Vec::new(),
    }
}

/// Shorthand for `parse(input).doc.blocks`.
pub fn format_blocks(input: &str) -> Vec<Block> {
    parse(input).doc.blocks
}

/// Format a dynamically typed value, as handed over by a UI or JSON caller.
///
/// `null` is treated as empty input. Any other non-string value yields an
/// empty document plus an error diagnostic, so the caller can show a visible
/// message instead of crashing the page.
pub fn parse_value(value: &Value) -> ParseResult {
    match value {
        Value::String(text) => parse(text),
        Value::Null => ParseResult::default(),
        other => {
            let type_name = json_type_name(other);
            log::warn!("refusing to format non-text input of type {type_name}");
            ParseResult {
                doc: FormattedText::default(),
                diagnostics: vec![Diagnostic {
                    severity: Severity::Error,
                    message: format!("Expected text to format, got {type_name}"),
                    span: None,
                    code: Some(INVALID_INPUT.into()),
                }],
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ------------------------------------------------------------------
// Line scan
// ------------------------------------------------------------------

/// The list group currently being accumulated.
#[derive(Debug, Default)]
enum PendingGroup {
    #[default]
    None,
    Numbered {
        items: Vec<NumberedItem>,
        span: Span,
    },
    Bulleted {
        items: Vec<String>,
        span: Span,
    },
}

impl PendingGroup {
    /// Emit the pending group (if it holds anything) and reset to `None`.
    fn flush(&mut self, blocks: &mut Vec<Block>) {
        match std::mem::take(self) {
            PendingGroup::None => {}
            PendingGroup::Numbered { items, span } => {
                if !items.is_empty() {
                    log::trace!("flush numbered group of {} at line {}", items.len(), span.start_line);
                    blocks.push(Block::NumberedList { items, span });
                }
            }
            PendingGroup::Bulleted { items, span } => {
                if !items.is_empty() {
                    log::trace!("flush bulleted group of {} at line {}", items.len(), span.start_line);
                    blocks.push(Block::BulletList { items, span });
                }
            }
        }
    }

    fn push_numbered(&mut self, item: NumberedItem, line: usize, blocks: &mut Vec<Block>) {
        if !matches!(self, PendingGroup::Numbered { .. }) {
            self.flush(blocks);
            *self = PendingGroup::Numbered {
                items: Vec::new(),
                span: Span::line(line),
            };
        }
        if let PendingGroup::Numbered { items, span } = self {
            items.push(item);
            span.end_line = line;
        }
    }

    fn push_bulleted(&mut self, item: String, line: usize, blocks: &mut Vec<Block>) {
        if !matches!(self, PendingGroup::Bulleted { .. }) {
            self.flush(blocks);
            *self = PendingGroup::Bulleted {
                items: Vec::new(),
                span: Span::line(line),
            };
        }
        if let PendingGroup::Bulleted { items, span } = self {
            items.push(item);
            span.end_line = line;
        }
    }
}

/// Single pass over the lines, grouping list runs.
fn scan_lines(source: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    if source.is_empty() {
        return blocks;
    }

    let mut pending = PendingGroup::None;

    for (idx, line) in source.split('\n').enumerate() {
        let line_no = idx + 1;
        let kind = classify_line(line);
        log::trace!("line {line_no}: {}", kind.name());

        match kind {
            LineKind::Blank => pending.flush(&mut blocks),
            LineKind::Header(content) => {
                pending.flush(&mut blocks);
                blocks.push(Block::Header {
                    content: content.to_string(),
                    span: Span::line(line_no),
                });
            }
            LineKind::Numbered { number, content } => {
                let item = NumberedItem {
                    number,
                    content: content.to_string(),
                };
                pending.push_numbered(item, line_no, &mut blocks);
            }
            LineKind::Bullet(content) => {
                pending.push_bulleted(content.to_string(), line_no, &mut blocks);
            }
            LineKind::Code(raw) => {
                pending.flush(&mut blocks);
                blocks.push(Block::Code {
                    content: raw.to_string(),
                    span: Span::line(line_no),
                });
            }
            LineKind::Paragraph(content) => {
                pending.flush(&mut blocks);
                blocks.push(Block::Paragraph {
                    content: content.to_string(),
                    span: Span::line(line_no),
                });
            }
        }
    }

    pending.flush(&mut blocks);
    blocks
}
