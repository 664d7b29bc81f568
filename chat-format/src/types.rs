use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// The result of one format pass over a text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedText {
    /// Display blocks, in the order their first line appeared in the input.
    pub blocks: Vec<Block>,
    /// Source text after CRLF normalisation.
    pub source: String,
}

impl FormattedText {
    /// `true` when formatting produced no blocks (empty, blank or absent input).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A formatted output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// A `**wrapped**` line, markers stripped.
    Header { content: String, span: Span },
    /// A plain line of body text, trimmed.
    Paragraph { content: String, span: Span },
    /// A run of consecutive `•` lines.
    BulletList { items: Vec<String>, span: Span },
    /// A run of consecutive `<digits>.` lines.
    NumberedList { items: Vec<NumberedItem>, span: Span },
    /// A single code-looking line, kept untrimmed.
    Code { content: String, span: Span },
}

impl Block {
    pub fn span(&self) -> Span {
        match self {
            Block::Header { span, .. }
            | Block::Paragraph { span, .. }
            | Block::BulletList { span, .. }
            | Block::NumberedList { span, .. }
            | Block::Code { span, .. } => *span,
        }
    }

    /// Short lowercase name of the block kind, as used in serialised output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Header { .. } => "header",
            Block::Paragraph { .. } => "paragraph",
            Block::BulletList { .. } => "bullet_list",
            Block::NumberedList { .. } => "numbered_list",
            Block::Code { .. } => "code",
        }
    }

    /// Visible text of the block without any list or header markers.
    pub fn visible_text(&self) -> Vec<&str> {
        match self {
            Block::Header { content, .. }
            | Block::Paragraph { content, .. }
            | Block::Code { content, .. } => vec![content.as_str()],
            Block::BulletList { items, .. } => items.iter().map(String::as_str).collect(),
            Block::NumberedList { items, .. } => {
                items.iter().map(|item| item.content.as_str()).collect()
            }
        }
    }
}

/// One entry of a numbered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedItem {
    pub number: u64,
    pub content: String,
}

/// Source line range covered by a block (1-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn line(line: usize) -> Self {
        Self {
            start_line: line,
            end_line: line,
        }
    }
}

/// Text size variant the surrounding view asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    /// Primary body text.
    #[default]
    Body1,
    /// Secondary, slightly smaller body text.
    Body2,
    /// Small muted text (history entries, footnotes).
    Caption,
}

impl TextVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            TextVariant::Body1 => "body1",
            TextVariant::Body2 => "body2",
            TextVariant::Caption => "caption",
        }
    }
}

impl fmt::Display for TextVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextVariant {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "body1" | "primary" => Ok(TextVariant::Body1),
            "body2" | "secondary" => Ok(TextVariant::Body2),
            "caption" => Ok(TextVariant::Caption),
            other => Err(FormatError::UnknownVariant(other.to_string())),
        }
    }
}

/// Rendering parameters shared by every back-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub variant: TextVariant,
    /// Color token, e.g. `text.primary`, `red` or `#333`.
    pub color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            variant: TextVariant::Body1,
            color: "text.primary".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn new(variant: TextVariant, color: impl Into<String>) -> Self {
        Self {
            variant,
            color: color.into(),
        }
    }
}
