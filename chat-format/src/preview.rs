//! Preview truncation for long answers.
//!
//! Long texts are cut to a character budget before block parsing, preferring
//! a whitespace boundary near the end of the budget. [`PreviewState`] holds
//! the expand/collapse toggle the chat view shows under a truncated answer.

use std::borrow::Cow;

use crate::parse::{ParseResult, parse};

/// Default preview budget, in characters.
pub const DEFAULT_PREVIEW_LENGTH: usize = 1200;

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// A whitespace cut is only taken when it falls past this share of the budget.
const WORD_BOUNDARY_RATIO: f64 = 0.8;

/// Outcome of [`truncate_preview`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    pub truncated: bool,
}

/// Cut `text` to at most `budget` characters plus [`ELLIPSIS`].
///
/// Text that already fits is returned unchanged. Otherwise the cut happens at
/// the last whitespace inside the budget if that whitespace lies beyond 80% of
/// the budget, and exactly at the budget if not.
pub fn truncate_preview(text: &str, budget: usize) -> Preview {
    let Some((cut, _)) = text.char_indices().nth(budget) else {
        return Preview {
            text: text.to_string(),
            truncated: false,
        };
    };
    let head = &text[..cut];

    let last_space = head
        .char_indices()
        .enumerate()
        .filter(|(_, (_, c))| c.is_whitespace())
        .last()
        .map(|(char_idx, (byte_idx, _))| (char_idx, byte_idx));

    let kept = match last_space {
        Some((char_idx, byte_idx)) if char_idx as f64 > budget as f64 * WORD_BOUNDARY_RATIO => {
            &head[..byte_idx]
        }
        _ => head,
    };

    Preview {
        text: format!("{kept}{ELLIPSIS}"),
        truncated: true,
    }
}

/// Expand/collapse state for one rendered answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewState {
    text: String,
    budget: usize,
    expanded: bool,
}

impl PreviewState {
    pub fn new(text: impl Into<String>, budget: usize) -> Self {
        Self {
            text: text.into(),
            budget,
            expanded: false,
        }
    }

    pub fn with_default_budget(text: impl Into<String>) -> Self {
        Self::new(text, DEFAULT_PREVIEW_LENGTH)
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the text is long enough for truncation to apply.
    pub fn is_expandable(&self) -> bool {
        self.text.chars().count() > self.budget
    }

    /// Flip between truncated and full rendering; returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    /// Label for the toggle control, or `None` when nothing is truncated.
    pub fn toggle_label(&self) -> Option<&'static str> {
        if !self.is_expandable() {
            None
        } else if self.expanded {
            Some("Show less")
        } else {
            Some("Show more")
        }
    }

    /// The text that should currently be displayed.
    pub fn visible_text(&self) -> Cow<'_, str> {
        if self.expanded {
            return Cow::Borrowed(&self.text);
        }
        let preview = truncate_preview(&self.text, self.budget);
        if preview.truncated {
            Cow::Owned(preview.text)
        } else {
            Cow::Borrowed(&self.text)
        }
    }

    /// Format the currently visible text into blocks.
    pub fn format(&self) -> ParseResult {
        parse(&self.visible_text())
    }
}
