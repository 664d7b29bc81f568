//! `chat-format`: formatter for assistant chat answers.
//!
//! Answers arrive as loosely structured text: `**Header**` lines, `•` bullets,
//! `1.` numbered steps, indented or code-looking lines, and prose. This crate
//! turns such text into an ordered list of display blocks and renders those
//! blocks for a terminal, as HTML, or back to markdown.
//!
//! # Quick start
//!
//! ```
//! let result = chat_format::parse("**Steps**\n1. Open valve\n2. Check gauge\n");
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(result.doc.blocks.len(), 2);
//! ```

pub mod check;
pub mod classify;
pub mod cleanup;
pub mod error;
pub mod parse;
pub mod preview;
pub mod render_html;
pub mod render_md;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod types;

pub use cleanup::{Intent, ResponseFormatter};
pub use error::*;
pub use parse::{ParseResult, format_blocks, parse, parse_value};
pub use preview::{DEFAULT_PREVIEW_LENGTH, Preview, PreviewState, truncate_preview};
pub use types::*;

pub use render_html::PageConfig;

impl FormattedText {
    /// Render as CommonMark markdown.
    pub fn to_markdown(&self) -> String {
        render_md::to_markdown(self)
    }

    /// Render as an HTML fragment with `chatfmt-*` CSS classes.
    pub fn to_html(&self, options: &RenderOptions) -> String {
        render_html::to_html(self, options)
    }

    /// Render as a complete standalone HTML page.
    pub fn to_html_page(&self, options: &RenderOptions, config: &PageConfig) -> String {
        render_html::to_html_page(self, options, config)
    }

    /// Render as ANSI-colored terminal text.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self, options: &RenderOptions) -> String {
        render_term::to_terminal(self, options)
    }

    /// Run the heuristic checks and return any diagnostics.
    pub fn check(&self) -> Vec<Diagnostic> {
        check::check(self)
    }
}

impl ParseResult {
    /// The diagnostic raised when the input was not text, if any.
    pub fn invalid_input(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_invalid_input())
    }

    /// Like [`FormattedText::to_markdown`], but shows a visible message for
    /// non-text input.
    pub fn to_markdown(&self) -> String {
        match self.invalid_input() {
            Some(diag) => render_md::render_diagnostic(&diag.message),
            None => self.doc.to_markdown(),
        }
    }

    /// Like [`FormattedText::to_html`], but shows a visible message for
    /// non-text input.
    pub fn to_html(&self, options: &RenderOptions) -> String {
        match self.invalid_input() {
            Some(diag) => render_html::render_diagnostic(&diag.message, options),
            None => self.doc.to_html(options),
        }
    }

    /// Like [`FormattedText::to_html_page`], but shows a visible message for
    /// non-text input.
    pub fn to_html_page(&self, options: &RenderOptions, config: &PageConfig) -> String {
        match self.invalid_input() {
            Some(diag) => {
                let body = render_html::render_diagnostic(&diag.message, options);
                let title = config.title.as_deref().unwrap_or("Chat transcript");
                render_html::page(&body, title, config)
            }
            None => self.doc.to_html_page(options, config),
        }
    }

    /// Like [`FormattedText::to_terminal`], but shows a visible message for
    /// non-text input.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self, options: &RenderOptions) -> String {
        match self.invalid_input() {
            Some(diag) => render_term::render_diagnostic(&diag.message),
            None => self.doc.to_terminal(options),
        }
    }

    /// Parse diagnostics followed by the heuristic check diagnostics.
    pub fn all_diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.diagnostics.clone();
        all.extend(self.doc.check());
        all
    }
}
