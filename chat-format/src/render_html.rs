//! HTML fragment renderer.
//!
//! Produces semantic HTML with `chatfmt-*` CSS classes. All text is
//! HTML-escaped. `markdown_to_html` is the alternative path for callers that
//! want full CommonMark rendering through `pulldown-cmark` instead of the
//! line heuristics.

use crate::preview::PreviewState;
use crate::types::{Block, FormattedText, RenderOptions};

/// Render a markdown string to HTML using pulldown-cmark with GFM extensions.
pub fn markdown_to_html(content: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_TABLES);
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);
    options.insert(pulldown_cmark::Options::ENABLE_TASKLISTS);
    let parser = pulldown_cmark::Parser::new_ext(content, options);
    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
}

/// Configuration for full-page HTML rendering.
#[derive(Debug, Clone, Default)]
pub struct PageConfig {
    /// Page title. Falls back to the first header, then "Chat transcript".
    pub title: Option<String>,
    /// Optional language code (default: "en").
    pub lang: Option<String>,
}

/// Render formatted text as an HTML fragment.
///
/// The blocks are wrapped in a `div.chatfmt` carrying the variant class and
/// the color token.
pub fn to_html(doc: &FormattedText, options: &RenderOptions) -> String {
    let body: Vec<String> = doc.blocks.iter().map(render_block).collect();
    wrap(&body.join("\n"), options)
}

/// Render the visible part of a preview, plus the toggle control when the
/// text is long enough to be truncated.
pub fn to_html_preview(state: &PreviewState, options: &RenderOptions) -> String {
    let result = state.format();
    let mut html = to_html(&result.doc, options);
    if let Some(label) = state.toggle_label() {
        html.push_str(&format!(
            "\n<button type=\"button\" class=\"chatfmt-toggle\" aria-expanded=\"{}\">{}</button>",
            state.is_expanded(),
            label
        ));
    }
    html
}

/// Render the message shown in place of content for unusable input.
pub fn render_diagnostic(message: &str, options: &RenderOptions) -> String {
    wrap(
        &format!(
            "<p class=\"chatfmt-error\" role=\"alert\">{}</p>",
            escape_html(message)
        ),
        options,
    )
}

/// Render formatted text as a complete standalone HTML page.
pub fn to_html_page(doc: &FormattedText, options: &RenderOptions, config: &PageConfig) -> String {
    let body = to_html(doc, options);
    page(&body, &page_title(doc, config), config)
}

/// Wrap an already-rendered fragment in a standalone page.
pub fn page(body: &str, title: &str, config: &PageConfig) -> String {
    let lang = config.lang.as_deref().unwrap_or("en");
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="generator" content="chatfmt">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
<main class="chatfmt-page">
{body}
</main>
</body>
</html>"#,
        lang = escape_html(lang),
        title = escape_html(title),
        css = CHATFMT_CSS,
        body = body,
    )
}

fn page_title(doc: &FormattedText, config: &PageConfig) -> String {
    config
        .title
        .clone()
        .or_else(|| {
            doc.blocks.iter().find_map(|b| match b {
                Block::Header { content, .. } => Some(content.clone()),
                _ => None,
            })
        })
        .unwrap_or_else(|| "Chat transcript".to_string())
}

fn wrap(inner: &str, options: &RenderOptions) -> String {
    format!(
        "<div class=\"chatfmt chatfmt-{}\" style=\"color: {}\">\n{}\n</div>",
        options.variant,
        escape_html(&css_color(&options.color)),
        inner
    )
}

/// Map a color token to a CSS value.
///
/// Dotted theme tokens (`text.secondary`) become CSS custom properties
/// (`var(--text-secondary)`); anything else is passed through.
fn css_color(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        "inherit".to_string()
    } else if token.contains('.') && !token.starts_with('#') {
        format!("var(--{})", token.replace('.', "-"))
    } else {
        token.to_string()
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Header { content, .. } => {
            format!("<h6 class=\"chatfmt-header\">{}</h6>", escape_html(content))
        }

        Block::Paragraph { content, .. } => {
            format!("<p class=\"chatfmt-paragraph\">{}</p>", escape_html(content))
        }

        Block::NumberedList { items, .. } => {
            let lis: Vec<String> = items
                .iter()
                .map(|item| {
                    format!(
                        "<li value=\"{}\">{}</li>",
                        item.number,
                        escape_html(&item.content)
                    )
                })
                .collect();
            format!("<ol class=\"chatfmt-numbered\">\n{}\n</ol>", lis.join("\n"))
        }

        Block::BulletList { items, .. } => {
            let lis: Vec<String> = items
                .iter()
                .map(|item| format!("<li>{}</li>", escape_html(item)))
                .collect();
            format!("<ul class=\"chatfmt-bulleted\">\n{}\n</ul>", lis.join("\n"))
        }

        Block::Code { content, .. } => format!(
            "<pre class=\"chatfmt-code\"><code>{}</code></pre>",
            escape_html(content)
        ),
    }
}

const CHATFMT_CSS: &str = r#"
:root { --text-primary: #1f2933; --text-secondary: #52606d; --code-bg: #f5f7fa; --code-border: #d9e2ec; }
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; background: #fff; }
.chatfmt-page { max-width: 760px; margin: 2rem auto; padding: 0 1rem; }
.chatfmt { line-height: 1.6; }
.chatfmt-body1 { font-size: 1rem; }
.chatfmt-body2 { font-size: 0.875rem; }
.chatfmt-caption { font-size: 0.75rem; opacity: 0.8; }
.chatfmt-header { font-size: 1.1em; font-weight: 700; margin: 1em 0 0.5em; }
.chatfmt-paragraph { margin: 0 0 0.75em; }
.chatfmt-numbered, .chatfmt-bulleted { margin: 0 0 0.75em; padding-left: 1.75em; }
.chatfmt-bulleted { list-style: "\2022  "; }
.chatfmt-code { margin: 0; padding: 0.15em 0.75em; font-family: ui-monospace, "SFMono-Regular", Menlo, monospace; font-size: 0.9em; white-space: pre; overflow-x: auto; background: var(--code-bg); border-left: 3px solid var(--code-border); }
.chatfmt-error { color: #b00020; font-weight: 600; }
.chatfmt-toggle { margin-top: 0.5em; border: none; background: none; color: #1565c0; cursor: pointer; padding: 0; }
"#;
