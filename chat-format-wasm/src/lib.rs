//! WASM bindings for `chat-format`.
//!
//! Exposes the answer formatter to the chat UI via wasm-bindgen.
//! Call `format()` with a string to get the blocks as JSON, or use
//! `render_html()` / `render_markdown()` for rendered output.

use chat_format::{Intent, PreviewState, RenderOptions, ResponseFormatter, TextVariant};
use wasm_bindgen::prelude::*;

fn result_json(result: &chat_format::ParseResult) -> String {
    serde_json::json!({
        "doc": result.doc,
        "diagnostics": result.all_diagnostics(),
    })
    .to_string()
}

fn options(variant: Option<String>, color: Option<String>) -> RenderOptions {
    // Unknown variants fall back to body1 rather than failing the render.
    let variant = variant
        .as_deref()
        .and_then(|v| v.parse::<TextVariant>().ok())
        .unwrap_or_default();
    match color {
        Some(color) => RenderOptions::new(variant, color),
        None => RenderOptions {
            variant,
            ..Default::default()
        },
    }
}

/// Format a chat answer and return the blocks as JSON.
///
/// Returns a JSON object with `{ doc, diagnostics }`.
/// `doc.blocks` is the ordered list of header, paragraph, bullet_list,
/// numbered_list and code blocks.
#[wasm_bindgen]
pub fn format(input: &str) -> String {
    result_json(&chat_format::parse(input))
}

/// Format whatever value the caller holds.
///
/// Strings are formatted, `null`/`undefined` yield no blocks, and any other
/// value yields an invalid-input diagnostic instead of throwing.
#[wasm_bindgen]
pub fn format_value(value: JsValue) -> String {
    let value = if value.is_undefined() {
        serde_json::Value::Null
    } else {
        serde_wasm_bindgen::from_value::<serde_json::Value>(value)
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default()))
    };
    result_json(&chat_format::parse_value(&value))
}

/// Format a chat answer and return an HTML fragment.
///
/// The output uses `chatfmt-*` CSS classes inside a `div.chatfmt` wrapper.
#[wasm_bindgen]
pub fn render_html(input: &str, variant: Option<String>, color: Option<String>) -> String {
    chat_format::parse(input).to_html(&options(variant, color))
}

/// Render the preview of a long answer, with its "Show more"/"Show less"
/// toggle button.
#[wasm_bindgen]
pub fn render_preview_html(input: &str, budget: Option<usize>, expanded: bool) -> String {
    let budget = budget.unwrap_or(chat_format::DEFAULT_PREVIEW_LENGTH);
    let mut state = PreviewState::new(input, budget);
    if expanded {
        state.toggle();
    }
    chat_format::render_html::to_html_preview(&state, &RenderOptions::default())
}

/// Format a chat answer and return CommonMark markdown.
#[wasm_bindgen]
pub fn render_markdown(input: &str) -> String {
    chat_format::parse(input).to_markdown()
}

/// Clean up a raw model answer for the given intent
/// (`technical`, `code`, `document_query` or `general`).
#[wasm_bindgen]
pub fn clean_response(input: &str, intent: Option<String>) -> String {
    let intent = intent
        .as_deref()
        .and_then(|i| i.parse::<Intent>().ok())
        .unwrap_or_default();
    ResponseFormatter::default().format_response(input, intent)
}
