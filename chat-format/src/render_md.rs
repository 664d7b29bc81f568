//! Markdown renderer.
//!
//! Converts formatted text back into CommonMark. Headers become bold lines,
//! bullets become `-` items, and runs of adjacent code lines share one fenced
//! block.

use crate::types::{Block, FormattedText};

/// Render formatted text as CommonMark markdown.
pub fn to_markdown(doc: &FormattedText) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut code_run: Vec<&str> = Vec::new();

    for block in &doc.blocks {
        if let Block::Code { content, .. } = block {
            code_run.push(content);
            continue;
        }
        flush_code(&mut code_run, &mut parts);
        parts.push(render_block(block));
    }
    flush_code(&mut code_run, &mut parts);

    parts.join("\n\n")
}

/// Render the message shown in place of content for unusable input.
pub fn render_diagnostic(message: &str) -> String {
    format!("> **Format error**: {message}")
}

fn flush_code(code_run: &mut Vec<&str>, parts: &mut Vec<String>) {
    if code_run.is_empty() {
        return;
    }
    parts.push(format!("```\n{}\n```", code_run.join("\n")));
    code_run.clear();
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Header { content, .. } => format!("**{content}**"),

        Block::Paragraph { content, .. } => content.clone(),

        Block::NumberedList { items, .. } => items
            .iter()
            .map(|item| format!("{}. {}", item.number, item.content))
            .collect::<Vec<_>>()
            .join("\n"),

        Block::BulletList { items, .. } => items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n"),

        Block::Code { content, .. } => format!("```\n{content}\n```"),
    }
}
