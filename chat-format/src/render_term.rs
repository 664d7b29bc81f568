//! ANSI terminal renderer.
//!
//! Produces colored terminal output using the `colored` crate. Headers are
//! bold, numbered items are aligned on their number column, and code lines sit
//! behind a dimmed gutter with their whitespace untouched.

use colored::{ColoredString, Colorize};

use crate::types::{Block, FormattedText, RenderOptions, TextVariant};

/// Render formatted text as ANSI-colored terminal text.
pub fn to_terminal(doc: &FormattedText, options: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();

    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 && matches!(block, Block::Header { .. }) {
            lines.push(String::new());
        }
        render_block(block, options, &mut lines);
    }

    lines.join("\n")
}

/// Render the message shown in place of content for unusable input.
pub fn render_diagnostic(message: &str) -> String {
    format!("{} {}", "[format error]".red().bold(), message)
}

fn render_block(block: &Block, options: &RenderOptions, lines: &mut Vec<String>) {
    match block {
        Block::Header { content, .. } => {
            lines.push(styled(content, options).bold().to_string());
        }

        Block::Paragraph { content, .. } => {
            lines.push(styled(content, options).to_string());
        }

        Block::NumberedList { items, .. } => {
            let width = items
                .iter()
                .map(|item| item.number.to_string().len())
                .max()
                .unwrap_or(1);
            for item in items {
                let marker = format!("{:>width$}.", item.number, width = width);
                lines.push(format!(
                    "{} {}",
                    marker.bold(),
                    styled(&item.content, options)
                ));
            }
        }

        Block::BulletList { items, .. } => {
            for item in items {
                lines.push(format!("{} {}", "\u{2022}".bold(), styled(item, options)));
            }
        }

        Block::Code { content, .. } => {
            let gutter = "\u{2502}".dimmed(); // │
            lines.push(format!("{gutter} {}", content.bright_white().on_black()));
        }
    }
}

/// Apply the variant and color token to body text.
fn styled(text: &str, options: &RenderOptions) -> ColoredString {
    let colored = apply_color(text, &options.color);
    match options.variant {
        TextVariant::Body1 => colored,
        TextVariant::Body2 => colored.italic(),
        TextVariant::Caption => colored.dimmed(),
    }
}

fn apply_color(text: &str, color: &str) -> ColoredString {
    match color {
        "" | "inherit" | "text.primary" => return text.normal(),
        "text.secondary" | "text.disabled" => return text.dimmed(),
        _ => {}
    }
    match color.rsplit('.').next().unwrap_or(color) {
        "red" | "error" => text.red(),
        "green" | "success" => text.green(),
        "yellow" | "warning" => text.yellow(),
        "blue" | "primary" | "info" => text.blue(),
        "cyan" => text.cyan(),
        "magenta" | "secondary" => text.magenta(),
        "disabled" | "muted" => text.dimmed(),
        _ => text.normal(),
    }
}
