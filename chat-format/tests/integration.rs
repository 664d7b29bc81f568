//! Integration tests that format complete fixture answers end-to-end.

use chat_format::{Block, NumberedItem, RenderOptions, Severity, TextVariant};
use pretty_assertions::assert_eq;

fn fixtures_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/fixtures")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture '{}': {}", path.display(), e))
}

fn kinds(blocks: &[Block]) -> Vec<&'static str> {
    blocks.iter().map(Block::kind_name).collect()
}

#[test]
fn technical_answer_fixture() {
    let result = chat_format::parse(&read_fixture("technical_answer.txt"));
    assert!(result.diagnostics.is_empty());
    assert_eq!(
        kinds(&result.doc.blocks),
        vec![
            "header",
            "paragraph",
            "header",
            "bullet_list",
            "header",
            "numbered_list",
            "code",
        ]
    );

    match &result.doc.blocks[3] {
        Block::BulletList { items, span } => {
            assert_eq!(items.len(), 3);
            assert_eq!(items[0], "Pressure sensor on the main gallery");
            assert_eq!(span.start_line, 5);
            assert_eq!(span.end_line, 7);
        }
        other => panic!("Expected BulletList, got {other:?}"),
    }

    match &result.doc.blocks[6] {
        Block::Code { content, .. } => assert_eq!(content, "    threshold = 2.5"),
        other => panic!("Expected Code, got {other:?}"),
    }

    assert!(result.doc.check().is_empty(), "{:?}", result.doc.check());
}

#[test]
fn code_answer_fixture() {
    let result = chat_format::parse(&read_fixture("code_answer.txt"));
    assert_eq!(
        kinds(&result.doc.blocks),
        vec!["header", "paragraph", "code", "code", "code"]
    );
    let md = result.doc.to_markdown();
    assert!(
        md.contains("```\ndef reverse(s):\n    return s[::-1]\n```"),
        "adjacent code lines should share a fence: {md}"
    );
}

#[test]
fn mixed_markers_fixture() {
    let result = chat_format::parse(&read_fixture("mixed_markers.txt"));
    assert_eq!(
        kinds(&result.doc.blocks),
        vec![
            "numbered_list",
            "bullet_list",
            "numbered_list",
            "paragraph",
            "bullet_list",
            "code",
        ]
    );

    let diagnostics = result.doc.check();
    let codes: Vec<&str> = diagnostics
        .iter()
        .filter_map(|d| d.code.as_deref())
        .collect();
    assert_eq!(codes, vec!["C004", "C003", "C001"]);
    assert!(diagnostics.iter().all(|d| d.severity != Severity::Error));
}

#[test]
fn history_entry_fixture_has_crlf() {
    let result = chat_format::parse(&read_fixture("history_entry.txt"));
    assert_eq!(kinds(&result.doc.blocks), vec!["paragraph", "paragraph"]);
    assert!(!result.doc.source.contains('\r'));
}

// ------------------------------------------------------------------
// Documented properties
// ------------------------------------------------------------------

#[test]
fn title_header() {
    assert_eq!(
        chat_format::format_blocks("**Title**"),
        vec![Block::Header {
            content: "Title".into(),
            span: chat_format::Span::line(1),
        }]
    );
}

#[test]
fn numbered_pair_is_one_group() {
    let blocks = chat_format::format_blocks("1. foo\n2. bar");
    assert_eq!(blocks.len(), 1);
    match &blocks[0] {
        Block::NumberedList { items, .. } => assert_eq!(
            items,
            &vec![
                NumberedItem {
                    number: 1,
                    content: "foo".into()
                },
                NumberedItem {
                    number: 2,
                    content: "bar".into()
                },
            ]
        ),
        other => panic!("Expected NumberedList, got {other:?}"),
    }
}

#[test]
fn kinds_do_not_merge_without_blank_line() {
    let blocks = chat_format::format_blocks("1. a\n• b");
    assert_eq!(kinds(&blocks), vec!["numbered_list", "bullet_list"]);
}

#[test]
fn plain_paragraph_is_idempotent() {
    let text = "Nothing special to see in this sentence";
    let first = chat_format::format_blocks(text);
    let second = chat_format::format_blocks(text);
    assert_eq!(first, second);
    assert_eq!(kinds(&first), vec!["paragraph"]);

    let md = chat_format::parse(text).doc.to_markdown();
    assert_eq!(chat_format::format_blocks(&md), first);
}

// ------------------------------------------------------------------
// Rendering through the public API
// ------------------------------------------------------------------

#[test]
fn invalid_input_renders_visible_message() {
    let result = chat_format::parse_value(&serde_json::json!({ "text": "hi" }));
    let options = RenderOptions::default();

    let html = result.to_html(&options);
    assert!(html.contains("chatfmt-error"), "{html}");
    assert!(html.contains("an object"), "{html}");

    let md = result.to_markdown();
    assert!(md.contains("Format error"), "{md}");

    let page = result.to_html_page(&options, &chat_format::PageConfig::default());
    assert!(page.contains("<!DOCTYPE html>"));
    assert!(page.contains("role=\"alert\""));
}

#[test]
fn absent_input_renders_nothing() {
    let result = chat_format::parse_value(&serde_json::Value::Null);
    let md = result.to_markdown();
    assert_eq!(md, "");
    assert!(result.all_diagnostics().is_empty());
}

#[test]
fn cleaned_answer_formats_into_lists() {
    let raw = "Based on the provided context, here is the answer.\n**Checks**\n- oil level\n- filter\n1. Stop pump\n2. Inspect seal";
    let cleaned = chat_format::ResponseFormatter::default()
        .format_response(raw, chat_format::Intent::Technical);
    let blocks = chat_format::format_blocks(&cleaned);
    assert_eq!(kinds(&blocks), vec!["header", "bullet_list", "numbered_list"]);
}

#[test]
fn preview_then_format() {
    let long = format!("**Answer**\n{}", "word ".repeat(400));
    let mut state = chat_format::PreviewState::with_default_budget(long.clone());
    assert!(state.is_expandable());

    let collapsed = state.format();
    let html = collapsed.to_html(&RenderOptions::new(TextVariant::Body2, "text.primary"));
    assert!(html.contains("..."));

    state.toggle();
    assert_eq!(state.visible_text(), long);
}
