//! Integration tests for the `chatfmt` binary.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn chatfmt_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_chatfmt"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("chatfmt-cli-test").join(name);
    // Clean up from previous runs
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Run chatfmt in `cwd` with colors off.
fn run(cwd: &PathBuf, args: &[&str]) -> Output {
    Command::new(chatfmt_bin())
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run chatfmt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn render_markdown_fixture() {
    let cwd = temp_dir("render-md");
    let file = fixture("technical_answer.txt");
    let output = run(&cwd, &["render", file.to_str().unwrap(), "--format", "markdown"]);

    assert!(output.status.success());
    let md = stdout(&output);
    assert!(md.contains("**Lubrication Monitoring**"), "{md}");
    assert!(md.contains("- Pressure sensor on the main gallery"), "{md}");
    assert!(md.contains("1. Isolate the pump\n2. Drain the sump"), "{md}");
}

#[test]
fn render_json_lists_blocks() {
    let cwd = temp_dir("render-json");
    let file = fixture("code_answer.txt");
    let output = run(&cwd, &["render", file.to_str().unwrap(), "--format", "json"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let blocks = value["doc"]["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 5);
    assert_eq!(blocks[0]["kind"], "header");
    assert_eq!(blocks[2]["kind"], "code");
}

#[test]
fn render_reads_stdin() {
    let cwd = temp_dir("render-stdin");
    let mut child = Command::new(chatfmt_bin())
        .args(["render", "-", "--format", "html", "--variant", "caption"])
        .current_dir(&cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to run chatfmt");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"**Title**\n\xe2\x80\xa2 one\n\xe2\x80\xa2 two\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let html = stdout(&output);
    assert!(html.contains("chatfmt-caption"), "{html}");
    assert!(html.contains("<h6 class=\"chatfmt-header\">Title</h6>"), "{html}");
    assert!(html.contains("<li>two</li>"), "{html}");
}

#[test]
fn render_unknown_variant_fails() {
    let cwd = temp_dir("render-variant");
    let file = fixture("history_entry.txt");
    let output = run(&cwd, &["render", file.to_str().unwrap(), "--variant", "huge"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown text variant"));
}

#[test]
fn render_markdown_engine() {
    let cwd = temp_dir("render-engine");
    let file = cwd.join("table.md");
    fs::write(&file, "| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
    let output = run(
        &cwd,
        &["render", file.to_str().unwrap(), "--format", "html", "--engine", "markdown"],
    );

    assert!(output.status.success());
    assert!(stdout(&output).contains("<table>"));
}

#[test]
fn check_reports_heuristic_findings() {
    let cwd = temp_dir("check-mixed");
    let file = fixture("mixed_markers.txt");
    let output = run(&cwd, &["check", file.to_str().unwrap()]);

    // Warnings and info do not fail the check.
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[C004]"), "{out}");
    assert!(out.contains("[C001]"), "{out}");
}

#[test]
fn check_clean_file_is_ok() {
    let cwd = temp_dir("check-ok");
    let file = fixture("technical_answer.txt");
    let output = run(&cwd, &["check", file.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("OK"));
}

#[test]
fn check_non_string_json_fails() {
    let cwd = temp_dir("check-json");
    let file = cwd.join("entry.json");
    fs::write(&file, "42").unwrap();
    let output = run(&cwd, &["check", file.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("[F001]"), "{out}");
    assert!(out.contains("got a number"), "{out}");
}

#[test]
fn render_non_string_json_shows_message() {
    let cwd = temp_dir("render-json-input");
    let file = cwd.join("entry.json");
    fs::write(&file, "[1, 2]").unwrap();
    let output = run(&cwd, &["render", file.to_str().unwrap(), "--format", "markdown"]);

    assert!(output.status.success());
    let md = stdout(&output);
    assert!(md.contains("Format error"), "{md}");
    assert!(md.contains("got an array"), "{md}");
    assert!(!md.contains("[1, 2]"), "{md}");
}

#[test]
fn render_string_json_is_formatted() {
    let cwd = temp_dir("render-json-string");
    let file = cwd.join("entry.json");
    fs::write(&file, r#""**Saved**\n1. one""#).unwrap();
    let output = run(&cwd, &["render", file.to_str().unwrap(), "--format", "markdown"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "**Saved**\n\n1. one");
}

#[test]
fn preview_truncates_and_expands() {
    let cwd = temp_dir("preview");
    let file = cwd.join("long.txt");
    fs::write(&file, "abcdefghij klmno").unwrap();

    let output = run(&cwd, &["preview", file.to_str().unwrap(), "--length", "10"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "abcdefghij...");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Show more"));

    let output = run(
        &cwd,
        &["preview", file.to_str().unwrap(), "--length", "10", "--full"],
    );
    assert_eq!(stdout(&output).trim_end(), "abcdefghij klmno");
}

#[test]
fn preview_length_from_config() {
    let cwd = temp_dir("preview-config");
    fs::write(cwd.join("chatfmt.json"), r#"{ "previewLength": 5 }"#).unwrap();
    let file = cwd.join("a.txt");
    fs::write(&file, "abcdefghij").unwrap();

    let output = run(&cwd, &["preview", file.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim_end(), "abcde...");
}

#[test]
fn clean_technical_answer() {
    let cwd = temp_dir("clean");
    let file = cwd.join("raw.txt");
    fs::write(
        &file,
        "Based on the provided context, the pump needs care.\n**Checks**\n- oil level\n* filter",
    )
    .unwrap();

    let output = run(&cwd, &["clean", file.to_str().unwrap(), "--intent", "technical"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim_end(),
        "**Checks**\n\u{2022} oil level\n\u{2022} filter"
    );
}

#[test]
fn build_then_rebuild() {
    let root = temp_dir("build");
    let src = root.join("answers");
    fs::create_dir_all(&src).unwrap();
    fs::copy(fixture("technical_answer.txt"), src.join("technical.txt")).unwrap();
    fs::copy(fixture("code_answer.txt"), src.join("code.txt")).unwrap();
    let out = root.join("site");

    let output = run(
        &root,
        &["build", src.to_str().unwrap(), "--out", out.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("2 created"));

    let page = fs::read_to_string(out.join("technical.txt.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>Lubrication Monitoring</title>"));

    let output = run(
        &root,
        &["build", src.to_str().unwrap(), "--out", out.to_str().unwrap()],
    );
    assert!(stdout(&output).contains("2 unchanged"));

    let _ = fs::remove_dir_all(&root);
}
