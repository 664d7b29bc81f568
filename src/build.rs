//! `chatfmt build`: render a directory of saved answers into standalone HTML
//! pages.
//!
//! Every file under the source directory whose extension is listed in the
//! config becomes `<out>/<relative path>.html`. Pages whose rendered bytes
//! hash the same as the file already on disk are left alone, so rebuilding an
//! unchanged transcript directory touches nothing.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::config::FormatterConfig;
use chat_format::{PageConfig, RenderOptions, Severity};

/// Options passed from CLI to the build.
pub struct BuildOpts {
    pub source: PathBuf,
    pub out_dir: PathBuf,
    pub force: bool,
    pub quiet: bool,
}

/// Result status for a single rendered page.
#[derive(Debug, PartialEq)]
enum PageStatus {
    New,
    Updated,
    Unchanged,
}

/// Aggregate report from one build pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "========================================".dimmed());
        println!("{}", "Build complete!".green().bold());

        let mut parts = Vec::new();
        if self.created > 0 {
            parts.push(format!("{} created", self.created));
        }
        if self.updated > 0 {
            parts.push(format!("{} updated", self.updated));
        }
        if self.unchanged > 0 {
            parts.push(format!("{} unchanged", self.unchanged));
        }

        if parts.is_empty() {
            println!("Pages: none found");
        } else {
            println!("Pages: {} ({})", self.total(), parts.join(", "));
        }

        for w in &self.warnings {
            println!("{} {}", "WARNING:".yellow(), w);
        }
    }

    fn record(&mut self, status: PageStatus) {
        match status {
            PageStatus::New => self.created += 1,
            PageStatus::Updated => self.updated += 1,
            PageStatus::Unchanged => self.unchanged += 1,
        }
    }
}

/// Render every transcript file under `opts.source` into `opts.out_dir`.
pub fn run_build(opts: &BuildOpts, config: &FormatterConfig) -> Result<BuildReport> {
    let options = config.render_options(None, None)?;
    let sources = list_sources(&opts.source, &opts.out_dir, config)?;
    log::debug!(
        "building {} file(s) from {}",
        sources.len(),
        opts.source.display()
    );

    fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("Failed to create {}", opts.out_dir.display()))?;

    let mut report = BuildReport::default();
    for rel in &sources {
        let src_path = opts.source.join(rel);
        let dest_path = page_path(&opts.out_dir, rel);
        let status = build_page(&src_path, &dest_path, &options, opts.force, &mut report)?;

        if !opts.quiet {
            match status {
                PageStatus::New => {
                    println!("  {} {}", "+".green(), dest_path.display());
                }
                PageStatus::Updated => {
                    println!("  {} {}", "~".yellow(), dest_path.display());
                }
                PageStatus::Unchanged => {
                    log::debug!("unchanged: {}", dest_path.display());
                }
            }
        }
        report.record(status);
    }

    Ok(report)
}

/// Output page for a source file. The source extension is kept
/// (`a.md` -> `a.md.html`) so `a.md` and `a.txt` get separate pages.
fn page_path(out_dir: &Path, rel: &Path) -> PathBuf {
    let mut name = rel.as_os_str().to_os_string();
    name.push(".html");
    out_dir.join(name)
}

fn build_page(
    src_path: &Path,
    dest_path: &Path,
    options: &RenderOptions,
    force: bool,
    report: &mut BuildReport,
) -> Result<PageStatus> {
    let content = fs::read_to_string(src_path)
        .with_context(|| format!("Failed to read {}", src_path.display()))?;

    let result = chat_format::parse(&content);
    for diag in result.all_diagnostics() {
        if diag.severity == Severity::Info {
            continue;
        }
        let line_info = match diag.span {
            Some(span) => format!("{}:{}", src_path.display(), span.start_line),
            None => src_path.display().to_string(),
        };
        report.warnings.push(format!("{line_info}: {}", diag.message));
    }

    let html = result.to_html_page(options, &PageConfig::default());

    let status = if !dest_path.exists() {
        PageStatus::New
    } else if !force && file_hash(dest_path)? == content_hash(html.as_bytes()) {
        return Ok(PageStatus::Unchanged);
    } else {
        PageStatus::Updated
    };

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(dest_path, &html)
        .with_context(|| format!("Failed to write {}", dest_path.display()))?;

    Ok(status)
}

/// List transcript files under `dir` as relative paths, skipping `out_dir`
/// when it is nested inside the source tree.
fn list_sources(dir: &Path, out_dir: &Path, config: &FormatterConfig) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }
    let out_abs = fs::canonicalize(out_dir).ok();

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            out_abs.as_ref().is_none_or(|out| {
                fs::canonicalize(entry.path()).map_or(true, |p| !p.starts_with(out))
            })
        });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && config.matches_extension(entry.path()) {
            let rel = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or(entry.path())
                .to_path_buf();
            files.push(rel);
        }
    }

    Ok(files)
}

fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn file_hash(path: &Path) -> Result<String> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content_hash(&content))
}

/// Watch the source directory and rebuild whenever a transcript changes.
///
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms window.
/// Ctrl+C exits cleanly.
pub fn watch_and_rebuild(opts: &BuildOpts, config: &FormatterConfig) -> Result<()> {
    let source = fs::canonicalize(&opts.source)
        .with_context(|| format!("Cannot resolve path '{}'", opts.source.display()))?;
    let out_abs = fs::canonicalize(&opts.out_dir).unwrap_or_else(|_| opts.out_dir.clone());

    println!(
        "{} {} for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        opts.source.display()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&source, RecursiveMode::Recursive)?;

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let relevant_kind = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                let affects_sources = event
                    .paths
                    .iter()
                    .any(|p| !p.starts_with(&out_abs) && config.matches_extension(p));

                if relevant_kind && affects_sources && last_rebuild.elapsed() > debounce {
                    // Let the editor finish writing.
                    std::thread::sleep(Duration::from_millis(50));

                    match run_build(opts, config) {
                        Ok(report) => {
                            last_rebuild = Instant::now();
                            if !opts.quiet {
                                report.print_summary();
                            }
                        }
                        Err(e) => {
                            eprintln!("{} {:#}", "Build error:".red().bold(), e);
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
