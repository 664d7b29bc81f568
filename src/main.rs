use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};

mod build;
mod config;

use chat_format::{Diagnostic, PreviewState, ResponseFormatter, Severity};

#[derive(Parser)]
#[command(name = "chatfmt", version, about = "Format assistant chat answers for display")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Path to a config file (default: ./chatfmt.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    Terminal,
    Markdown,
    Html,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Engine {
    /// Line-based chat heuristics
    Lines,
    /// Full CommonMark via pulldown-cmark
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Format an answer and print it
    Render {
        /// Path to the answer text, or '-' for stdin
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: RenderFormat,

        /// Formatting engine
        #[arg(long, value_enum, default_value = "lines")]
        engine: Engine,

        /// Text variant: body1, body2 or caption
        #[arg(long)]
        variant: Option<String>,

        /// Color token, e.g. text.secondary or red
        #[arg(long)]
        color: Option<String>,

        /// Truncate to N characters before formatting
        #[arg(long)]
        preview: Option<usize>,
    },

    /// Print the collapsed preview of a long answer
    Preview {
        /// Path to the answer text, or '-' for stdin
        file: String,

        /// Preview budget in characters (default from config)
        #[arg(long)]
        length: Option<usize>,

        /// Print the full text instead of the preview
        #[arg(long)]
        full: bool,
    },

    /// Clean up a raw model answer
    Clean {
        /// Path to the answer text, or '-' for stdin
        file: String,

        /// Answer intent: technical, code, document_query or general
        #[arg(long)]
        intent: Option<String>,

        /// Truncate the cleaned answer to N characters
        #[arg(long)]
        truncate: Option<usize>,
    },

    /// Lint answer file(s) for formatting surprises
    Check {
        /// Path to the answer file(s)
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Render a directory of answers into standalone HTML pages
    Build {
        /// Source directory
        dir: PathBuf,

        /// Output directory (default from config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Rewrite pages even when unchanged
        #[arg(long)]
        force: bool,

        /// Watch for changes and rebuild
        #[arg(long)]
        watch: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Render {
            file,
            format,
            engine,
            variant,
            color,
            preview,
        } => {
            let options = config.render_options(variant.as_deref(), color.as_deref())?;
            handle_render(&file, format, engine, &options, preview)?;
        }
        Commands::Preview { file, length, full } => {
            handle_preview(&file, length.unwrap_or(config.preview_length), full, cli.quiet)?;
        }
        Commands::Clean {
            file,
            intent,
            truncate,
        } => {
            let content = read_input(&file)?;
            let formatter = ResponseFormatter::new(config.max_response_length);
            let intent = config.intent(intent.as_deref());
            log::debug!("cleaning {} as {}", file, intent.as_str());
            let mut cleaned = formatter.format_response(&content, intent);
            if let Some(limit) = truncate {
                cleaned = formatter.truncate_response(&cleaned, Some(limit));
            }
            println!("{cleaned}");
        }
        Commands::Check { files } => {
            handle_check(&files, cli.quiet)?;
        }
        Commands::Build {
            dir,
            out,
            force,
            watch,
        } => {
            let opts = build::BuildOpts {
                source: dir,
                out_dir: out.unwrap_or_else(|| config.out_dir.clone()),
                force,
                quiet: cli.quiet,
            };
            let report = build::run_build(&opts, &config)?;
            if !cli.quiet {
                report.print_summary();
            }
            if watch {
                build::watch_and_rebuild(&opts, &config)?;
            }
        }
    }

    Ok(())
}

/// Read a file, or stdin when `file` is `-`.
fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(Path::new(file)).with_context(|| format!("Failed to read '{file}'"))
}

/// Format a file. `.json` files hold a JSON value that is formatted only
/// when it is a string.
fn format_file(file: &str) -> Result<chat_format::ParseResult> {
    let content = read_input(file)?;
    format_content(file, &content, None)
}

/// Format already-read input, cutting string values to `preview` characters
/// first when a budget is given.
fn format_content(
    file: &str,
    content: &str,
    preview: Option<usize>,
) -> Result<chat_format::ParseResult> {
    let value = if file.ends_with(".json") {
        serde_json::from_str(content)
            .with_context(|| format!("Failed to parse '{file}' as JSON"))?
    } else {
        serde_json::Value::String(content.to_string())
    };
    let value = match (value, preview) {
        (serde_json::Value::String(text), Some(budget)) => {
            serde_json::Value::String(chat_format::truncate_preview(&text, budget).text)
        }
        (value, _) => value,
    };
    Ok(chat_format::parse_value(&value))
}

fn location(file: &str, diag: &Diagnostic) -> String {
    match diag.span {
        Some(span) => format!("{}:{}", file, span.start_line),
        None => file.to_string(),
    }
}

fn handle_render(
    file: &str,
    format: RenderFormat,
    engine: Engine,
    options: &chat_format::RenderOptions,
    preview: Option<usize>,
) -> Result<()> {
    let content = read_input(file)?;

    if let Engine::Markdown = engine {
        let content = match preview {
            Some(budget) => chat_format::truncate_preview(&content, budget).text,
            None => content,
        };
        let output = match format {
            RenderFormat::Html => chat_format::render_html::markdown_to_html(&content),
            RenderFormat::Markdown => content,
            RenderFormat::Terminal | RenderFormat::Json => {
                anyhow::bail!("--engine markdown supports only --format html or markdown")
            }
        };
        println!("{output}");
        return Ok(());
    }

    let result = format_content(file, &content, preview)?;

    for diag in &result.diagnostics {
        eprintln!("{}: {}", location(file, diag), diag.message);
    }

    let output = match format {
        RenderFormat::Terminal => result.to_terminal(options),
        RenderFormat::Markdown => result.to_markdown(),
        RenderFormat::Html => result.to_html(options),
        RenderFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "doc": result.doc,
            "diagnostics": result.all_diagnostics(),
        }))?,
    };

    println!("{output}");
    Ok(())
}

fn handle_preview(file: &str, budget: usize, full: bool, quiet: bool) -> Result<()> {
    let content = read_input(file)?;
    let mut state = PreviewState::new(content, budget);
    if full {
        state.toggle();
    }

    println!("{}", state.visible_text());
    if let Some(label) = state.toggle_label() {
        if !quiet {
            eprintln!("{} {}", "[truncated]".dimmed(), label.dimmed());
        }
    }
    Ok(())
}

fn handle_check(files: &[String], quiet: bool) -> Result<()> {
    let mut has_errors = false;

    for file in files {
        let result = format_file(file)?;
        let all_diagnostics = result.all_diagnostics();

        if all_diagnostics.is_empty() {
            if !quiet {
                println!("{}: {}", file, "OK".green());
            }
            continue;
        }

        for diag in &all_diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => {
                    has_errors = true;
                    format!("{}", "error".red().bold())
                }
                Severity::Warning => format!("{}", "warning".yellow().bold()),
                Severity::Info => format!("{}", "info".cyan().bold()),
            };

            let code_str = match &diag.code {
                Some(c) => format!("[{c}] "),
                None => String::new(),
            };

            println!(
                "{}: {severity_str}: {code_str}{}",
                location(file, diag),
                diag.message
            );
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}
