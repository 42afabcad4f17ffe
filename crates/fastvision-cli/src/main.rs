//! `fastvision` — extract a validated layout-and-tone-aware JSON document
//! from a PDF or DOCX file.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use fastvision_core::{FvError, NullTagger, PipelineConfig};

/// fast_vision — PDF/DOCX → Schema v3.0 JSON extractor.
#[derive(Parser, Debug)]
#[command(name = "fastvision", version, about, long_about = None)]
struct Cli {
    /// Path to the input file (.pdf or .docx)
    input: PathBuf,

    /// Output JSON path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip vision-backed tagging (geometry/style + heuristics only)
    #[arg(long)]
    no_vision: bool,

    /// Page range, e.g. "1,3-5,10" (PDF only)
    #[arg(long)]
    pages: Option<String>,

    /// JSON indent level
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let extension = cli
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    if !matches!(extension.as_str(), "pdf" | "docx" | "doc") {
        eprintln!("ERROR unsupported input extension '.{extension}': expected .pdf or .docx");
        return ExitCode::from(2);
    }

    let use_vision = !cli.no_vision;
    if use_vision && !has_vision_credentials() {
        tracing::warn!("{}", FvError::MissingCredentials);
    }

    let config = PipelineConfig {
        use_vision,
        page_range: cli.pages.clone(),
        max_workers: num_cpus::get().min(8),
        tagger_timeout: Duration::from_secs(60),
    };

    let result = fastvision_core::process(&cli.input, &config, &NullTagger, Some(&progress_bar));
    eprintln!();

    match result {
        Ok(document) => match write_output(&document, cli.output.as_deref(), cli.indent) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("ERROR {e}");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("ERROR {e}");
            match e {
                FvError::UnsupportedInput { .. } => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn write_output(
    document: &fastvision_core::LayoutDocument,
    output: Option<&std::path::Path>,
    indent: usize,
) -> anyhow::Result<()> {
    let indent_str = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(document, &mut serializer)?;

    match output {
        Some(path) => {
            std::fs::write(path, &buf)?;
            tracing::info!(bytes = buf.len(), path = %path.display(), "wrote output");
        }
        None => {
            std::io::stdout().write_all(&buf)?;
            println!();
        }
    }
    Ok(())
}

/// Renders a `\r`-updating progress bar to stderr; a trailing newline is
/// printed once by the caller after the pipeline finishes.
fn progress_bar(pct: f64, msg: &str) {
    const WIDTH: usize = 30;
    let filled = ((WIDTH as f64) * pct.clamp(0.0, 1.0)) as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(WIDTH - filled);
    eprint!("\r  [{bar}] {:5.1}%  {msg}", pct * 100.0);
    let _ = std::io::stderr().flush();
}

/// No concrete vision backend ships with this crate — `NullTagger` is always
/// used regardless of the outcome here — but the env vars a real backend
/// would read are checked anyway so the CLI can surface the same
/// heuristic-fallback warning a configured backend would hit on its own.
fn has_vision_credentials() -> bool {
    std::env::var_os("OPENAI_API_KEY").is_some() || std::env::var_os("GEMINI_API_KEY").is_some()
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
