//! Claude Code History - Entry Point

use cchist::assembler::assemble;
use cchist::diff::DiffAlgorithm;
use cchist::model::error::AppError;
use cchist::present::{JsonRenderer, PlainRenderer, Renderer, Transcript};
use clap::{Parser, ValueEnum};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Output format for the rendered transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Uncolored terminal layout
    Plain,
    /// Pretty-printed JSON
    Json,
}

/// Claude Code History - rebuild conversations and diffs from JSONL logs
#[derive(Parser, Debug)]
#[command(name = "cchist")]
#[command(version)]
#[command(about = "Rebuilds conversation threads and file diffs from Claude Code JSONL session logs")]
pub struct Args {
    /// Path to JSONL log file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Plain)]
    pub format: Format,

    /// Unchanged lines shown around each change
    #[arg(short = 'C', long = "context")]
    pub context: Option<usize>,

    /// Line alignment algorithm (myers, patience, lcs)
    #[arg(long, value_parser = parse_algorithm)]
    pub algorithm: Option<DiffAlgorithm>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn parse_algorithm(value: &str) -> Result<DiffAlgorithm, String> {
    value.parse().map_err(|e: cchist::diff::UnknownAlgorithm| e.to_string())
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = cchist::config::load_config_with_precedence(args.config.clone())?;
        let merged = cchist::config::merge_config(config_file);
        let with_env = cchist::config::apply_env_overrides(merged)?;
        cchist::config::apply_cli_overrides(with_env, args.context, args.algorithm)
    };

    cchist::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let input_source = cchist::source::detect_input_source(args.file.clone())?;
    let log = input_source.load()?;

    let pairs = assemble(&log.events);
    let transcript =
        Transcript::build(&pairs, &config.render_options()).with_diagnostics(log.diagnostics.clone());

    info!(
        events = log.events.len(),
        pairs = pairs.len(),
        diagnostics = log.diagnostics.len(),
        "Rendering transcript"
    );

    let renderer: Box<dyn Renderer> = match args.format {
        Format::Plain => Box::new(PlainRenderer::new(config.shell_preview_lines)),
        Format::Json => Box::new(JsonRenderer),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    renderer.render(&transcript, &mut out)?;
    out.flush()?;
    Ok(())
}

/// A closed pipe (`cchist log.jsonl | head`) is a normal way to stop reading.
fn is_broken_pipe(err: &AppError) -> bool {
    matches!(err, AppError::Output(e) if e.kind() == io::ErrorKind::BrokenPipe)
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "cchist failed");
            eprintln!("cchist: {err}");
            ExitCode::FAILURE
        }
    }
}
