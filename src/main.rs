//! `lass`: LASS ranking from the command line.
//! Reads team lines from a file or stdin, prints the ranked table to stdout.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lass_scoring::logging::{init_tracing, log_format_from_env, LogFormat};
use lass_scoring::{rank_lines, render_json, render_text};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "lass", version, about = "Rank teams with LASS scoring")]
struct Cli {
    /// Input file with one team per line; `-` or nothing reads stdin.
    #[arg(env = "LASS_INPUT")]
    input: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "json", env = "LASS_FORMAT")]
    format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Write the result here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Diagnostic log layout (defaults to $LASS_LOG_FORMAT, then compact).
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let f = File::open(p).with_context(|| format!("opening input {}", p.display()))?;
            Ok(Box::new(BufReader::new(f)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format.unwrap_or_else(log_format_from_env));

    let reader = open_input(cli.input.as_ref())?;
    let ranking = rank_lines(reader)?;
    info!(
        teams = ranking.teams.len(),
        sections = ranking.sections.len(),
        "ranking computed"
    );

    let rows = ranking.results();
    let mut rendered = match cli.format {
        OutputFormat::Json => render_json(&rows, cli.pretty)?,
        OutputFormat::Text => render_text(&rows),
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }

    match cli.output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("writing output {}", path.display()))?,
        None => {
            let mut out = io::stdout().lock();
            out.write_all(rendered.as_bytes()).context("writing to stdout")?;
            out.flush().context("flushing stdout")?;
        }
    }
    Ok(())
}
