//! Command-line interface.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use serde::Serialize;

use docsift::strategies::{check_binary, EXTERNAL_TOOLS};
use docsift::{create_strategy, AttemptOutcome, Chunker, Classification, Config, Extractor};

#[derive(Parser)]
#[command(name = "docsift", version, about = "Document text extraction with cascading fallback")]
pub struct Cli {
    /// Verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file.
    #[arg(short, long, global = true, env = "DOCSIFT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a document.
    Extract {
        /// Input file.
        file: PathBuf,

        /// Override the format tag instead of sniffing it (pdf, docx, txt,
        /// csv, json, html, markdown, source-code).
        #[arg(long)]
        format: Option<String>,

        /// Emit the full result (text, trace, classification) as JSON.
        #[arg(long)]
        json: bool,

        /// Print the attempt trace to stderr.
        #[arg(long)]
        trace: bool,

        /// Split the extracted text into retrieval chunks.
        #[arg(long)]
        chunks: bool,

        /// Disable OCR backends for this run.
        #[arg(long)]
        no_ocr: bool,
    },

    /// Report availability of external tools and extraction backends.
    Check,
}

/// Peek at argv for the verbose flag so logging can be configured before
/// clap runs.
pub fn is_verbose() -> bool {
    std::env::args().any(|a| a == "-v" || a == "--verbose")
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Extract {
            ref file,
            ref format,
            json,
            trace,
            chunks,
            no_ocr,
        } => cmd_extract(&cli, file, format.as_deref(), json, trace, chunks, no_ocr),
        Commands::Check => cmd_check(&cli),
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    result: &'a docsift::ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    chunks: Option<Vec<docsift::Chunk>>,
}

fn cmd_extract(
    cli: &Cli,
    file: &Path,
    format: Option<&str>,
    json: bool,
    trace: bool,
    chunks: bool,
    no_ocr: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if no_ocr {
        config.extraction.ocr_enabled = false;
    }

    let extractor = Extractor::new(config.extraction.clone());
    let result = match format {
        Some(tag) => {
            let bytes =
                std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
            extractor.extract_bytes(bytes, tag)
        }
        None => extractor
            .extract_file(file)
            .with_context(|| format!("reading {}", file.display()))?,
    };

    if trace && !json {
        print_trace(&result);
    }

    let chunk_list = if chunks && result.is_success() {
        Some(Chunker::new(config.chunking).split(&result.text))
    } else {
        None
    };

    if json {
        let out = JsonOutput {
            result: &result,
            chunks: chunk_list,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if result.is_success() {
        println!("{}", result.text);
        if let Some(list) = &chunk_list {
            eprintln!(
                "{}",
                style(format!("{} chunks (size {}, overlap {})", list.len(),
                    config.chunking.size, config.chunking.overlap))
                .dim()
            );
        }
    }

    match result.classification {
        Classification::TextExtracted => Ok(()),
        Classification::NeedsOcr => anyhow::bail!(
            "no backend produced usable text, but OCR is disabled and would likely help \
             (re-run without --no-ocr, or set ocr_enabled = true)"
        ),
        Classification::Unreadable => anyhow::bail!(
            "document is unreadable: all {} strategies failed (run with --trace for details)",
            result.attempts.len()
        ),
        Classification::UnsupportedFormat => {
            anyhow::bail!("unsupported document format: {}", file.display())
        }
    }
}

fn print_trace(result: &docsift::ExtractionResult) {
    eprintln!("\n{}", style("Extraction trace").bold());
    eprintln!("{}", "-".repeat(50));
    for attempt in &result.attempts {
        let outcome = match attempt.outcome {
            AttemptOutcome::Success => style("success").green(),
            AttemptOutcome::Empty => style("empty").yellow(),
            AttemptOutcome::Error => style("error").red(),
        };
        eprint!("  {:<12} {:<8} {:>8} chars", attempt.strategy, outcome, attempt.chars);
        if let Some(detail) = &attempt.detail {
            eprint!("  {}", style(detail).dim());
        }
        eprintln!();
    }
    eprintln!("  classification: {:?}", result.classification);
    eprintln!();
}

fn cmd_check(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    println!("\n{}", style("External tools").bold());
    println!("{}", "-".repeat(50));
    for tool in EXTERNAL_TOOLS {
        let status = if check_binary(tool) {
            style("✓ found").green()
        } else {
            style("✗ not found").red()
        };
        println!("  {:<12} {}", tool, status);
    }

    println!("\n{}", style("Configured strategies").bold());
    println!("{}", "-".repeat(50));
    for name in &config.extraction.strategies {
        match create_strategy(name, &config.extraction) {
            Some(strategy) => {
                let status = if strategy.is_available() {
                    style("✓ available").green()
                } else {
                    style("✗ not available").red()
                };
                println!("  {:<12} {}", name, status);
                if !strategy.is_available() {
                    println!("               {}", style(strategy.availability_hint()).dim());
                }
            }
            None => println!("  {:<12} {}", name, style("? unknown strategy name").yellow()),
        }
    }
    println!();
    Ok(())
}
