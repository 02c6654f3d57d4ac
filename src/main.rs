use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use industry_papers::classify::AffiliationClassifier;
use industry_papers::config::{find_config_file, load_config};
use industry_papers::models::{ReportRow, SearchQuery};
use industry_papers::pipeline::IndustryAuthorPipeline;
use industry_papers::sources::PubMedSource;
use industry_papers::utils::{write_report, ReportFormat, NO_RESULTS_MESSAGE};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch PubMed papers with non-academic (pharma/biotech) authors
#[derive(Parser, Debug)]
#[command(name = "industry-papers")]
#[command(version = industry_papers::VERSION)]
#[command(about = "Fetch PubMed papers with non-academic (pharma/biotech) authors", long_about = None)]
struct Cli {
    /// PubMed search query
    query: String,

    /// Number of papers to fetch (default: 20, or search.max_results from config)
    #[arg(long, short, value_parser = parse_count)]
    number: Option<usize>,

    /// Print the number of PMIDs found to stderr
    #[arg(long, short)]
    debug: bool,

    /// Output file (default: standard output)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Configuration file path
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress log output below error level
    #[arg(long, short)]
    quiet: bool,
}

/// Output format for the report
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Comma-separated values with a header row
    Csv,
    /// JSON array keyed by column name
    Json,
    /// Human-readable table
    Table,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Csv => ReportFormat::Csv,
            OutputFormat::Json => ReportFormat::Json,
            OutputFormat::Table => ReportFormat::Table,
        }
    }
}

fn parse_count(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{}", e))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

fn log_filter(cli: &Cli) -> &'static str {
    if cli.quiet {
        return "error";
    }
    match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Write the report to `file`, or to `out` when no file is given.
///
/// Status lines go to `out`. An empty row set prints the "no results"
/// message and creates no file.
fn emit_report<W: Write>(
    rows: &[ReportRow],
    format: ReportFormat,
    file: Option<&Path>,
    mut out: W,
) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "{}", NO_RESULTS_MESSAGE)?;
        return Ok(());
    }

    match file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_report(rows, format, BufWriter::new(file))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(out, "Wrote {} records to {}", rows.len(), path.display())?;
        }
        None => write_report(rows, format, out).context("Failed to write report")?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("industry_papers={}", log_filter(&cli))),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    let max_results = cli.number.unwrap_or(config.search.max_results);
    let query = SearchQuery::new(&cli.query).max_results(max_results);

    let source = PubMedSource::from_config(config.eutils.clone())
        .context("Failed to create PubMed client")?;
    let pipeline = IndustryAuthorPipeline::new(
        Arc::new(source),
        AffiliationClassifier::new(config.classification.clone()),
    );

    let pmids = pipeline
        .search(&query)
        .await
        .context("PubMed search failed")?;
    if cli.debug {
        eprintln!("Found {} PMIDs", pmids.len());
    }

    let rows = pipeline
        .report(&pmids)
        .await
        .context("Failed to fetch PubMed records")?;

    emit_report(
        &rows,
        ReportFormat::from(cli.format),
        cli.file.as_deref(),
        io::stdout().lock(),
    )
}
