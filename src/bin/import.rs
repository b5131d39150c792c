//! Command-line bulk importer.
//!
//! Runs one import session against the configured bookmark backend (or the
//! in-memory store when `BOOKMARK_API_URL` is unset) and prints a per-link
//! report.
//!
//! # Usage
//!
//! ```bash
//! # Import every URL found in a CSV export
//! cargo run --bin bookmark-import-cli -- --file bookmarks.csv
//!
//! # Paste free text, five links at a time
//! cargo run --bin bookmark-import-cli -- --text "google.com, https://github.com" --concurrency 5
//!
//! # One URL, sequentially, without the pre-check
//! cargo run --bin bookmark-import-cli -- --url example.com --mode sequential --no-skip-existing
//! ```
//!
//! Exits with status 1 when any link failed.

use bookmark_import::application::services::SummaryLevel;
use bookmark_import::config::Config;
use bookmark_import::domain::entities::{
    ConcurrencyLimit, ImportSession, ImportSettings, ImportSource, LinkStatus, ProcessingMode,
    StatusChange,
};
use bookmark_import::server::build_state;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use colored::*;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Import links into the bookmark store.
#[derive(Parser)]
#[command(name = "bookmark-import-cli")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "text", "url"])))]
struct Cli {
    /// Delimited file (CSV export) to read URLs from
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Free text containing URLs
    #[arg(short, long)]
    text: Option<String>,

    /// A single URL
    #[arg(short, long)]
    url: Option<String>,

    #[arg(long, value_enum, default_value_t = Mode::Parallel)]
    mode: Mode,

    /// Links dispatched together in parallel mode (3, 5 or 10)
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Category assigned to every created bookmark
    #[arg(long, default_value = "General")]
    category: String,

    /// Comma-separated tags applied to every created bookmark
    #[arg(long, default_value = "")]
    tags: String,

    /// Dispatch URLs even if they fail local validation
    #[arg(long)]
    no_validate: bool,

    /// Do not query the store for existing URLs before creating
    #[arg(long)]
    no_skip_existing: bool,

    /// Do not persist an audit log for this run
    #[arg(long)]
    no_log: bool,

    /// Print every status change as it happens
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Sequential,
    Parallel,
}

impl From<Mode> for ProcessingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sequential => ProcessingMode::Sequential,
            Mode::Parallel => ProcessingMode::Parallel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let settings = settings_from(&cli)?;
    let (source, content) = read_input(&cli)?;

    let state = build_state(&config)?;

    println!("{}", "📥 Bookmark Import".bright_blue().bold());
    println!(
        "  Backend: {}",
        config
            .bookmark_api_url
            .as_deref()
            .unwrap_or("in-memory")
            .cyan()
    );
    println!();

    let mut session = state
        .import_service
        .prepare(source, &content, settings)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!(
        "  Found {} link(s), processing...",
        session.records.len().to_string().bright_white().bold()
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_progress(rx, cli.verbose));

    let summary = state.import_service.run(&mut session, Some(&tx)).await;
    drop(tx);
    printer.await.ok();

    println!();
    print_records(&session);
    println!();

    let headline = match summary.level {
        SummaryLevel::Success => format!("✅ {}", summary.message).green().bold(),
        SummaryLevel::Warning => format!("⚠️  {}", summary.message).yellow().bold(),
        SummaryLevel::Error => format!("❌ {}", summary.message).red().bold(),
    };
    println!("{headline}");
    println!(
        "  Success rate: {}%",
        session.stats.success_rate.to_string().bright_white().bold()
    );
    println!();

    if session.stats.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn settings_from(cli: &Cli) -> Result<ImportSettings> {
    let concurrent_limit =
        ConcurrencyLimit::try_from(cli.concurrency).map_err(|e| anyhow::anyhow!(e))?;

    Ok(ImportSettings {
        validate_urls: !cli.no_validate,
        skip_existing: !cli.no_skip_existing,
        processing_mode: cli.mode.into(),
        concurrent_limit,
        default_category: cli.category.clone(),
        auto_apply_tags: cli.tags.clone(),
        log_imports: !cli.no_log,
        ..ImportSettings::default()
    })
}

fn read_input(cli: &Cli) -> Result<(ImportSource, String)> {
    if let Some(path) = &cli.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok((ImportSource::File, content));
    }
    if let Some(text) = &cli.text {
        return Ok((ImportSource::Text, text.clone()));
    }
    let url = cli.url.clone().context("One of --file, --text or --url is required")?;
    Ok((ImportSource::Url, url))
}

async fn print_progress(mut rx: mpsc::UnboundedReceiver<StatusChange>, verbose: bool) {
    let mut finished = 0usize;
    while let Some(change) = rx.recv().await {
        if change.to.is_terminal() {
            finished += 1;
        }
        if verbose {
            println!(
                "  {} {} → {}",
                change.url.bright_black(),
                change.from.as_str(),
                colored_status(change.to)
            );
        }
    }
    if !verbose {
        println!("  {} link(s) processed", finished);
    }
}

/// Per-record table.
///
/// ```text
///   Status      Domain                         Note
///   ──────────────────────────────────────────────────────────────
///   perfect     google.com
///   success     github.com                     Skipped (exists)
/// ```
fn print_records(session: &ImportSession) {
    println!(
        "  {:<11} {:<30} {}",
        "Status".bright_white().bold(),
        "Domain".bright_white().bold(),
        "Note".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for record in &session.records {
        println!(
            "  {:<11} {:<30} {}",
            colored_status(record.status),
            record.domain.cyan(),
            record.error.as_deref().unwrap_or("").bright_black()
        );
    }

    println!();
    println!(
        "  Total: {}",
        session.stats.total.to_string().bright_white().bold()
    );
}

fn colored_status(status: LinkStatus) -> ColoredString {
    match status {
        LinkStatus::Perfect => status.as_str().green(),
        LinkStatus::Success => status.as_str().bright_green(),
        LinkStatus::Failed => status.as_str().red(),
        LinkStatus::Processing => status.as_str().yellow(),
        LinkStatus::Queued => status.as_str().bright_black(),
    }
}
