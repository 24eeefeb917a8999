//! NewsBank scraper main entry point
//!
//! This is the command-line interface for the NewsBank search scraper.

use anyhow::Context;
use clap::Parser;
use newsbank_scraper::config::{load_config_with_hash, validate_scraper_config, Config};
use newsbank_scraper::output::write_records;
use newsbank_scraper::Orchestrator;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// NewsBank scraper: collect article records from a NewsBank search
///
/// Compiles the search in CONFIG into site query parameters, walks every
/// result page politely, optionally fetches each article's full text, and
/// writes the records as a JSON array.
#[derive(Parser, Debug)]
#[command(name = "newsbank-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Scrape NewsBank search results into JSON", long_about = None)]
struct Cli {
    /// Path to the search configuration (TOML, or JSON by extension)
    #[arg(short, long, value_name = "CONFIG")]
    config: PathBuf,

    /// Output JSON file
    #[arg(short, long, value_name = "OUTPUT", default_value = "results.json")]
    output: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Save fetched HTML for debugging
    #[arg(short, long)]
    save_html: bool,

    /// Maximum number of articles to scrape
    #[arg(short, long, value_name = "N")]
    limit: Option<usize>,

    /// Delay before each request, in seconds
    #[arg(short, long, value_name = "SECONDS")]
    rate: Option<f64>,

    /// Maximum concurrent requests
    #[arg(short = 'n', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Number of parse worker processes
    #[arg(short, long, value_name = "N")]
    processors: Option<usize>,

    /// Fetch the full text of every article
    #[arg(short, long)]
    full_text: bool,

    /// Show the compiled search without sending any requests
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli)?;

    let orchestrator = Orchestrator::from_config(&config).with_progress(!cli.quiet);

    if cli.dry_run {
        handle_dry_run(&orchestrator);
        return Ok(());
    }

    let records = orchestrator.run().await.context("scrape failed")?;

    write_records(&cli.output, &records)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    println!(
        "Scraped {} articles into {}",
        records.len(),
        cli.output.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsbank_scraper=info,warn"),
            1 => EnvFilter::new("newsbank_scraper=debug,info"),
            2 => EnvFilter::new("newsbank_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Folds command-line flags into the `[scraper]` section and re-validates it
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    let scraper = &mut config.scraper;

    if cli.save_html {
        scraper.save_html = true;
    }
    if cli.full_text {
        scraper.full_text = true;
    }
    if let Some(limit) = cli.limit {
        scraper.limit = Some(limit);
    }
    if let Some(rate) = cli.rate {
        anyhow::ensure!(
            rate.is_finite() && rate >= 0.0,
            "--rate must be a non-negative number of seconds"
        );
        scraper.rate_limit_ms = (rate * 1000.0).round() as u64;
    }
    if let Some(concurrency) = cli.concurrency {
        scraper.concurrency = concurrency;
    }
    if let Some(processors) = cli.processors {
        scraper.workers = Some(processors);
    }

    validate_scraper_config(scraper).context("invalid command-line override")?;
    Ok(())
}

/// Handles the --dry-run mode: shows the compiled search without fetching
fn handle_dry_run(orchestrator: &Orchestrator) {
    let query = orchestrator.query();
    let settings = orchestrator.settings();

    println!("=== NewsBank Scraper Dry Run ===\n");

    println!("Search Parameters:");
    for (key, value) in query.params() {
        println!("  {} = {}", key, value);
    }

    let location = query.location();
    println!("\nLocation:");
    println!("  City: {}", location.city);
    println!("  State: {}", location.state);
    println!("  Country: {}", location.country);

    println!("\nScraper:");
    println!("  Rate limit: {:?}", settings.fetch.rate_limit);
    println!("  Concurrency: {}", settings.fetch.concurrency);
    match settings.workers {
        Some(workers) => println!("  Workers: {}", workers),
        None => println!("  Workers: default"),
    }
    println!("  Full text: {}", settings.full_text);
    match settings.limit {
        Some(limit) => println!("  Limit: {}", limit),
        None => println!("  Limit: none"),
    }
    if let Some(dir) = &settings.debug_dir {
        println!("  Saving HTML to: {}", dir.display());
    }

    println!("\n✓ Configuration is valid");
}
