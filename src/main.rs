//! chh-collector main entry point
//!
//! This is the command-line interface for the chh-collector music crawler.

use anyhow::Context;
use chh_collector::config::{load_config_with_hash, Config};
use chh_collector::crawler::{crawl, CrawlControl, CrawlOutcome};
use chh_collector::music::build_visitor;
use chh_collector::storage::{open_store, RecordStore};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// chh-collector: a polite single-site music crawler
///
/// chh-collector walks a site breadth-first from its seed URLs, one page at a
/// time with a pause before every request, and scrapes song, artist and date
/// fields from music pages into a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "chh-collector")]
#[command(version)]
#[command(about = "A polite single-site music crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "records")]
    dry_run: bool,

    /// List the records stored in the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    records: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.records {
        handle_records(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("chh_collector=info,warn"),
            1 => EnvFilter::new("chh_collector=debug,info"),
            2 => EnvFilter::new("chh_collector=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== chh-collector Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Follow external links: {}", config.crawler.follow_external_links);
    println!("  Scrape seed urls: {}", config.crawler.scrape_seed_urls);
    println!("  Courtesy delay: {}ms", config.fetcher.courtesy_delay_ms);
    println!("  Request timeout: {}ms", config.fetcher.request_timeout_ms);

    if let Some(user_agent) = &config.user_agent {
        println!("\nUser Agent:");
        println!("  {}", user_agent.user_agent_string());
    }

    println!("\nVisitor:");
    println!("  Record pattern: {}", config.visitor.record_pattern);
    match &config.visitor.follow_pattern {
        Some(pattern) => println!("  Follow pattern: {}", pattern),
        None => println!("  Follow pattern: (any)"),
    }
    match config.visitor.max_visits {
        Some(max) => println!("  Max visits: {}", max),
        None => println!("  Max visits: (unlimited)"),
    }

    println!("\nOutput:");
    match &config.output.database_path {
        Some(path) => println!("  Database: {}", path),
        None => println!("  Database: (none, records are only logged)"),
    }

    println!("\nSeed URLs ({}):", config.crawler.seed_urls.len());
    for seed in &config.crawler.seed_urls {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --records mode: prints the stored records
fn handle_records(config: &Config) -> anyhow::Result<()> {
    let path = config
        .output
        .database_path
        .as_deref()
        .context("No database-path is configured in [output]")?;

    println!("Database: {}\n", path);

    let store = open_store(Path::new(path))
        .with_context(|| format!("Failed to open database {}", path))?;
    let records = store.list_records()?;

    for record in &records {
        println!("{}", record);
    }
    println!("\n{} records", records.len());

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!("Total seed URLs: {}", config.crawler.seed_urls.len());

    let visitor = build_visitor(&config).context("Failed to set up the music visitor")?;

    let control = CrawlControl::new();
    let interrupt = control.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            interrupt.stop();
        }
    });

    let report = crawl(&config, visitor, control)
        .await
        .context("Crawl failed to start")?;

    match report.outcome {
        CrawlOutcome::Exhausted => tracing::info!("Crawl completed: frontier exhausted"),
        CrawlOutcome::Stopped => tracing::info!("Crawl completed: stopped on request"),
    }
    println!("Total links visited: {}", report.total_links_visited);

    Ok(())
}
