//! Extension-Harvest main entry point
//!
//! This is the command-line interface for the marketplace crawler and exporter.

use clap::Parser;
use extension_harvest::config::{load_config_with_hash, validate, Config};
use extension_harvest::crawler::{crawl, QueryTemplate};
use extension_harvest::export::run_export;
use extension_harvest::output::{format_crawl_report, load_statistics, print_statistics};
use extension_harvest::storage::SqliteTableStore;
use extension_harvest::HarvestError;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Extension-Harvest: marketplace catalog crawler and table exporter
///
/// Crawls the extension gallery page by page into JSON snapshots, then
/// flattens the snapshots into a CSV table and a SQLite table.
#[derive(Parser, Debug)]
#[command(name = "extension-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Marketplace catalog crawler and table exporter", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the maximum number of pages to crawl
    #[arg(long)]
    max_pages: Option<u32>,

    /// Override the snapshot directory
    #[arg(long)]
    snapshot_dir: Option<String>,

    /// Override the exported table name
    #[arg(long)]
    table_name: Option<String>,

    /// Only crawl; skip the export stage
    #[arg(long, conflicts_with_all = ["export_only", "dry_run", "stats"])]
    crawl_only: bool,

    /// Only export existing snapshots; skip the crawl stage
    #[arg(long, conflicts_with_all = ["crawl_only", "dry_run", "stats"])]
    export_only: bool,

    /// Show the resolved configuration and first query without crawling
    #[arg(long, conflicts_with_all = ["crawl_only", "export_only", "stats"])]
    dry_run: bool,

    /// Show statistics of the exported table and exit
    #[arg(long, conflicts_with_all = ["crawl_only", "export_only", "dry_run"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config)?;

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        if !cli.export_only {
            handle_crawl(&config).await?;
        }
        if !cli.crawl_only {
            handle_export(&config)?;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("extension_harvest=info,warn"),
            1 => EnvFilter::new("extension_harvest=debug,info"),
            2 => EnvFilter::new("extension_harvest=trace,debug"),
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

/// Applies command-line overrides on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(dir) = &cli.snapshot_dir {
        config.crawler.snapshot_dir = dir.clone();
    }
    if let Some(name) = &cli.table_name {
        config.output.table_name = name.clone();
    }
}

/// Handles the --dry-run mode: shows configuration and the first request body
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Extension-Harvest Dry Run ===\n");

    println!("API:");
    println!("  URL: {}", config.api.url);
    println!("  Accept: {}", config.api.accept);
    println!("  User agent: {}", config.api.user_agent);
    println!("  Timeout: {}s", config.api.timeout_secs);
    println!("  Page size: {}", config.api.page_size);

    println!("\nCrawler:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Snapshot directory: {}", config.crawler.snapshot_dir);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    println!("  Database: {}", config.output.database_path);
    println!("  Table: {}", config.output.table_name);

    let query = QueryTemplate::from_config(&config.api).for_page(1);
    println!("\nFirst request body:");
    println!("{}", serde_json::to_string_pretty(&query)?);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics from the exported table
fn handle_stats(config: &Config) -> extension_harvest::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteTableStore::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage, &config.output.table_name)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the crawl stage
async fn handle_crawl(config: &Config) -> extension_harvest::Result<()> {
    let report = match crawl(config).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e);
        }
    };

    tracing::info!(
        "Crawling completed. Total extensions: {}",
        report.total_extensions
    );
    if !report.failed_saves.is_empty() {
        tracing::warn!("{} pages could not be saved", report.failed_saves.len());
    }
    println!("{}", format_crawl_report(&report));

    Ok(())
}

/// Handles the export stage
fn handle_export(config: &Config) -> extension_harvest::Result<()> {
    match run_export(config) {
        Ok(report) => {
            tracing::info!(
                "Export completed: {} CSV rows, {} table rows",
                report.csv_rows,
                report.table_rows
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Unexpected error during data processing: {}", e);
            Err(HarvestError::Export(e))
        }
    }
}
