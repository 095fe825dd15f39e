//! Realestate-Crawler main entry point
//!
//! Without a subcommand, runs one crawl, prints the listing and writes the
//! store. `server` starts the HTTP front door instead.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use realestate_crawler::config::{load_config_with_hash, Config};
use realestate_crawler::crawler::run_crawl;
use realestate_crawler::output::{print_statistics, CrawlStatistics, LISTING_BANNER};
use realestate_crawler::server::start_server;
use realestate_crawler::storage::{to_pretty_json, JsonStore, Store};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Realestate-Crawler: harvests property listings from a builder's website
#[derive(Parser, Debug)]
#[command(name = "realestate-crawler")]
#[command(version)]
#[command(about = "Harvests property listings into a JSON store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to a TOML configuration file (built-in sites are used otherwise)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    /// Show statistics for the existing store and exit
    #[arg(long)]
    stats: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the listing over HTTP, generating the store on first request
    Server,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;
    let store = Arc::new(JsonStore::new(&config.output.store_path));

    match cli.command {
        Some(Command::Server) => {
            tracing::info!("In web server mode");
            start_server(config, store)
                .await
                .context("HTTP server failed")?;
        }
        None if cli.stats => handle_stats(&config, store.as_ref())?,
        None => handle_generate(config, store.as_ref()).await?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("realestate_crawler=info,warn"),
            1 => EnvFilter::new("realestate_crawler=debug,info"),
            2 => EnvFilter::new("realestate_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout carries only the listing
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: Option<&std::path::Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::info!("Using built-in site configuration");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// One-shot mode: crawl, print the listing, write the store
async fn handle_generate(config: Config, store: &dyn Store) -> Result<()> {
    tracing::info!("Crawling {} sites", config.sites.len());

    let records = run_crawl(config).await.context("Crawl failed")?;
    let json = to_pretty_json(&records)?;

    println!("{}", LISTING_BANNER);
    println!("{}", json);

    store
        .save(&records)
        .with_context(|| format!("Unable to write store {}", store.path().display()))?;
    tracing::info!("Wrote {} records to {}", records.len(), store.path().display());

    Ok(())
}

/// Prints statistics computed from the existing store
fn handle_stats(config: &Config, store: &dyn Store) -> Result<()> {
    println!("Store: {}\n", store.path().display());

    let records = store
        .load()
        .with_context(|| format!("Unable to read store {}", store.path().display()))?;
    let cities: Vec<&str> = config.sites.iter().map(|s| s.city.as_str()).collect();
    print_statistics(&CrawlStatistics::from_records(&records, &cities));

    Ok(())
}
