//! Kerbside main entry point
//!
//! Command-line interface for the incremental vehicle listing harvester.

use anyhow::Context;
use clap::Parser;
use kerbside::config::load_config_with_hash;
use kerbside::dataset::JsonFileStore;
use kerbside::run::{Harvester, RunOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kerbside: an incremental vehicle listing harvester
///
/// Kerbside walks a paginated listing site one page at a time, extracts
/// and validates vehicle records, and maintains a deduplicated JSON
/// dataset that is checkpointed after every page.
#[derive(Parser, Debug)]
#[command(name = "kerbside")]
#[command(version = "1.0.0")]
#[command(about = "An incremental vehicle listing harvester", long_about = None)]
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

    /// Validate config and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let store = JsonFileStore::new(&config.output.data_path);
    let mut harvester = Harvester::new(config, store)?;

    let summary = harvester.run().await;

    match summary.outcome {
        RunOutcome::StoppedEmpty => {
            tracing::info!(
                "Reached the end of pagination after {} pages",
                summary.pages_processed
            );
        }
        RunOutcome::StoppedBlocked => {
            tracing::error!(
                "Run ended because the source blocked access; consider rotating the proxy \
                 before the next run"
            );
        }
        RunOutcome::StoppedFetchExhausted => {
            tracing::error!(
                "Run ended early: a page stayed unreachable. {} pages were persisted.",
                summary.pages_processed
            );
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kerbside=info,warn"),
            1 => EnvFilter::new("kerbside=debug,info"),
            2 => EnvFilter::new("kerbside=trace,debug"),
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

/// Handles --dry-run: echoes the validated configuration and exits
fn handle_dry_run(config: &kerbside::config::Config) {
    println!("=== Kerbside Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!(
        "  Inter-page delay: {:.0}-{:.0}s",
        config.site.page_delay_min_secs, config.site.page_delay_max_secs
    );

    println!("\nFetch:");
    println!("  Max retries: {}", config.fetch.max_retries);
    println!("  Backoff factor: {}s", config.fetch.backoff_factor);
    println!("  Request timeout: {}s", config.fetch.timeout_secs);
    println!("  Cache TTL: {}h", config.fetch.cache_ttl_hours);

    println!("\nOutput:");
    println!("  Dataset: {}", config.output.data_path);

    match &config.proxy {
        Some(proxy) if proxy.credentials().is_some() => {
            let (endpoint, _, _) = proxy.credentials().unwrap();
            println!("\nProxy: {}", endpoint);
        }
        Some(_) => println!("\nProxy: configured but incomplete (would run direct)"),
        None => println!("\nProxy: none"),
    }

    println!("\n✓ Configuration is valid");
}
