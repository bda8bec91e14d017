//! Demand-Miner main entry point
//!
//! This is the command-line interface for the Demand-Miner keyword
//! analysis tool.

use anyhow::Context;
use clap::Parser;
use demand_miner::config::load_config_with_hash;
use demand_miner::output::{print_statistics, tally_ranks, write_results_csv};
use demand_miner::pipeline::run_analysis;
use demand_miner::progress::LogSink;
use demand_miner::CancelToken;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Demand-Miner: an SEO keyword demand mining tool
///
/// Demand-Miner expands seed terms through autocomplete suggestions,
/// classifies each discovered keyword by competitive opportunity, and
/// caches results to keep API usage low across runs.
#[derive(Parser, Debug)]
#[command(name = "demand-miner")]
#[command(version)]
#[command(about = "SEO keyword demand mining tool", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Pattern id to run (as declared in the config file)
    #[arg(short, long, required_unless_present = "dry_run")]
    pattern: Option<String>,

    /// Ignore cached results and re-query every keyword
    #[arg(long)]
    no_cache: bool,

    /// Validate config and show what would run without any network call
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.no_cache {
        tracing::info!("Cache lookups disabled for this run");
        config.cache.enabled = false;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let Some(pattern_id) = cli.pattern else {
        anyhow::bail!("--pattern is required unless --dry-run is set");
    };
    handle_run(config, &pattern_id).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("demand_miner=info,warn"),
            1 => EnvFilter::new("demand_miner=debug,info"),
            2 => EnvFilter::new("demand_miner=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would run
fn handle_dry_run(config: &demand_miner::Config) {
    println!("=== Demand-Miner Dry Run ===\n");

    println!("Mining:");
    println!("  Max recursion depth: {}", config.mining.max_recursion_depth);
    println!("  Rate limit interval: {}s", config.rate_limit.wait_seconds);

    println!("\nRanking thresholds:");
    println!("  S: {} days", config.ranking.rank_s_days);
    println!("  A: {} days", config.ranking.rank_a_days);
    println!("  B: {} days", config.ranking.rank_b_days);

    println!("\nSniper mode:");
    if config.sniper.enabled {
        println!("  Enabled, max competitors: {}", config.sniper.max_competitors);
        println!("  Target domains: {}", config.sniper.target_domains.join(", "));
    } else {
        println!("  Disabled");
    }

    println!("\nCache:");
    println!(
        "  {} ({}), base TTL {}h, smart TTL {}",
        if config.cache.enabled { "Enabled" } else { "Disabled" },
        config.cache.path,
        config.cache.ttl_hours,
        if config.cache.smart_ttl.enabled { "on" } else { "off" }
    );

    println!("\nProviders:");
    println!(
        "  Search: {}",
        if config.providers.search_configured() {
            "configured"
        } else {
            "NOT configured (keywords will rank '?')"
        }
    );
    println!(
        "  Trends: {}",
        if config.providers.trends_configured() {
            "configured"
        } else {
            "disabled"
        }
    );

    println!("\nWord groups ({}):", config.word_groups.len());
    for group in &config.word_groups {
        println!(
            "  - {} ({} words)",
            group.name.as_deref().unwrap_or(&group.id),
            group.words.len()
        );
    }

    println!("\nPatterns ({}):", config.patterns.len());
    for pattern in &config.patterns {
        let mode = if !pattern.run_multiple.is_empty() {
            format!("runs {}", pattern.run_multiple.join(" + "))
        } else {
            pattern.mining_mode.clone().unwrap_or_default()
        };
        println!("  - {} [{}]", pattern.label(), mode);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main analysis run
async fn handle_run(config: demand_miner::Config, pattern_id: &str) -> anyhow::Result<()> {
    let cancel = CancelToken::new();

    // First Ctrl-C requests a cooperative stop; the run finishes its
    // current keyword, flushes the cache, and exits normally
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current keyword");
            signal_token.request();
        }
    });

    let report = run_analysis(&config, pattern_id, &LogSink, cancel)
        .await
        .context("analysis run failed")?;

    let stats = tally_ranks(&report.records);
    print_statistics(&stats, report.cache_hits, report.api_calls);

    let csv_path = write_results_csv(std::path::Path::new(&config.output.csv_dir), &report.records)
        .context("failed to write result CSV")?;
    println!();
    println!("✓ Results exported to: {}", csv_path.display());

    Ok(())
}
