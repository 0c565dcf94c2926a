//! Lexicrawl main entry point
//!
//! This is the command-line interface for the Lexicrawl parallel
//! word-frequency web crawler.

use anyhow::Context;
use clap::Parser;
use lexicrawl::clock::SystemClock;
use lexicrawl::config::{load_config, Config};
use lexicrawl::crawler::CrawlEngine;
use lexicrawl::output::write_result;
use lexicrawl::parser::HttpPageParser;
use lexicrawl::profiler::Profiler;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Lexicrawl: a parallel word-frequency web crawler
///
/// Lexicrawl follows the link graph from a set of starting URLs down to a
/// configured depth, counts the words on every visited page, and reports
/// the most frequent words along with the number of pages visited.
#[derive(Parser, Debug)]
#[command(name = "lexicrawl")]
#[command(version)]
#[command(about = "A parallel word-frequency web crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    // The runtime is the worker pool; size it from the parallelism hint,
    // capped by what the host actually offers.
    let workers = config
        .crawler
        .target_parallelism
        .min(CrawlEngine::max_parallelism());
    tracing::info!("Using {} worker threads", workers);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(run_crawl(config))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lexicrawl=info,warn"),
            1 => EnvFilter::new("lexicrawl=debug,info"),
            2 => EnvFilter::new("lexicrawl=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &Config) {
    println!("=== Lexicrawl Dry Run ===\n");

    println!("Crawl Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!("  Popular word count: {}", config.crawler.popular_word_count);
    println!(
        "  Target parallelism: {} (host offers {})",
        config.crawler.target_parallelism,
        CrawlEngine::max_parallelism()
    );

    println!("\nStarting URLs ({}):", config.crawler.start_urls.len());
    for url in &config.crawler.start_urls {
        println!("  - {}", url);
    }

    println!("\nIgnored URL patterns ({}):", config.crawler.ignored_urls.len());
    for pattern in &config.crawler.ignored_urls {
        println!("  - {}", pattern);
    }

    println!("\nIgnored word patterns ({}):", config.crawler.ignored_words.len());
    for pattern in &config.crawler.ignored_words {
        println!("  - {}", pattern);
    }

    println!("\nOutput:");
    println!(
        "  Results: {}",
        if config.output.results_path.is_empty() {
            "stdout"
        } else {
            &config.output.results_path
        }
    );
    println!(
        "  Profile: {}",
        if config.output.profile_path.is_empty() {
            "disabled"
        } else {
            &config.output.profile_path
        }
    );

    println!("\n✓ Configuration is valid");
}

/// Runs the crawl and writes the result and profile report
async fn run_crawl(config: Config) -> anyhow::Result<()> {
    let clock = Arc::new(SystemClock);

    let parser = Arc::new(HttpPageParser::new(
        &config.fetch,
        &config.crawler.ignored_words,
    )?);

    let profiler = Arc::new(Profiler::new(clock.clone()));
    let parser = profiler.wrap_parser(parser);

    let engine = CrawlEngine::new(&config.crawler, parser, clock)?;
    let result = engine.crawl(&config.crawler.start_urls).await;

    tracing::info!(
        "Crawl visited {} URLs, ranking {} words",
        result.urls_visited,
        result.word_counts.len()
    );

    let results_path = if config.output.results_path.is_empty() {
        None
    } else {
        Some(Path::new(&config.output.results_path))
    };
    write_result(&result, results_path)?;

    if !config.output.profile_path.is_empty() {
        let profile_path = Path::new(&config.output.profile_path);
        profiler
            .write_report_to(profile_path)
            .with_context(|| format!("failed to write {}", profile_path.display()))?;
        tracing::info!("Profile report appended to {}", profile_path.display());
    }

    Ok(())
}
