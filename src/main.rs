//! doc-harvest main entry point
//!
//! This is the command-line interface for the doc-harvest corpus builder.

use clap::Parser;
use doc_harvest::config::{load_config_with_hash, validate, Config};
use doc_harvest::crawler::crawl;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// doc-harvest: documentation site to grounding corpus
///
/// doc-harvest crawls every page under a documentation root URL, converts
/// each page's main content to Markdown, and concatenates the pages into a
/// single combined corpus for use as language model context.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version)]
#[command(about = "Turns a documentation site into a grounding corpus", long_about = None)]
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

    /// Override the root URL from the configuration
    #[arg(long, value_name = "URL")]
    root_url: Option<String>,

    /// Override the output directory from the configuration
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Override the number of concurrent fetches
    #[arg(long, value_name = "N")]
    workers: Option<u32>,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "export_context"])]
    dry_run: bool,

    /// Show statistics of the output directory and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_context"])]
    stats: bool,

    /// Write preamble + combined corpus to the configured context path and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_context: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if apply_overrides(&mut config, &cli) {
        if let Err(e) = validate(&config) {
            tracing::error!("Invalid command-line override: {}", e);
            return Err(e.into());
        }
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_context {
        handle_export_context(&config)?;
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
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
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

/// Applies command-line overrides; returns true if anything changed
fn apply_overrides(config: &mut Config, cli: &Cli) -> bool {
    let mut changed = false;

    if let Some(root_url) = &cli.root_url {
        config.crawler.root_url = root_url.clone();
        changed = true;
    }
    if let Some(output_dir) = &cli.output_dir {
        config.output.directory = output_dir.clone();
        changed = true;
    }
    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
        changed = true;
    }

    changed
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== doc-harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root URL: {}", config.crawler.root_url);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout_secs);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!(
        "  Preamble: {}",
        config.output.preamble_path.as_deref().unwrap_or("(none)")
    );
    println!(
        "  Context: {}",
        config.output.context_path.as_deref().unwrap_or("(none)")
    );

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would clear {} and crawl everything under {}",
        config.output.directory, config.crawler.root_url
    );
}

/// Handles the --stats mode: shows statistics of the output directory
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use doc_harvest::output::{load_statistics, print_statistics};

    println!("Output directory: {}\n", config.output.directory);

    let stats = load_statistics(Path::new(&config.output.directory))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-context mode: writes preamble + corpus
fn handle_export_context(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use doc_harvest::output::{combined_context_path, export_context};

    let Some(destination) = config.output.context_path.as_deref() else {
        return Err("output.context-path must be set to export context".into());
    };

    println!("=== Exporting Agent Context ===\n");
    let corpus = combined_context_path(Path::new(&config.output.directory));
    println!("Corpus: {}", corpus.display());
    println!("Output: {}", destination);
    println!();

    let bytes = export_context(
        config.output.preamble_path.as_deref().map(Path::new),
        &corpus,
        Path::new(destination),
    )?;

    println!("✓ Context exported ({} bytes) to: {}", bytes, destination);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} with {} worker(s)",
        config.crawler.root_url,
        config.crawler.workers
    );

    match crawl(config).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed successfully: {} pages, {} bytes of corpus at {}",
                report.pages_written(),
                report.corpus_bytes,
                report.corpus_path.display()
            );
            for (outcome, count) in &report.outcomes {
                tracing::debug!("  {}: {}", outcome, count);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
