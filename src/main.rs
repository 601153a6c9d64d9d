//! Cursor-Crawl main entry point
//!
//! This is the command-line interface for the Cursor-Crawl crawler and scraper.

use clap::{Parser, Subcommand};
use cursor_crawl::config::load_config;
use cursor_crawl::crawler::{load_status, run_crawl, run_scrape, Shutdown};
use cursor_crawl::output::print_status;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cursor-Crawl: a resumable same-site crawler and page scraper
///
/// `crawl` collects the pages of one site into a link list; `scrape` fetches
/// every link in that list and extracts its text into a CSV file. Both save
/// their progress after each page so an interrupted run picks up where it
/// stopped.
#[derive(Parser, Debug)]
#[command(name = "cursor-crawl")]
#[command(version)]
#[command(about = "A resumable same-site crawler and page scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover same-site links from the seed URL and save them as the link list
    Crawl {
        /// Ignore the saved crawl and start again from the seed URL
        #[arg(long)]
        fresh: bool,
    },

    /// Scrape the link list, resuming from the saved checkpoint
    Scrape {
        /// Ignore saved progress and start from the first link
        #[arg(long)]
        fresh: bool,
    },

    /// Show the saved checkpoint and exit
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl { fresh } => {
            let shutdown = Shutdown::new();
            let _ctrl_c = shutdown.listen_for_ctrl_c();
            let report = run_crawl(&config, fresh, shutdown).await.inspect_err(|e| {
                tracing::error!("Crawl failed: {}", e);
            })?;
            if report.interrupted {
                tracing::info!("Crawl interrupted; run again to continue it");
            }
        }
        Command::Scrape { fresh } => {
            let shutdown = Shutdown::new();
            let _ctrl_c = shutdown.listen_for_ctrl_c();
            let stats = run_scrape(&config, fresh, shutdown).await.inspect_err(|e| {
                tracing::error!("Scrape failed: {}", e);
            })?;
            if stats.interrupted {
                tracing::info!("Run again to resume at index {}", stats.next_index);
            } else if stats.is_complete() {
                tracing::info!("All links processed");
            }
        }
        Command::Status => {
            let (cursor, total) = load_status(&config);
            print_status(cursor, total);
        }
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
            0 => EnvFilter::new("cursor_crawl=info,warn"),
            1 => EnvFilter::new("cursor_crawl=debug,info"),
            2 => EnvFilter::new("cursor_crawl=trace,debug"),
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
