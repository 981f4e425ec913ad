//! synothumb CLI - generate Synology-compatible `@eaDir` thumbnails.
//!
//! Walks a media library, feeds every supported photo and video into a
//! worker pool, and writes the standardized rendition set next to each
//! source file. Already-processed files are skipped, so re-running over
//! the same library is a cheap no-op.
//!
//! # Usage
//!
//! ```bash
//! # Thumbnail a whole library
//! synothumb /volume1/photo
//!
//! # Pin the worker count, verbose logs
//! synothumb /volume1/photo --workers 4 --verbose
//! ```

use clap::Parser;
use std::path::PathBuf;

mod logging;
mod run;

/// Generate Synology-compatible @eaDir thumbnails for a media library.
#[derive(Parser, Debug)]
#[command(name = "synothumb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Media library directory to process
    #[arg(required = true)]
    library: PathBuf,

    /// Number of pool workers (default: CPUs + 1)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match synothumb_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {e}\n  Using default configuration.");
            synothumb_core::Config::default()
        }
    };
    logging::init(&config, cli.verbose, cli.json_logs);

    tracing::debug!("synothumb v{}", synothumb_core::VERSION);

    run::execute(&cli, config).await
}
