//! Logging initialization.
//!
//! Logs go to stderr via `tracing-subscriber` so they never interleave
//! with the progress bar or summary. `RUST_LOG` overrides everything.

use synothumb_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem from the config file, letting the CLI
/// flags override: `--verbose` forces debug level, `--json-logs` forces
/// JSON output.
pub fn init(config: &Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json_logs || config.logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}
