//! Run orchestration: tool probing, discovery, pool feeding, progress
//! reporting, and the end-of-run summary.

use std::sync::Arc;
use std::time::Instant;

use synothumb_core::{Config, ConvertPool, FileDiscovery, MediaRenderer, SystemRunner, Toolchain};

use crate::Cli;

/// Execute a full library run.
pub async fn execute(cli: &Cli, mut config: Config) -> anyhow::Result<()> {
    if !cli.library.is_dir() {
        anyhow::bail!(
            "Library path is not a directory: {:?}\n\n  Hint: pass the root of your media library.",
            cli.library
        );
    }

    apply_cli_overrides(cli, &mut config);

    // Video support is mandatory; abort before scheduling anything
    let toolchain = Toolchain::probe()?;
    tracing::debug!(?toolchain, "probed external tools");

    // Discovery phase
    let discovery_start = Instant::now();
    let files = FileDiscovery::new(&config.processing).discover(&cli.library);
    let discovery_elapsed = discovery_start.elapsed();
    if files.is_empty() {
        tracing::warn!("No supported media files found at {:?}", cli.library);
        return Ok(());
    }
    tracing::info!(
        "Found {} media file(s) in {:.1}s",
        files.len(),
        discovery_elapsed.as_secs_f64()
    );

    // Conversion phase
    let workers = config.worker_count();
    tracing::info!("Starting {workers} workers");
    let renderer = Arc::new(MediaRenderer::new(&config, toolchain, Arc::new(SystemRunner)));
    let (pool, mut outcomes) =
        ConvertPool::spawn(renderer, workers, config.processing.queue_depth);

    let progress = create_progress_bar(files.len() as u64);
    let process_start = Instant::now();
    let reporter = {
        let progress = progress.clone();
        tokio::spawn(async move {
            let mut done: u64 = 0;
            while let Some(_outcome) = outcomes.recv().await {
                done += 1;
                progress.inc(1);
                let elapsed = process_start.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    progress.set_message(format!("{:.1} files/sec", done as f64 / elapsed));
                }
            }
        })
    };

    for path in files {
        pool.submit(path).await;
    }
    let stats = pool.wait_for_completion().await;
    // Outcome sender is gone once the workers exit, so the reporter drains
    let _ = reporter.await;

    progress.finish_and_clear();
    print_summary(stats, discovery_elapsed, process_start.elapsed());

    Ok(())
}

/// Fold command-line flags into the loaded config. Flags win over the
/// config file; absent flags leave the file values alone.
fn apply_cli_overrides(cli: &Cli, config: &mut Config) {
    if let Some(workers) = cli.workers {
        config.processing.workers = workers;
    }
}

/// Create a progress bar for the conversion phase.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary after the run.
fn print_summary(
    stats: synothumb_core::PoolStats,
    discovery: std::time::Duration,
    processing: std::time::Duration,
) {
    let rate = if processing.as_secs_f64() > 0.0 {
        stats.completed as f64 / processing.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Completed:    {:>8}", stats.completed);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    if stats.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.skipped);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", stats.total());
    eprintln!("    Discovery:    {:>7.1}s", discovery.as_secs_f64());
    eprintln!("    Processing:   {:>7.1}s", processing.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} files/sec", rate);
    eprintln!("  ====================================");
}
