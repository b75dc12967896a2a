//! # driftwatch
//!
//! Polls append-only telemetry CSVs and appends detected anomalies to an
//! output file, driven by a JSON mapping of sources to algorithms.

use std::path::PathBuf;
use std::process;
use std::thread;
use std::time::Duration;

use clap::Parser;
use pipeline_facade::{PollingConfig, PollingScheduler, ShutdownFlag};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Forced exit deadline once a second shutdown path is needed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(about = "Streaming anomaly detection over polled CSV telemetry", long_about = None)]
struct Cli {
    /// JSON file mapping source CSV paths to algorithm names
    #[arg(short, long)]
    mapping_file: PathBuf,

    /// CSV file anomalies are appended to
    #[arg(short, long, default_value = "anomalies.csv")]
    anomaly_file: PathBuf,

    /// JSON file cursor positions are persisted to
    #[arg(short, long, default_value = "cursors.json")]
    state_file: PathBuf,

    /// Seconds between polling cycles
    #[arg(short, long, default_value = "30")]
    polling_interval: u64,

    /// Process every source once and exit
    #[arg(long)]
    run_once: bool,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driftwatch=info,pipeline_core=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = PollingConfig {
        mapping_file: cli.mapping_file,
        anomaly_file: cli.anomaly_file,
        state_file: cli.state_file,
        interval_secs: cli.polling_interval,
        run_once: cli.run_once,
    };
    let run_once = config.run_once;
    let scheduler = PollingScheduler::new(config);

    if run_once {
        match scheduler.run_once() {
            Ok(summary) => {
                info!(
                    sources = summary.sources,
                    rows = summary.rows_read,
                    anomalies = summary.anomalies,
                    "single pass complete"
                );
            }
            Err(err) => {
                error!(error = %err, "polling pass failed");
                process::exit(1);
            }
        }
        return;
    }

    let shutdown = ShutdownFlag::new();
    let handler_flag = shutdown.clone();
    let handler = ctrlc::set_handler(move || {
        if handler_flag.is_triggered() {
            return;
        }
        info!("interrupt received, shutting down");
        handler_flag.trigger();
        // If workers fail to wind down in time, stop waiting on them.
        let grace = thread::spawn(|| {
            thread::sleep(SHUTDOWN_GRACE);
            process::exit(1);
        });
        drop(grace);
    });
    if let Err(err) = handler {
        warn!(error = %err, "cannot install interrupt handler");
    }

    if let Err(err) = scheduler.run_continuous(&shutdown) {
        error!(error = %err, "polling failed");
        process::exit(1);
    }
}
