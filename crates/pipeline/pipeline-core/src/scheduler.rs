//! Polling scheduler.
//!
//! Drives detection runners either as a single sequential pass (`run_once`)
//! or continuously, with one worker thread per assigned source and a
//! supervisor that re-reads the assignment mapping between cycles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use pipeline_api::{AlgorithmAssignment, PollingConfig};
use pipeline_spi::{CursorStore, ExternalDetector, Result};
use tracing::{error, info, warn};

use crate::runner::DetectionRunner;
use crate::sink::CsvFileSink;
use crate::store::JsonCursorStore;

/// Longest uninterruptible stretch while waiting out a polling interval.
const WAIT_SLICE: Duration = Duration::from_millis(500);

/// Cooperative shutdown signal shared between the scheduler, its workers,
/// and the process signal handler.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    flag: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` in slices of at most 500ms, returning early if
    /// the flag is triggered. Returns true when the wait was interrupted.
    pub fn wait_interruptible(&self, duration: Duration) -> bool {
        let mut remaining = duration;
        while !remaining.is_zero() {
            if self.is_triggered() {
                return true;
            }
            let slice = remaining.min(WAIT_SLICE);
            thread::sleep(slice);
            remaining -= slice;
        }
        self.is_triggered()
    }
}

/// Totals for one polling pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub sources: usize,
    pub rows_read: u64,
    pub anomalies: u64,
}

struct Worker {
    stop: ShutdownFlag,
    handle: JoinHandle<()>,
}

/// Schedules detection over every source in the assignment mapping.
pub struct PollingScheduler {
    config: PollingConfig,
    external: Option<Arc<dyn ExternalDetector>>,
}

impl PollingScheduler {
    pub fn new(config: PollingConfig) -> Self {
        Self {
            config,
            external: None,
        }
    }

    /// Inject the detector that sources with non-local algorithm names are
    /// routed to.
    pub fn with_external(mut self, external: Arc<dyn ExternalDetector>) -> Self {
        self.external = Some(external);
        self
    }

    /// One sequential pass over every assigned source.
    pub fn run_once(&self) -> Result<RunSummary> {
        let assignment = AlgorithmAssignment::load(&self.config.mapping_file)?;
        let mut store = JsonCursorStore::load(&self.config.state_file);
        let sink = CsvFileSink::new(&self.config.anomaly_file);

        let mut summary = RunSummary::default();
        for (source, algorithm) in assignment.iter() {
            let mut runner = match DetectionRunner::new(source, algorithm, self.external.clone()) {
                Ok(runner) => runner,
                Err(err) => {
                    error!(source = %source.display(), error = %err, "cannot build detector");
                    continue;
                }
            };
            match runner.run_cycle(&mut store, &sink, &self.config.anomaly_file) {
                Ok(outcome) => {
                    summary.sources += 1;
                    summary.rows_read += outcome.rows_read;
                    summary.anomalies += outcome.anomalies;
                }
                Err(err) => {
                    error!(source = %source.display(), error = %err, "cycle failed");
                }
            }
        }
        store.persist()?;
        info!(
            sources = summary.sources,
            rows = summary.rows_read,
            anomalies = summary.anomalies,
            "polling pass complete"
        );
        Ok(summary)
    }

    /// Poll continuously until `shutdown` is triggered.
    ///
    /// Each assigned source gets its own worker thread running cycles at
    /// the configured interval. The supervisor re-reads the assignment
    /// mapping every interval: new sources get a fresh worker, removed
    /// sources have their worker stopped and their cursor forgotten.
    pub fn run_continuous(&self, shutdown: &ShutdownFlag) -> Result<()> {
        let store = Arc::new(Mutex::new(JsonCursorStore::load(&self.config.state_file)));
        let sink = Arc::new(CsvFileSink::new(&self.config.anomaly_file));
        let mut workers: BTreeMap<PathBuf, Worker> = BTreeMap::new();
        let mut current = AlgorithmAssignment::default();

        info!(
            mapping = %self.config.mapping_file.display(),
            interval = self.config.interval_secs,
            "polling started"
        );

        while !shutdown.is_triggered() {
            match AlgorithmAssignment::load(&self.config.mapping_file) {
                Ok(next) => {
                    for source in current.removed_in(&next) {
                        if let Some(worker) = workers.remove(&source) {
                            info!(source = %source.display(), "source unassigned, stopping worker");
                            worker.stop.trigger();
                            let _ = worker.handle.join();
                        }
                        lock(&store).forget(&source);
                    }
                    for source in current.added_in(&next) {
                        let algorithm = next.algorithm_for(&source).unwrap_or_default();
                        if let Some(worker) =
                            self.spawn_worker(&source, algorithm, store.clone(), sink.clone())
                        {
                            workers.insert(source, worker);
                        }
                    }
                    current = next;
                }
                Err(err) => {
                    warn!(error = %err, "cannot reload assignment mapping, keeping current");
                }
            }

            if let Err(err) = lock(&store).persist() {
                warn!(error = %err, "cannot persist cursor state");
            }

            if shutdown.wait_interruptible(Duration::from_secs(self.config.interval_secs)) {
                break;
            }
        }

        info!("shutdown requested, stopping workers");
        for (_, worker) in &workers {
            worker.stop.trigger();
        }
        for (source, worker) in workers {
            if worker.handle.join().is_err() {
                error!(source = %source.display(), "worker panicked");
            }
        }
        lock(&store).persist()?;
        info!("polling stopped");
        Ok(())
    }

    fn spawn_worker(
        &self,
        source: &Path,
        algorithm: &str,
        store: Arc<Mutex<JsonCursorStore>>,
        sink: Arc<CsvFileSink>,
    ) -> Option<Worker> {
        let mut runner = match DetectionRunner::new(source, algorithm, self.external.clone()) {
            Ok(runner) => runner,
            Err(err) => {
                error!(source = %source.display(), error = %err, "cannot build detector");
                return None;
            }
        };
        info!(source = %source.display(), algorithm, "starting worker");

        let stop = ShutdownFlag::new();
        let worker_stop = stop.clone();
        let interval = Duration::from_secs(self.config.interval_secs);
        let anomaly_file = self.config.anomaly_file.clone();

        let handle = thread::spawn(move || loop {
            {
                let mut store = lock(&store);
                if let Err(err) = runner.run_cycle(&mut *store, sink.as_ref(), &anomaly_file) {
                    error!(source = %runner.source().display(), error = %err, "cycle failed");
                }
                if let Err(err) = store.persist() {
                    warn!(error = %err, "cannot persist cursor state");
                }
            }
            if worker_stop.wait_interruptible(interval) {
                break;
            }
        });
        Some(Worker { stop, handle })
    }
}

fn lock(store: &Arc<Mutex<JsonCursorStore>>) -> MutexGuard<'_, JsonCursorStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
