//! End-to-end pipeline tests over temporary files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use pipeline_api::PollingConfig;
use pipeline_core::{PollingScheduler, ShutdownFlag};

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn mapping(&self, entries: &[(&Path, &str)]) -> PathBuf {
        let body: Vec<String> = entries
            .iter()
            .map(|(path, algorithm)| format!(r#""{}": "{}""#, path.display(), algorithm))
            .collect();
        self.write("mapping.json", &format!("{{{}}}", body.join(", ")))
    }

    fn config(&self, mapping_file: PathBuf) -> PollingConfig {
        PollingConfig {
            mapping_file,
            anomaly_file: self.dir.path().join("anomalies.csv"),
            state_file: self.dir.path().join("cursors.json"),
            interval_secs: 1,
            run_once: true,
        }
    }

    fn anomalies(&self) -> String {
        fs::read_to_string(self.dir.path().join("anomalies.csv")).unwrap_or_default()
    }
}

fn flat_then_spike(spike_at: usize, total: usize) -> String {
    let mut content = String::from("timestamp,value\n");
    for i in 0..total {
        let value = if i == spike_at { 1000.0 } else { (i % 5) as f64 };
        content.push_str(&format!("{i},{value}\n"));
    }
    content
}

#[test]
fn test_single_pass_flags_spike_once() {
    let fx = Fixture::new();
    let source = fx.write("cpu_usage.csv", &flat_then_spike(50, 51));
    let mapping = fx.mapping(&[(&source, "three-sigma")]);

    let summary = PollingScheduler::new(fx.config(mapping)).run_once().unwrap();

    assert_eq!(summary.sources, 1);
    assert_eq!(summary.rows_read, 51);
    assert_eq!(summary.anomalies, 1);

    let output = fx.anomalies();
    assert_eq!(output.lines().count(), 1);
    let line = output.lines().next().unwrap();
    assert!(line.starts_with("50,cpu_usage,1000,"));
}

#[test]
fn test_second_pass_reads_nothing_new() {
    let fx = Fixture::new();
    let source = fx.write("cpu_usage.csv", &flat_then_spike(50, 51));
    let mapping = fx.mapping(&[(&source, "three-sigma")]);
    let config = fx.config(mapping);

    let scheduler = PollingScheduler::new(config.clone());
    scheduler.run_once().unwrap();

    // Fresh scheduler resumes from the persisted cursor.
    let summary = PollingScheduler::new(config).run_once().unwrap();
    assert_eq!(summary.rows_read, 0);
    assert_eq!(summary.anomalies, 0);
    assert_eq!(fx.anomalies().lines().count(), 1);
}

#[test]
fn test_appended_rows_picked_up_next_pass() {
    let fx = Fixture::new();
    let source = fx.write("rss.csv", &flat_then_spike(usize::MAX, 60));
    let mapping = fx.mapping(&[(&source, "three-sigma")]);
    let config = fx.config(mapping);

    PollingScheduler::new(config.clone()).run_once().unwrap();

    let mut file = fs::OpenOptions::new().append(true).open(&source).unwrap();
    write!(file, "60,1.0\n61,2.0\n").unwrap();

    // A later pass resumes from the persisted cursor and sees only the
    // appended rows.
    let summary = PollingScheduler::new(config).run_once().unwrap();
    assert_eq!(summary.rows_read, 2);
    assert_eq!(summary.anomalies, 0);
}

#[test]
fn test_pid_column_flows_into_output() {
    let fx = Fixture::new();
    let mut content = String::from("timestamp,Pid,value\n");
    for i in 0..50 {
        content.push_str(&format!("{i},4242,{}\n", (i % 5) as f64));
    }
    content.push_str("50,4242,1000.0\n");
    let source = fx.write("proc_rss.csv", &content);
    let mapping = fx.mapping(&[(&source, "three-sigma")]);

    let summary = PollingScheduler::new(fx.config(mapping)).run_once().unwrap();
    assert_eq!(summary.anomalies, 1);

    let output = fx.anomalies();
    assert!(output.lines().next().unwrap().starts_with("50,proc_rss,4242,1000,"));
}

#[test]
fn test_missing_source_does_not_fail_the_pass() {
    let fx = Fixture::new();
    let present = fx.write("here.csv", "timestamp,value\n1,1.0\n2,1.0\n");
    let absent = fx.dir.path().join("gone.csv");
    let mapping = fx.mapping(&[(&present, "three-sigma"), (&absent, "three-sigma")]);

    let summary = PollingScheduler::new(fx.config(mapping)).run_once().unwrap();
    assert_eq!(summary.sources, 2);
    assert_eq!(summary.rows_read, 2);
}

#[test]
fn test_continuous_polling_stops_promptly() {
    let fx = Fixture::new();
    let source = fx.write("cpu.csv", "timestamp,value\n1,1.0\n");
    let mapping = fx.mapping(&[(&source, "three-sigma")]);
    let mut config = fx.config(mapping);
    config.run_once = false;
    config.interval_secs = 60;

    let shutdown = ShutdownFlag::new();
    let worker_flag = shutdown.clone();
    let handle = thread::spawn(move || {
        PollingScheduler::new(config).run_continuous(&worker_flag).unwrap();
    });

    // Let the first cycle run, then request shutdown.
    thread::sleep(Duration::from_millis(300));
    let start = Instant::now();
    shutdown.trigger();
    handle.join().unwrap();
    assert!(start.elapsed() < Duration::from_secs(2));

    // Cursor state survived the shutdown.
    let state = fs::read_to_string(fx.dir.path().join("cursors.json")).unwrap();
    assert!(state.contains("cpu.csv"));
}

#[test]
fn test_continuous_polling_detects_appends() {
    let fx = Fixture::new();
    let source = fx.write("cpu.csv", &flat_then_spike(usize::MAX, 60));
    let mapping = fx.mapping(&[(&source, "three-sigma")]);
    let mut config = fx.config(mapping);
    config.run_once = false;
    config.interval_secs = 1;

    let shutdown = ShutdownFlag::new();
    let worker_flag = shutdown.clone();
    let handle = thread::spawn(move || {
        PollingScheduler::new(config).run_continuous(&worker_flag).unwrap();
    });

    thread::sleep(Duration::from_millis(300));
    {
        let mut file = fs::OpenOptions::new().append(true).open(&source).unwrap();
        write!(file, "60,1000.0\n").unwrap();
    }

    // Wait for the next worker cycle to pick the append up.
    let deadline = Instant::now() + Duration::from_secs(10);
    while fx.anomalies().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(100));
    }
    shutdown.trigger();
    handle.join().unwrap();

    let output = fx.anomalies();
    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("60,cpu,1000,"));
}
