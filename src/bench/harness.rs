//! Subprocess measurement and suite execution.

use super::report::{BenchmarkReport, CaseResult, Metadata, ModeStats};
use super::{improvement_percent, BenchmarkCase, BenchmarkRun, MemoryMode};
use crate::config::Settings;
use crate::error::{OpsError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Marker preceding the single-line JSON result in the subprocess output.
pub const RESULT_MARKER: &str = "BENCHMARK_RESULT:";

/// Sentinel timing for runs that failed before a measurement was taken.
pub const FAILURE_SENTINEL_SECS: f64 = 999.0;

/// Name of the environment variable carrying the storage directory to the
/// subprocess. Set per launch, never on this process's own environment.
pub const STORAGE_DIR_ENV: &str = "OPSAGENT_STORAGE_DIR";

/// The external executable the harness drives.
#[derive(Debug, Clone)]
pub struct EntryPoint {
    pub program: PathBuf,
    /// Arguments placed before the query.
    pub args: Vec<String>,
}

impl EntryPoint {
    /// The current opsagent binary in one-shot benchmark mode.
    pub fn current_exe() -> Result<Self> {
        let program = std::env::current_exe()
            .map_err(|e| OpsError::Benchmark(format!("Cannot locate own executable: {e}")))?;
        Ok(Self {
            program,
            args: vec!["ask".to_string(), "--benchmark".to_string()],
        })
    }
}

/// Drives the entry point repeatedly and aggregates latency statistics.
pub struct BenchmarkHarness {
    entry: EntryPoint,
    timeout: Duration,
    enabled_dir: PathBuf,
    disabled_dir: PathBuf,
    /// Pause between repetitions to avoid overlapping load.
    pause: Duration,
}

impl BenchmarkHarness {
    /// Create a harness from settings, driving the given entry point.
    pub fn new(entry: EntryPoint, settings: &Settings) -> Self {
        Self {
            entry,
            timeout: Duration::from_secs(settings.bench.timeout_seconds),
            enabled_dir: settings.storage_dir(),
            disabled_dir: Settings::expand_path(&settings.bench.disabled_storage_dir),
            pause: Duration::from_secs(1),
        }
    }

    /// Override the measurement timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the pause between repetitions.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    fn storage_dir(&self, mode: MemoryMode) -> &PathBuf {
        match mode {
            MemoryMode::Enabled => &self.enabled_dir,
            MemoryMode::Disabled => &self.disabled_dir,
        }
    }

    /// Run one measurement: spawn the entry point with the mode's storage
    /// directory, enforce the timeout, and parse the result marker from the
    /// combined output.
    ///
    /// Always returns within timeout plus epsilon; never errors. Timeouts are
    /// recorded with the timeout ceiling as timing, any other failure with the
    /// 999.0 sentinel.
    pub async fn measure_once(&self, query: &str, mode: MemoryMode) -> BenchmarkRun {
        debug!("Measuring {:?} ({})", query, mode.label());

        let mut command = Command::new(&self.entry.program);
        command
            .args(&self.entry.args)
            .arg(query)
            .env(STORAGE_DIR_ENV, self.storage_dir(mode))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Entry point failed to run: {}", e);
                return BenchmarkRun::failed(FAILURE_SENTINEL_SECS, &e.to_string());
            }
            Err(_) => {
                warn!("Measurement timed out after {:?}", self.timeout);
                return BenchmarkRun::failed(self.timeout.as_secs_f64(), "Timeout");
            }
        };

        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        match parse_result_line(&combined) {
            Some(run) => run,
            None => BenchmarkRun::failed(
                FAILURE_SENTINEL_SECS,
                "No benchmark result found in output",
            ),
        }
    }

    /// Run the full suite: every case, `repetitions` times, under both modes,
    /// with a fixed pause between repetitions.
    ///
    /// A failed run never aborts the suite; its sentinel timing is folded into
    /// the statistics.
    pub async fn run_suite(
        &self,
        cases: &[BenchmarkCase],
        repetitions: usize,
    ) -> BenchmarkReport {
        let mut results = Vec::with_capacity(cases.len());

        for (i, case) in cases.iter().enumerate() {
            info!("Case {}/{}: {}", i + 1, cases.len(), case.name);

            let mut with_times = Vec::with_capacity(repetitions);
            let mut without_times = Vec::with_capacity(repetitions);

            for rep in 0..repetitions {
                debug!("Repetition {}/{}", rep + 1, repetitions);

                let with = self.measure_once(&case.query, MemoryMode::Enabled).await;
                with_times.push(with.response_time_seconds);

                let without = self.measure_once(&case.query, MemoryMode::Disabled).await;
                without_times.push(without.response_time_seconds);

                tokio::time::sleep(self.pause).await;
            }

            let with_memory = ModeStats::from_times(&with_times);
            let without_memory = ModeStats::from_times(&without_times);
            let improvement = improvement_percent(without_memory.avg_time, with_memory.avg_time);

            results.push(CaseResult {
                test_case: case.name.clone(),
                query: case.query.clone(),
                runs: repetitions,
                with_memory,
                without_memory,
                improvement_percent: improvement,
            });
        }

        let summary = super::report::summarize(&results);

        BenchmarkReport {
            metadata: Metadata::now(),
            benchmarks: results,
            summary,
        }
    }
}

/// Scan combined subprocess output for the result marker and parse the JSON
/// object that follows it on the same line.
pub fn parse_result_line(output: &str) -> Option<BenchmarkRun> {
    for line in output.lines() {
        if let Some(idx) = line.find(RESULT_MARKER) {
            let payload = line[idx + RESULT_MARKER.len()..].trim();
            match serde_json::from_str::<BenchmarkRun>(payload) {
                Ok(run) => return Some(run),
                Err(e) => {
                    warn!("Malformed benchmark result line: {}", e);
                    return None;
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh_harness(timeout_secs: u64) -> BenchmarkHarness {
        let settings = Settings::default();
        let entry = EntryPoint {
            program: PathBuf::from("/bin/sh"),
            args: vec!["-c".to_string()],
        };
        BenchmarkHarness::new(entry, &settings)
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_pause(Duration::from_millis(0))
    }

    #[test]
    fn test_parse_result_line() {
        let output = "noise\nBENCHMARK_RESULT: {\"response_time\": 1.25, \"success\": true}\nmore";
        let run = parse_result_line(output).unwrap();
        assert_eq!(run.response_time_seconds, 1.25);
        assert!(run.success);
    }

    #[test]
    fn test_parse_result_line_with_error_field() {
        let output = "BENCHMARK_RESULT: {\"response_time\": 0.1, \"success\": false, \"error\": \"boom\"}";
        let run = parse_result_line(output).unwrap();
        assert!(!run.success);
        assert_eq!(run.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_parse_missing_marker() {
        assert!(parse_result_line("no marker here").is_none());
    }

    #[test]
    fn test_parse_malformed_payload() {
        assert!(parse_result_line("BENCHMARK_RESULT: {oops").is_none());
    }

    #[tokio::test]
    async fn test_measure_once_success() {
        let harness = sh_harness(10);
        let run = harness
            .measure_once(
                "echo 'BENCHMARK_RESULT: {\"response_time\": 0.5, \"success\": true}'",
                MemoryMode::Enabled,
            )
            .await;
        assert!(run.success);
        assert_eq!(run.response_time_seconds, 0.5);
    }

    #[tokio::test]
    async fn test_measure_once_no_marker_is_failure_sentinel() {
        let harness = sh_harness(10);
        let run = harness.measure_once("echo hello", MemoryMode::Enabled).await;
        assert!(!run.success);
        assert_eq!(run.response_time_seconds, 999.0);
    }

    #[tokio::test]
    async fn test_measure_once_timeout_returns_ceiling() {
        let harness = sh_harness(1);
        let started = std::time::Instant::now();
        let run = harness.measure_once("sleep 30", MemoryMode::Disabled).await;

        assert!(!run.success);
        assert_eq!(run.response_time_seconds, 1.0);
        assert_eq!(run.error.as_deref(), Some("Timeout"));
        // Returns within timeout plus epsilon
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_run_suite_continues_past_failures() {
        let harness = sh_harness(10);
        let cases = vec![
            BenchmarkCase {
                name: "failing".to_string(),
                query: "echo nothing useful".to_string(),
                expected_tools: vec![],
            },
            BenchmarkCase {
                name: "passing".to_string(),
                query: "echo 'BENCHMARK_RESULT: {\"response_time\": 0.2, \"success\": true}'"
                    .to_string(),
                expected_tools: vec![],
            },
        ];

        let report = harness.run_suite(&cases, 1).await;
        assert_eq!(report.benchmarks.len(), 2);
        // The failing case carries the sentinel, inflating its averages loudly
        assert_eq!(report.benchmarks[0].with_memory.avg_time, 999.0);
        assert_eq!(report.benchmarks[1].with_memory.avg_time, 0.2);
    }
}
