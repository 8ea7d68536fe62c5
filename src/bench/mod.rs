//! Memory benchmark harness.
//!
//! Drives the agent entry point as a subprocess under two conditions (memory
//! store enabled vs. disabled) and aggregates latency statistics into a
//! JSON/CSV report.

mod harness;
mod report;

pub use harness::{
    parse_result_line, BenchmarkHarness, EntryPoint, FAILURE_SENTINEL_SECS, RESULT_MARKER,
};
pub use report::{BenchmarkReport, CaseResult, Grade, Metadata, ModeStats, Summary};

use serde::{Deserialize, Serialize};

/// One query in the benchmark suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkCase {
    pub name: String,
    pub query: String,
    /// Tools the case is expected to exercise. Informational only.
    #[serde(default)]
    pub expected_tools: Vec<String>,
}

impl BenchmarkCase {
    fn new(name: &str, query: &str, expected_tools: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            query: query.to_string(),
            expected_tools: expected_tools.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The standard benchmark suite.
    pub fn default_suite() -> Vec<BenchmarkCase> {
        vec![
            BenchmarkCase::new(
                "simple_cluster_query",
                "show me all k8s clusters",
                &["get_cluster_info"],
            ),
            // Follow-ups should be answerable from memory, without tools
            BenchmarkCase::new("cluster_detail_query", "which cluster has the most pods?", &[]),
            BenchmarkCase::new("follow_up_query", "what about the production environment?", &[]),
            BenchmarkCase::new(
                "complex_analysis",
                "analyze the health status of all clusters and recommend actions",
                &["get_cluster_info"],
            ),
        ]
    }
}

/// The memory condition a measurement runs under. Modes differ only in the
/// storage directory handed to the subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryMode {
    Enabled,
    Disabled,
}

impl MemoryMode {
    pub fn label(&self) -> &'static str {
        match self {
            MemoryMode::Enabled => "with_memory",
            MemoryMode::Disabled => "without_memory",
        }
    }
}

/// Outcome of a single measurement: one (case, repetition, mode) run.
///
/// Failed runs carry sentinel timings deliberately distinguishable from real
/// measurements: the timeout ceiling for timed-out runs, 999.0 for crashes and
/// unparsable output. Sentinels are folded into the aggregates so failures
/// inflate the averages visibly instead of disappearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRun {
    #[serde(rename = "response_time")]
    pub response_time_seconds: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BenchmarkRun {
    /// A successful measurement.
    pub fn ok(response_time_seconds: f64) -> Self {
        Self {
            response_time_seconds,
            success: true,
            error: None,
        }
    }

    /// A failed measurement with a sentinel timing.
    pub fn failed(sentinel_seconds: f64, error: &str) -> Self {
        Self {
            response_time_seconds: sentinel_seconds,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Percentage improvement of the "with" mean over the "without" mean.
///
/// Defined as 0 when the denominator is 0 (a defined no-op value, not a
/// measured improvement). Negative when memory degrades performance.
pub fn improvement_percent(mean_without: f64, mean_with: f64) -> f64 {
    if mean_without > 0.0 {
        (mean_without - mean_with) / mean_without * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_zero_denominator() {
        assert_eq!(improvement_percent(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_improvement_positive() {
        assert_eq!(improvement_percent(2.0, 1.0), 50.0);
    }

    #[test]
    fn test_improvement_negative_when_memory_slower() {
        assert!(improvement_percent(1.0, 2.0) < 0.0);
    }

    #[test]
    fn test_default_suite_has_four_cases() {
        let suite = BenchmarkCase::default_suite();
        assert_eq!(suite.len(), 4);
        assert_eq!(suite[0].name, "simple_cluster_query");
    }

    #[test]
    fn test_run_serialization_uses_response_time_key() {
        let run = BenchmarkRun::ok(1.5);
        let json = serde_json::to_string(&run).unwrap();
        assert!(json.contains("\"response_time\":1.5"));
        assert!(!json.contains("error"));
    }
}
