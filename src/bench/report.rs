//! Benchmark report: aggregate statistics, grading, JSON and CSV output.

use crate::error::Result;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Per-mode latency statistics for one case.
#[derive(Debug, Clone, Serialize)]
pub struct ModeStats {
    pub avg_time: f64,
    pub min_time: f64,
    pub max_time: f64,
    pub times: Vec<f64>,
}

impl ModeStats {
    /// Compute stats over the raw per-repetition timings.
    pub fn from_times(times: &[f64]) -> Self {
        let avg_time = if times.is_empty() {
            0.0
        } else {
            times.iter().sum::<f64>() / times.len() as f64
        };
        let min_time = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max_time = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            avg_time,
            min_time: if min_time.is_finite() { min_time } else { 0.0 },
            max_time: if max_time.is_finite() { max_time } else { 0.0 },
            times: times.to_vec(),
        }
    }
}

/// Aggregated result for one benchmark case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub test_case: String,
    pub query: String,
    pub runs: usize,
    pub with_memory: ModeStats,
    pub without_memory: ModeStats,
    pub improvement_percent: f64,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub timestamp: String,
    pub platform: String,
    pub version: String,
}

impl Metadata {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            platform: std::env::consts::OS.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Ordinal performance grade derived from the mean improvement percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    APlus,
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Map the mean improvement to a grade via fixed thresholds.
    pub fn from_improvement(improvement_percent: f64) -> Self {
        if improvement_percent >= 50.0 {
            Grade::APlus
        } else if improvement_percent >= 30.0 {
            Grade::A
        } else if improvement_percent >= 10.0 {
            Grade::B
        } else if improvement_percent >= 0.0 {
            Grade::C
        } else {
            Grade::D
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::APlus => "A+ (excellent)",
            Grade::A => "A (good)",
            Grade::B => "B (acceptable)",
            Grade::C => "C (needs tuning)",
            Grade::D => "D (needs improvement)",
        };
        write!(f, "{}", s)
    }
}

impl Serialize for Grade {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Aggregate statistics over the whole suite.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_test_cases: usize,
    pub avg_improvement_percent: f64,
    pub max_improvement_percent: f64,
    pub min_improvement_percent: f64,
    pub avg_response_time_with_memory: f64,
    pub avg_response_time_without_memory: f64,
    pub performance_grade: Grade,
}

/// Full benchmark report, written once at the end of a session.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub metadata: Metadata,
    pub benchmarks: Vec<CaseResult>,
    pub summary: Summary,
}

/// Compute the suite summary from per-case results.
pub fn summarize(benchmarks: &[CaseResult]) -> Summary {
    let n = benchmarks.len();
    if n == 0 {
        return Summary {
            total_test_cases: 0,
            avg_improvement_percent: 0.0,
            max_improvement_percent: 0.0,
            min_improvement_percent: 0.0,
            avg_response_time_with_memory: 0.0,
            avg_response_time_without_memory: 0.0,
            performance_grade: Grade::from_improvement(0.0),
        };
    }

    let improvements: Vec<f64> = benchmarks.iter().map(|b| b.improvement_percent).collect();
    let avg_improvement = improvements.iter().sum::<f64>() / n as f64;

    Summary {
        total_test_cases: n,
        avg_improvement_percent: avg_improvement,
        max_improvement_percent: improvements.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        min_improvement_percent: improvements.iter().copied().fold(f64::INFINITY, f64::min),
        avg_response_time_with_memory: benchmarks
            .iter()
            .map(|b| b.with_memory.avg_time)
            .sum::<f64>()
            / n as f64,
        avg_response_time_without_memory: benchmarks
            .iter()
            .map(|b| b.without_memory.avg_time)
            .sum::<f64>()
            / n as f64,
        performance_grade: Grade::from_improvement(avg_improvement),
    }
}

impl BenchmarkReport {
    /// Write the report as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Export a flattened CSV: one row per case.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut out = String::from(
            "test_case,query,runs,avg_time_with_memory,avg_time_without_memory,improvement_percent\n",
        );

        for b in &self.benchmarks {
            out.push_str(&format!(
                "{},{},{},{:.3},{:.3},{:.1}\n",
                csv_field(&b.test_case),
                csv_field(&b.query),
                b.runs,
                b.with_memory.avg_time,
                b.without_memory.avg_time,
                b.improvement_percent
            ));
        }

        std::fs::write(path, out)?;
        Ok(())
    }

    /// Default report filename, timestamped.
    pub fn default_filename() -> String {
        format!(
            "memory_benchmark_report_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        )
    }
}

/// Quote a CSV field when it contains a delimiter or quote.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, with: f64, without: f64) -> CaseResult {
        CaseResult {
            test_case: name.to_string(),
            query: format!("query for {}", name),
            runs: 3,
            with_memory: ModeStats::from_times(&[with, with, with]),
            without_memory: ModeStats::from_times(&[without, without, without]),
            improvement_percent: crate::bench::improvement_percent(without, with),
        }
    }

    #[test]
    fn test_mode_stats() {
        let stats = ModeStats::from_times(&[1.0, 2.0, 3.0]);
        assert_eq!(stats.avg_time, 2.0);
        assert_eq!(stats.min_time, 1.0);
        assert_eq!(stats.max_time, 3.0);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_improvement(55.0), Grade::APlus);
        assert_eq!(Grade::from_improvement(50.0), Grade::APlus);
        assert_eq!(Grade::from_improvement(35.0), Grade::A);
        assert_eq!(Grade::from_improvement(15.0), Grade::B);
        assert_eq!(Grade::from_improvement(5.0), Grade::C);
        assert_eq!(Grade::from_improvement(-5.0), Grade::D);
    }

    #[test]
    fn test_summary_half_improvement_is_top_grade() {
        // All with-memory runs at 1.0s, all without-memory at 2.0s
        let benchmarks = vec![case("one", 1.0, 2.0)];
        let summary = summarize(&benchmarks);
        assert_eq!(summary.avg_improvement_percent, 50.0);
        assert_eq!(summary.performance_grade, Grade::APlus);
    }

    #[test]
    fn test_summary_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_test_cases, 0);
        assert_eq!(summary.avg_improvement_percent, 0.0);
    }

    #[test]
    fn test_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let report = BenchmarkReport {
            metadata: Metadata::now(),
            benchmarks: vec![CaseResult {
                test_case: "q".to_string(),
                query: "hello, \"world\"".to_string(),
                runs: 1,
                with_memory: ModeStats::from_times(&[1.0]),
                without_memory: ModeStats::from_times(&[2.0]),
                improvement_percent: 50.0,
            }],
            summary: summarize(&[]),
        };

        report.export_csv(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("test_case,query,runs"));
        assert!(content.contains("\"hello, \"\"world\"\"\""));
        assert!(content.contains("50.0"));
    }

    #[test]
    fn test_json_report_shape() {
        let report = BenchmarkReport {
            metadata: Metadata::now(),
            benchmarks: vec![case("one", 1.0, 2.0)],
            summary: summarize(&[case("one", 1.0, 2.0)]),
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
        assert!(value["metadata"]["timestamp"].is_string());
        assert_eq!(value["benchmarks"][0]["test_case"], "one");
        assert_eq!(value["summary"]["performance_grade"], "A+ (excellent)");
    }
}
