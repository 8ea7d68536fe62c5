//! Memory benchmark command.

use crate::bench::{BenchmarkCase, BenchmarkHarness, BenchmarkReport, EntryPoint};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{OpsError, Result};
use console::style;
use std::path::PathBuf;

/// Run the benchmark suite and write the report.
pub async fn run_bench(
    detailed: bool,
    export_csv: bool,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Bench) {
        Output::error(&format!("{}", e));
        Output::info("Run 'opsagent doctor' for detailed diagnostics.");
        return Err(e);
    }

    let repetitions = if detailed {
        settings.bench.detailed_repetitions
    } else {
        settings.bench.repetitions
    };

    let cases = BenchmarkCase::default_suite();

    Output::header("Memory Benchmark");
    Output::kv("Cases", &cases.len().to_string());
    Output::kv("Repetitions per case", &repetitions.to_string());
    Output::kv(
        "Timeout per run",
        &format!("{}s", settings.bench.timeout_seconds),
    );
    println!();
    Output::info("Each case runs under both memory modes; this may take a while.");

    let harness = BenchmarkHarness::new(EntryPoint::current_exe()?, &settings);
    let report = harness.run_suite(&cases, repetitions).await;

    print_case_results(&report);
    print_summary(&report);

    let json_path = PathBuf::from(output.unwrap_or_else(BenchmarkReport::default_filename));
    report.save_json(&json_path)?;
    Output::success(&format!("Report saved to {}", json_path.display()));

    if export_csv {
        let csv_path = json_path.with_extension("csv");
        report.export_csv(&csv_path)?;
        Output::success(&format!("CSV exported to {}", csv_path.display()));
    }

    if report.summary.avg_improvement_percent >= 10.0 {
        Output::success("Benchmark passed: memory brings a significant improvement");
        Ok(())
    } else {
        Err(OpsError::Benchmark(
            "memory improvement is below the 10% threshold".to_string(),
        ))
    }
}

fn print_case_results(report: &BenchmarkReport) {
    for case in &report.benchmarks {
        println!("\n{} {}", style(">>").green(), style(&case.test_case).bold());
        Output::kv("Query", &case.query);
        Output::kv(
            "With memory",
            &format!(
                "{:.3}s avg ({:.3}s min, {:.3}s max)",
                case.with_memory.avg_time, case.with_memory.min_time, case.with_memory.max_time
            ),
        );
        Output::kv(
            "Without memory",
            &format!(
                "{:.3}s avg ({:.3}s min, {:.3}s max)",
                case.without_memory.avg_time,
                case.without_memory.min_time,
                case.without_memory.max_time
            ),
        );

        let improvement = format!("{:.1}%", case.improvement_percent);
        if case.improvement_percent > 0.0 {
            Output::kv("Improvement", &style(improvement).green().to_string());
        } else {
            Output::kv("Improvement", &style(improvement).yellow().to_string());
        }
    }
}

fn print_summary(report: &BenchmarkReport) {
    let summary = &report.summary;

    Output::header("Benchmark Summary");
    Output::kv("Test cases", &summary.total_test_cases.to_string());
    Output::kv(
        "Mean improvement",
        &format!("{:.1}%", summary.avg_improvement_percent),
    );
    Output::kv(
        "Best case",
        &format!("{:.1}%", summary.max_improvement_percent),
    );
    Output::kv(
        "Worst case",
        &format!("{:.1}%", summary.min_improvement_percent),
    );
    Output::kv(
        "Mean time with memory",
        &format!("{:.3}s", summary.avg_response_time_with_memory),
    );
    Output::kv(
        "Mean time without memory",
        &format!("{:.3}s", summary.avg_response_time_without_memory),
    );
    Output::kv("Grade", &summary.performance_grade.to_string());
}
