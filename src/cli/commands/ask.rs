//! One-shot ask command. Doubles as the benchmark entry point.

use crate::bench::{BenchmarkRun, FAILURE_SENTINEL_SECS, RESULT_MARKER};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::crew::Crew;
use crate::error::Result;
use std::time::Instant;

/// Run a single query through the crew.
///
/// With `benchmark` set, always exits successfully and emits one
/// machine-readable result line on stdout containing the wall-clock timing,
/// for consumption by the benchmark harness.
pub async fn run_ask(query: &str, benchmark: bool, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask) {
        if benchmark {
            emit_result(&preflight_failure_run(&e));
            return Ok(());
        }
        Output::error(&format!("{}", e));
        return Err(e);
    }

    if benchmark {
        let started = Instant::now();
        let outcome = async {
            let crew = Crew::from_settings(&settings).await?;
            crew.kickoff(query).await
        }
        .await;
        let elapsed = started.elapsed().as_secs_f64();

        let run = match outcome {
            Ok(_) => BenchmarkRun::ok(elapsed),
            Err(e) => BenchmarkRun {
                response_time_seconds: elapsed,
                success: false,
                error: Some(e.to_string()),
            },
        };
        emit_result(&run);
        return Ok(());
    }

    let spinner = Output::spinner("Processing your request...");
    let crew = Crew::from_settings(&settings).await?;
    let response = crew.kickoff(query).await;
    spinner.finish_and_clear();

    match response {
        Ok(answer) => {
            println!("{}", answer);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("An error occurred: {}", e));
            Err(e)
        }
    }
}

/// Print the single-line result the harness scans for.
fn emit_result(run: &BenchmarkRun) {
    match serde_json::to_string(run) {
        Ok(json) => println!("{} {}", RESULT_MARKER, json),
        Err(e) => eprintln!("Failed to serialize benchmark result: {}", e),
    }
}

/// Result emitted when pre-flight fails before any timing started.
/// Carries the failure sentinel, never a real-looking timing.
fn preflight_failure_run(error: &crate::error::OpsError) -> BenchmarkRun {
    BenchmarkRun::failed(FAILURE_SENTINEL_SECS, &error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpsError;

    #[test]
    fn test_preflight_failure_uses_the_failure_sentinel() {
        let run = preflight_failure_run(&OpsError::Config("key missing".to_string()));
        assert!(!run.success);
        assert_eq!(run.response_time_seconds, FAILURE_SENTINEL_SECS);
        assert_eq!(run.error.as_deref(), Some("Configuration error: key missing"));
    }
}

