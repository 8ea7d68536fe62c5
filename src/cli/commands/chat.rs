//! Interactive chat command.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::crew::Crew;
use crate::error::{OpsError, Result};
use console::style;
use std::io::{self, BufRead, Write};

/// Read one line from stdin without blocking the runtime.
///
/// Returns `None` on EOF so the caller can close the session cleanly.
async fn read_user_line() -> io::Result<Option<String>> {
    tokio::task::spawn_blocking(|| {
        let mut input = String::new();
        let bytes = io::stdin().lock().read_line(&mut input)?;
        Ok(if bytes == 0 { None } else { Some(input) })
    })
    .await
    .map_err(io::Error::other)?
}

/// Run the interactive chat loop.
///
/// Ctrl-C at the prompt or while a request is in flight prints a goodbye
/// message and returns [`OpsError::Interrupted`], so the process exits
/// with a non-zero status instead of dying silently on the signal.
pub async fn run_chat(settings: Settings) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Ask) {
        Output::error(&format!("{}", e));
        Output::info("Run 'opsagent doctor' for detailed diagnostics.");
        return Err(e);
    }

    let spinner = Output::spinner("Preparing crew (discovering tools)...");
    let crew = Crew::from_settings(&settings).await?;
    spinner.finish_and_clear();

    println!("\n{}", style("Platform Agent").bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit.").dim()
    );

    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let line = tokio::select! {
            line = read_user_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                Output::info("Goodbye!");
                return Err(OpsError::Interrupted);
            }
        };

        let Some(input) = line else {
            // EOF
            Output::info("Goodbye!");
            break;
        };

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit")
            || input.eq_ignore_ascii_case("quit")
            || input.eq_ignore_ascii_case("q")
        {
            Output::info("Goodbye!");
            break;
        }

        let spinner = Output::spinner("Processing your request...");
        let result = tokio::select! {
            result = crew.kickoff(input) => result,
            _ = tokio::signal::ctrl_c() => {
                spinner.finish_and_clear();
                println!();
                Output::info("Goodbye!");
                return Err(OpsError::Interrupted);
            }
        };
        match result {
            Ok(response) => {
                spinner.finish_and_clear();
                println!("\n{}\n{}\n", style("Result:").cyan().bold(), response);
            }
            Err(e) => {
                spinner.finish_and_clear();
                // One failed request should not end the session
                Output::error(&format!("An error occurred: {}", e));
                Output::info("Please try again or type 'exit' to quit.");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupted_error_carries_a_message() {
        let err = OpsError::Interrupted;
        assert_eq!(err.to_string(), "Interrupted by user");
    }
}
