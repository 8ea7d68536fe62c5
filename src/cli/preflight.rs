//! Pre-flight checks before operations that call the LLM provider.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{OpsError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Chat and ask require the provider API key.
    Ask,
    /// Benchmarking drives ask subprocesses, so it needs the key too.
    Bench,
    /// Cache inspection has no external requirements.
    ToolsInspect,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Ask | Operation::Bench => {
            check_api_key()?;
        }
        Operation::ToolsInspect => {
            // No external requirements
        }
    }
    Ok(())
}

/// Check if the OpenRouter API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENROUTER_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(OpsError::Config(
            "OPENROUTER_API_KEY is empty. Set it with: export OPENROUTER_API_KEY='sk-or-...'"
                .to_string(),
        )),
        Err(_) => Err(OpsError::Config(
            "OPENROUTER_API_KEY not set. Set it with: export OPENROUTER_API_KEY='sk-or-...'"
                .to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tools_inspect_has_no_requirements() {
        assert!(check(Operation::ToolsInspect).is_ok());
    }
}
