//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::mcp::cache;
use crate::memory::MemoryStore;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Opsagent Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Memory Store").bold());
    let memory_check = check_memory_dir(settings);
    memory_check.print();
    checks.push(memory_check);

    println!();

    println!("{}", style("Tool Cache").bold());
    let cache_check = check_tool_cache(settings);
    cache_check.print();
    checks.push(cache_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using opsagent.",
            errors
        ));
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        Output::warning(&format!("{} warning(s) found.", warnings));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

fn check_api_key() -> CheckResult {
    match std::env::var("OPENROUTER_API_KEY") {
        Ok(key) if !key.is_empty() => CheckResult::ok("OPENROUTER_API_KEY", "configured"),
        _ => CheckResult::error(
            "OPENROUTER_API_KEY",
            "not set",
            "export OPENROUTER_API_KEY='sk-or-...'",
        ),
    }
}

fn check_memory_dir(settings: &Settings) -> CheckResult {
    let store = MemoryStore::new(settings.storage_dir(), settings.memory.enabled);

    if !settings.memory.enabled {
        CheckResult::ok("storage", "memory disabled in configuration")
    } else if store.exists() {
        CheckResult::ok("storage", &format!("{}", store.dir().display()))
    } else {
        CheckResult::warning(
            "storage",
            "directory does not exist yet",
            "it will be created on the first crew run",
        )
    }
}

fn check_tool_cache(settings: &Settings) -> CheckResult {
    let path = settings.tool_cache_path();

    if !path.exists() {
        return CheckResult::warning(
            "cache",
            "no tool cache yet",
            "run 'opsagent tools refresh' to discover tools",
        );
    }

    if cache::is_stale(&path, settings.tool_cache_max_age()) {
        CheckResult::warning(
            "cache",
            "stale or unreadable",
            "run 'opsagent tools refresh' to update it",
        )
    } else {
        let count = cache::load_all(&path).map(|t| t.len()).unwrap_or(0);
        CheckResult::ok("cache", &format!("fresh, {} tools", count))
    }
}

fn check_config_file() -> CheckResult {
    let path = Settings::default_config_path();
    if path.exists() {
        CheckResult::ok("config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "config file",
            "not found, using defaults",
            "run 'opsagent config show' to inspect the effective values",
        )
    }
}
