//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, mut settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            set_value(&mut settings, key, value)?;
            settings.save()?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save()?;
                Output::info(&format!("Created default config at {:?}", config_path));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

            Output::info(&format!("Opening config in {}...", editor));

            let status = std::process::Command::new(&editor)
                .arg(&config_path)
                .status();

            match status {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {:?}", config_path));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Apply one dotted-key assignment to the settings.
fn set_value(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "llm.model" => settings.llm.model = value.to_string(),
        "llm.base_url" => settings.llm.base_url = value.to_string(),
        "llm.temperature" => settings.llm.temperature = value.parse()?,
        "memory.enabled" => settings.memory.enabled = value.parse()?,
        "memory.storage_dir" => settings.memory.storage_dir = value.to_string(),
        "mcp.server_url" => settings.mcp.server_url = value.to_string(),
        "mcp.cache_path" => settings.mcp.cache_path = value.to_string(),
        "mcp.cache_max_age_hours" => settings.mcp.cache_max_age_hours = value.parse()?,
        "bench.repetitions" => settings.bench.repetitions = value.parse()?,
        "bench.timeout_seconds" => settings.bench.timeout_seconds = value.parse()?,
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut settings = Settings::default();
        set_value(&mut settings, "llm.model", "openai/gpt-4o").unwrap();
        set_value(&mut settings, "mcp.cache_max_age_hours", "12").unwrap();
        assert_eq!(settings.llm.model, "openai/gpt-4o");
        assert_eq!(settings.mcp.cache_max_age_hours, 12);
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "nope.nothing", "1").is_err());
    }

    #[test]
    fn test_set_bad_number_fails() {
        let mut settings = Settings::default();
        assert!(set_value(&mut settings, "bench.repetitions", "many").is_err());
    }
}
