//! Configuration settings for opsagent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub memory: MemorySettings,
    pub mcp: McpSettings,
    pub bench: BenchSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.opsagent".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// LLM provider settings (OpenAI-compatible endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model identifier (e.g. "openai/gpt-4o-mini" on OpenRouter).
    pub model: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Sampling temperature for agent runs.
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "openai/gpt-4o-mini".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            temperature: 0.1,
        }
    }
}

/// Memory store settings.
///
/// The memory store itself is an external collaborator; opsagent only resolves
/// its on-disk directory and checks existence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    /// Whether crew runs record to the memory store.
    pub enabled: bool,
    /// Directory backing the memory store.
    pub storage_dir: String,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_dir: "~/.opsagent/memory".to_string(),
        }
    }
}

/// MCP tool discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// URL of the MCP server to discover tools from.
    pub server_url: String,
    /// Path to the on-disk tool cache file.
    pub cache_path: String,
    /// Maximum cache age in hours before rediscovery.
    pub cache_max_age_hours: u64,
    /// Case-insensitive name prefixes selecting which cached tools are
    /// exposed to the agent. An empty match falls back to the full set.
    pub tool_prefixes: Vec<String>,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            server_url: "https://mcp.api-inference.modelscope.net/sse".to_string(),
            cache_path: "~/.opsagent/tools_cache.json".to_string(),
            cache_max_age_hours: 24,
            tool_prefixes: vec![
                "list_".to_string(),
                "get_".to_string(),
                "describe_".to_string(),
            ],
        }
    }
}

/// Benchmark harness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    /// Repetitions per case in normal mode.
    pub repetitions: usize,
    /// Repetitions per case with --detailed.
    pub detailed_repetitions: usize,
    /// Per-measurement subprocess timeout in seconds.
    pub timeout_seconds: u64,
    /// Storage directory passed to memory-disabled runs.
    pub disabled_storage_dir: String,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            repetitions: 3,
            detailed_repetitions: 5,
            timeout_seconds: 120,
            disabled_storage_dir: "/tmp/opsagent_no_memory".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::OpsError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("opsagent")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded memory storage directory.
    pub fn storage_dir(&self) -> PathBuf {
        Self::expand_path(&self.memory.storage_dir)
    }

    /// Get the expanded tool cache path.
    pub fn tool_cache_path(&self) -> PathBuf {
        Self::expand_path(&self.mcp.cache_path)
    }

    /// Maximum tool cache age as a duration.
    pub fn tool_cache_max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.mcp.cache_max_age_hours as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.mcp.cache_max_age_hours, 24);
        assert_eq!(settings.bench.repetitions, 3);
        assert!(settings.memory.enabled);
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings::default();
        let content = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&content).unwrap();
        assert_eq!(parsed.llm.model, settings.llm.model);
        assert_eq!(parsed.mcp.tool_prefixes, settings.mcp.tool_prefixes);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Settings = toml::from_str("[llm]\nmodel = \"qwen/qwen-2.5-72b\"\n").unwrap();
        assert_eq!(parsed.llm.model, "qwen/qwen-2.5-72b");
        assert_eq!(parsed.mcp.cache_max_age_hours, 24);
    }
}
