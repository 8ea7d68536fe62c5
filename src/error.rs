//! Error types for opsagent.

use thiserror::Error;

/// Library-level error type for opsagent operations.
#[derive(Error, Debug)]
pub enum OpsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("Agent error: {0}")]
    Agent(String),

    #[error("Crew execution failed: {0}")]
    Crew(String),

    #[error("Benchmark error: {0}")]
    Benchmark(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenRouter API error: {0}")]
    OpenAI(String),

    #[error("Interrupted by user")]
    Interrupted,
}

/// Result type alias for opsagent operations.
pub type Result<T> = std::result::Result<T, OpsError>;
