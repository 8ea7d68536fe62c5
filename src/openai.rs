//! OpenRouter client configuration with sensible defaults.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

use crate::config::LlmSettings;

/// Default timeout for chat-completion requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for an OpenAI-compatible endpoint (OpenRouter by default).
///
/// The API key comes from `OPENROUTER_API_KEY`; base URL and model come from
/// configuration. Uses a 5-minute timeout to prevent hung API calls.
pub fn create_client(llm: &LlmSettings) -> Client<OpenAIConfig> {
    create_client_with_timeout(llm, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a client with a custom request timeout.
pub fn create_client_with_timeout(llm: &LlmSettings, timeout: Duration) -> Client<OpenAIConfig> {
    let api_key = std::env::var("OPENROUTER_API_KEY").unwrap_or_default();

    let config = OpenAIConfig::new()
        .with_api_base(llm.base_url.clone())
        .with_api_key(api_key);

    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(config).with_http_client(http_client)
}
