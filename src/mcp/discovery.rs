//! Tool discovery: refresh the on-disk cache from the MCP server when stale.

use super::cache::{self, FilterOutcome, ToolDescriptor, ToolParameters};
use super::client::McpClient;
use crate::config::Settings;
use crate::error::Result;
use tracing::{info, warn};

/// Return the tool descriptors the agent should use, refreshing the cache
/// from the MCP server first if it is stale.
///
/// Discovery failures against a usable (even stale) cache degrade to the
/// cached contents; only a failure with no cache at all yields an empty set.
pub async fn ensure_tools(settings: &Settings) -> Result<Vec<ToolDescriptor>> {
    let path = settings.tool_cache_path();
    let max_age = settings.tool_cache_max_age();

    if cache::is_stale(&path, max_age) {
        info!("Tool cache is stale, discovering tools from {}", settings.mcp.server_url);
        match refresh(settings).await {
            Ok(count) => info!("Cached {} tools", count),
            Err(e) => warn!("Tool discovery failed, using existing cache if any: {}", e),
        }
    }

    let tools = match cache::load_filtered(&path, &settings.mcp.tool_prefixes) {
        FilterOutcome::Matched(tools) => tools,
        FilterOutcome::FallBackToAll => cache::load_all(&path).unwrap_or_default(),
    };

    Ok(tools)
}

/// Force a discovery run and rewrite the cache. Returns the tool count.
pub async fn refresh(settings: &Settings) -> Result<usize> {
    let client = McpClient::new(&settings.mcp.server_url)?;
    client.initialize().await?;

    let remote = client.list_tools().await?;
    let descriptors: Vec<ToolDescriptor> = remote
        .into_iter()
        .map(|t| {
            let required = t
                .input_schema
                .as_ref()
                .and_then(|s| s.get("required"))
                .and_then(|r| r.as_array())
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|n| n.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default();

            ToolDescriptor {
                name: t.name,
                description: t.description,
                parameters: ToolParameters { required },
            }
        })
        .collect();

    cache::write(&settings.tool_cache_path(), &descriptors)?;
    Ok(descriptors.len())
}
