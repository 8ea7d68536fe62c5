//! Tool inspector: discover, check, and list the MCP tool cache.

use crate::cli::output::format_age;
use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, ToolsAction};
use crate::config::Settings;
use crate::error::Result;
use crate::mcp::{cache, discovery, ToolDescriptor};
use console::style;
use std::collections::BTreeMap;

/// Run a tool-cache action.
pub async fn run_tools(action: &ToolsAction, settings: Settings) -> Result<()> {
    // Cache inspection works offline, so this never asks for an API key.
    preflight::check(Operation::ToolsInspect)?;

    match action {
        ToolsAction::Refresh => refresh(&settings).await,
        ToolsAction::Check => {
            check(&settings);
            Ok(())
        }
        ToolsAction::List => {
            list(&settings);
            Ok(())
        }
    }
}

/// Force a discovery run and rewrite the cache.
async fn refresh(settings: &Settings) -> Result<()> {
    let spinner = Output::spinner("Discovering tools from MCP server...");

    match discovery::refresh(settings).await {
        Ok(count) => {
            spinner.finish_and_clear();
            Output::success(&format!("Successfully cached {} tools", count));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Tool discovery failed: {}", e));
            Err(e)
        }
    }
}

/// Print cache age and freshness.
fn check(settings: &Settings) {
    let path = settings.tool_cache_path();

    Output::header("Tool Cache Status");

    if !path.exists() {
        Output::error("Cache file does not exist");
        Output::info("Run 'opsagent tools refresh' to create it");
        return;
    }

    let tools = cache::load_all(&path);
    let age = cache::age(&path);

    match (tools, age) {
        (Some(tools), Some(age)) => {
            let stale = cache::is_stale(&path, settings.tool_cache_max_age());

            Output::kv("Path", &path.display().to_string());
            Output::kv("Tools cached", &tools.len().to_string());
            Output::kv("Age", &format_age(age.num_seconds()));
            Output::kv(
                "Freshness",
                &format!(
                    "{} ({}h threshold)",
                    if stale {
                        style("STALE").red().to_string()
                    } else {
                        style("FRESH").green().to_string()
                    },
                    settings.mcp.cache_max_age_hours
                ),
            );

            if stale {
                Output::info("Run 'opsagent tools refresh' to update the cache");
            }
        }
        _ => {
            Output::error("Cache file is corrupted or has an unreadable timestamp");
            Output::info("Run 'opsagent tools refresh' to rebuild it");
        }
    }
}

/// List cached tools grouped by name prefix.
fn list(settings: &Settings) {
    let path = settings.tool_cache_path();

    let tools = match cache::load_all(&path) {
        Some(tools) if !tools.is_empty() => tools,
        Some(_) => {
            Output::info("No tools found in cache");
            return;
        }
        None => {
            Output::error("Cache file does not exist or is corrupt");
            Output::info("Run 'opsagent tools refresh' to create it");
            return;
        }
    };

    Output::header(&format!("Cached Tools ({} total)", tools.len()));

    for (prefix, group) in group_by_prefix(&tools) {
        println!("\n{}", style(prefix.to_uppercase()).bold());
        let mut sorted = group;
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        for tool in sorted {
            Output::tool_item(
                &tool.name,
                tool.description.as_deref(),
                &tool.parameters.required,
            );
        }
    }
}

/// Group tools by the segment of their name before the first underscore.
fn group_by_prefix(tools: &[ToolDescriptor]) -> BTreeMap<String, Vec<&ToolDescriptor>> {
    let mut grouped: BTreeMap<String, Vec<&ToolDescriptor>> = BTreeMap::new();

    for tool in tools {
        let prefix = match tool.name.split_once('_') {
            Some((head, _)) => head.to_lowercase(),
            None => "other".to_string(),
        };
        grouped.entry(prefix).or_default().push(tool);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::ToolParameters;

    fn descriptor(name: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: None,
            parameters: ToolParameters::default(),
        }
    }

    #[test]
    fn test_group_by_prefix() {
        let tools = vec![
            descriptor("get_pods"),
            descriptor("get_nodes"),
            descriptor("list_namespaces"),
            descriptor("standalone"),
        ];

        let grouped = group_by_prefix(&tools);
        assert_eq!(grouped["get"].len(), 2);
        assert_eq!(grouped["list"].len(), 1);
        assert_eq!(grouped["other"].len(), 1);
    }
}
