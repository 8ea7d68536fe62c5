//! Tool definitions and execution for the crew's agents.

use super::cluster;
use crate::error::{OpsError, Result};
use crate::mcp::{McpClient, ToolDescriptor};
use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use std::sync::Arc;

/// A tool call requested by the model.
#[derive(Debug, Clone)]
pub enum ToolCall {
    /// The built-in cluster status report.
    GetClusterInfo,
    /// A tool discovered from the MCP server.
    Remote {
        name: String,
        arguments: Option<serde_json::Value>,
    },
}

/// Tool execution context with access to the MCP client and the cached
/// remote tool descriptors.
pub struct ToolContext {
    mcp: Option<Arc<McpClient>>,
    remote_tools: Vec<ToolDescriptor>,
}

impl ToolContext {
    /// Create a context with only the built-in tool.
    pub fn local_only() -> Self {
        Self {
            mcp: None,
            remote_tools: Vec::new(),
        }
    }

    /// Create a context with the built-in tool plus remote MCP tools.
    pub fn with_remote(mcp: Arc<McpClient>, remote_tools: Vec<ToolDescriptor>) -> Self {
        Self {
            mcp: Some(mcp),
            remote_tools,
        }
    }

    /// OpenAI tool definitions: the built-in tool plus every cached remote tool.
    pub fn tool_definitions(&self) -> Vec<ChatCompletionTool> {
        let mut tools = vec![ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: "get_cluster_info".to_string(),
                description: Some(
                    "Get the current status report for the Kubernetes cluster: nodes, \
                    namespaces, pods, services and deployments. Use this for any question \
                    about cluster state."
                        .to_string(),
                ),
                parameters: Some(serde_json::json!({
                    "type": "object",
                    "properties": {}
                })),
                strict: None,
            },
        }];

        for remote in &self.remote_tools {
            tools.push(ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: remote.name.clone(),
                    description: remote.description.clone(),
                    parameters: Some(serde_json::json!({
                        "type": "object",
                        "properties": {},
                        "required": remote.parameters.required,
                    })),
                    strict: None,
                },
            });
        }

        tools
    }

    /// Parse a model tool call into a [`ToolCall`].
    pub fn parse_tool_call(&self, name: &str, arguments: &str) -> Result<ToolCall> {
        match name {
            "get_cluster_info" => Ok(ToolCall::GetClusterInfo),
            _ if self.remote_tools.iter().any(|t| t.name == name) => {
                let args: Option<serde_json::Value> = if arguments.trim().is_empty() {
                    None
                } else {
                    Some(
                        serde_json::from_str(arguments)
                            .map_err(|e| OpsError::Agent(format!("Invalid tool arguments: {}", e)))?,
                    )
                };
                Ok(ToolCall::Remote {
                    name: name.to_string(),
                    arguments: args,
                })
            }
            _ => Err(OpsError::Agent(format!("Unknown tool: {}", name))),
        }
    }

    /// Execute a tool call and return the result as a string.
    pub async fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::GetClusterInfo => Ok(cluster::get_cluster_info()),
            ToolCall::Remote { name, arguments } => {
                let client = self
                    .mcp
                    .as_ref()
                    .ok_or_else(|| OpsError::Agent("No MCP client configured".to_string()))?;
                client.call_tool(name, arguments.clone()).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::ToolParameters;

    fn context_with(names: &[&str]) -> ToolContext {
        let tools = names
            .iter()
            .map(|n| ToolDescriptor {
                name: n.to_string(),
                description: None,
                parameters: ToolParameters::default(),
            })
            .collect();
        ToolContext {
            mcp: None,
            remote_tools: tools,
        }
    }

    #[test]
    fn test_parse_local_tool() {
        let ctx = ToolContext::local_only();
        let call = ctx.parse_tool_call("get_cluster_info", "{}").unwrap();
        assert!(matches!(call, ToolCall::GetClusterInfo));
    }

    #[test]
    fn test_parse_remote_tool() {
        let ctx = context_with(&["fetch_url"]);
        let call = ctx
            .parse_tool_call("fetch_url", r#"{"url": "https://example.com"}"#)
            .unwrap();
        match call {
            ToolCall::Remote { name, arguments } => {
                assert_eq!(name, "fetch_url");
                assert_eq!(arguments.unwrap()["url"], "https://example.com");
            }
            _ => panic!("Expected Remote tool"),
        }
    }

    #[test]
    fn test_parse_unknown_tool_fails() {
        let ctx = ToolContext::local_only();
        assert!(ctx.parse_tool_call("delete_everything", "{}").is_err());
    }

    #[test]
    fn test_definitions_include_remote_tools() {
        let ctx = context_with(&["fetch_url", "get_page_title"]);
        let defs = ctx.tool_definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.function.name.as_str()).collect();
        assert_eq!(names, vec!["get_cluster_info", "fetch_url", "get_page_title"]);
    }

    #[tokio::test]
    async fn test_execute_local_tool() {
        let ctx = ToolContext::local_only();
        let output = ctx.execute(&ToolCall::GetClusterInfo).await.unwrap();
        assert!(output.contains("demo-cluster"));
    }
}
