//! HTTP client for a remote MCP tool server.

use super::protocol::{
    ClientCapabilities, ClientInfo, InitializeParams, JsonRpcRequest, JsonRpcResponse,
    RemoteTool, ToolCallParams, ToolCallResult, ToolsListResult,
};
use crate::error::{OpsError, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for individual MCP requests.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// JSON-RPC client for one MCP server endpoint.
pub struct McpClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl McpClient {
    /// Create a client for the given endpoint URL.
    pub fn new(url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| OpsError::Mcp(format!("Cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Perform the MCP initialize handshake.
    pub async fn initialize(&self) -> Result<()> {
        let params = InitializeParams {
            protocol_version: "2024-11-05".to_string(),
            capabilities: ClientCapabilities::default(),
            client_info: ClientInfo {
                name: "opsagent".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        self.request("initialize", Some(serde_json::to_value(params)?))
            .await?;
        debug!("MCP handshake completed with {}", self.url);
        Ok(())
    }

    /// List the tools the server exposes.
    pub async fn list_tools(&self) -> Result<Vec<RemoteTool>> {
        let result = self.request("tools/list", None).await?;
        let listed: ToolsListResult = serde_json::from_value(result)?;
        info!("MCP server reported {} tools", listed.tools.len());
        Ok(listed.tools)
    }

    /// Invoke a remote tool and return its text output.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> Result<String> {
        let params = ToolCallParams {
            name: name.to_string(),
            arguments,
        };

        let result = self
            .request("tools/call", Some(serde_json::to_value(params)?))
            .await?;
        let call: ToolCallResult = serde_json::from_value(result)?;

        if call.is_error == Some(true) {
            return Err(OpsError::Mcp(format!("Tool '{}' failed: {}", name, call.text())));
        }

        Ok(call.text())
    }

    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(OpsError::Mcp(format!(
                "{} failed: {} (code {})",
                method, error.message, error.code
            )));
        }

        response
            .result
            .ok_or_else(|| OpsError::Mcp(format!("{} returned no result", method)))
    }
}
