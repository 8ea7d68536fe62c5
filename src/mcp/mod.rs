//! MCP tool discovery, invocation, and the on-disk tool cache.

pub mod cache;
pub mod client;
pub mod discovery;
pub mod protocol;

pub use cache::{FilterOutcome, ToolCacheEntry, ToolDescriptor, ToolParameters};
pub use client::McpClient;
