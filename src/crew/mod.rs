//! Agent, task, and crew orchestration.

pub mod cluster;
mod runner;
pub mod tools;

pub use runner::{Agent, AgentResponse, Crew, ToolCallRecord};
pub use tools::{ToolCall, ToolContext};
