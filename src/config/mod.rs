//! Configuration management for opsagent.

mod prompts;
mod settings;

pub use prompts::{AgentTemplate, Prompts, TaskTemplate};
pub use settings::{
    BenchSettings, GeneralSettings, LlmSettings, McpSettings, MemorySettings, Settings,
};
