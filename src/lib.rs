//! Opsagent - Platform Agent CLI
//!
//! A command-line platform agent for Kubernetes operations. Opsagent wires a
//! small crew of LLM agents (via an OpenAI-compatible API such as OpenRouter)
//! to a set of tools: a built-in cluster-info tool and remote tools discovered
//! from an MCP server and cached on disk.
//!
//! # Overview
//!
//! Opsagent allows you to:
//! - Chat with a Kubernetes operations agent that can inspect cluster state
//! - Discover and cache MCP tools with a 24-hour freshness policy
//! - Benchmark the agent's memory subsystem (enabled vs. disabled)
//! - Inspect and refresh the tool cache from the command line
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and agent/task templates
//! - `mcp` - MCP client, tool discovery, and the on-disk tool cache
//! - `crew` - Agent, task, and crew orchestration
//! - `memory` - Opaque adapter for the external memory store
//! - `bench` - Memory benchmark harness and reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use opsagent::config::Settings;
//! use opsagent::crew::Crew;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let crew = Crew::from_settings(&settings).await?;
//!
//!     let answer = crew.kickoff("show me all k8s clusters").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod bench;
pub mod cli;
pub mod config;
pub mod crew;
pub mod error;
pub mod mcp;
pub mod memory;
pub mod openai;

pub use error::{OpsError, Result};
