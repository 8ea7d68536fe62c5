//! CLI module for opsagent.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Opsagent - Platform Agent CLI
///
/// A command-line agent for Kubernetes operations, backed by a small crew of
/// LLM agents with MCP tool discovery and an on-disk tool cache.
#[derive(Parser, Debug)]
#[command(name = "opsagent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the memory storage directory
    #[arg(long, global = true, env = "OPSAGENT_STORAGE_DIR")]
    pub storage_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive session with the platform agent
    Chat,

    /// Ask the platform agent a single question
    Ask {
        /// The question or command for the agent
        query: String,

        /// Emit a machine-readable BENCHMARK_RESULT line (used by `bench`)
        #[arg(long)]
        benchmark: bool,
    },

    /// Inspect and manage the MCP tool cache
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },

    /// Benchmark agent latency with the memory store enabled vs. disabled
    Bench {
        /// Run more repetitions per case
        #[arg(long)]
        detailed: bool,

        /// Also export the report as CSV
        #[arg(long)]
        export_csv: bool,

        /// Report output file (timestamped default if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolsAction {
    /// Force refresh the tool cache from the MCP server
    Refresh,

    /// Check cache age and freshness
    Check,

    /// List all cached tools with details
    List,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "llm.model")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
