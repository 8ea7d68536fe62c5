//! Opsagent CLI entry point.

use anyhow::Result;
use clap::Parser;
use opsagent::cli::{commands, Cli, Commands};
use opsagent::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("opsagent={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Explicit storage-directory override (also how benchmark subprocesses
    // receive their per-mode directory)
    if let Some(dir) = &cli.storage_dir {
        settings.memory.storage_dir = dir.clone();
    }

    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Chat => {
            commands::run_chat(settings).await?;
        }

        Commands::Ask { query, benchmark } => {
            commands::run_ask(query, *benchmark, settings).await?;
        }

        Commands::Tools { action } => {
            commands::run_tools(action, settings).await?;
        }

        Commands::Bench {
            detailed,
            export_csv,
            output,
        } => {
            commands::run_bench(*detailed, *export_csv, output.clone(), settings).await?;
        }

        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
