//! ActLoop CLI — the main entry point.
//!
//! Commands:
//! - `run`   — Run the file-explorer agent on a task
//! - `tools` — List the built-in actions

use actloop_config::{LanguageKind, OnError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "actloop",
    about = "ActLoop — a goal-driven tool-calling agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the agent until it terminates or runs out of iterations
    Run {
        /// What the agent should do
        task: String,

        /// Iteration ceiling (defaults to agent.max_iterations)
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Prompt encoding: function-calling or json-action
        #[arg(long)]
        language: Option<LanguageKind>,

        /// Comma-separated action tags to offer
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Directory the file actions operate in
        #[arg(long)]
        root: Option<PathBuf>,

        /// Reaction to unusable replies: fail-fast or feedback
        #[arg(long)]
        on_error: Option<OnError>,

        /// Override the model
        #[arg(long)]
        model: Option<String>,
    },

    /// List the built-in actions
    Tools {
        /// Only show actions carrying one of these comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the memory dump
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            task,
            max_iterations,
            language,
            tags,
            root,
            on_error,
            model,
        } => {
            let overrides = commands::run::RunOverrides {
                max_iterations,
                language,
                tags,
                root,
                on_error,
                model,
            };
            commands::run::run(&task, overrides).await?
        }
        Commands::Tools { tags } => commands::tools::run(tags)?,
    }

    Ok(())
}
