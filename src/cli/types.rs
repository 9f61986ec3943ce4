//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hermes")]
#[command(about = "Route engineering tasks to AI coding engines with automatic fallback", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route and execute a task
    Run {
        /// Natural-language task description
        task: String,

        /// Plan and select only; stop before any engine executes
        #[arg(long)]
        dry_run: bool,

        /// Run the task in the engine's cloud environment (cursor only)
        #[arg(long)]
        cloud: bool,

        /// Create a task branch before execution and commit afterwards
        #[arg(long)]
        git: bool,
    },

    /// Write the default configuration to .hermes/config.yaml
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Inspect or update the model selection rule table
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List recorded task logs
    Logs {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show today's engine usage against the configured limits
    Quota,

    /// Check availability of the configured engines
    Doctor,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved rule table
    Show,

    /// Set the engine (and optionally model) for a task type
    Set {
        /// Task type (e.g. refactor, architecture, bulk_patch)
        task_type: String,

        /// Engine (claude, codex, cursor, ollama)
        engine: String,

        /// Engine-specific model alias
        #[arg(short, long)]
        model: Option<String>,
    },
}
