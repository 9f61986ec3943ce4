//! Hermes - Task Router for AI Coding Engines
//!
//! Hermes routes natural-language engineering tasks to external AI coding
//! engines (claude, codex, cursor, ollama), selects an engine/model pair
//! from a risk/confidence plan, executes with automatic sequential fallback
//! across engines, and drives a diagnose → fix → verify loop for test, lint,
//! and syntax tasks.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure models, ports, and the error taxonomy
//! - **Service Layer** (`services`): Selection, fallback chain, diagnostic
//!   parsing, and the fix loop
//! - **Infrastructure Layer** (`infrastructure`): Engine adapters and
//!   filesystem/process glue
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use hermes::services::Router;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Build a router from configuration and run a task
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, DiagnosticKind, DiagnosticOutcome, DiagnosticSummary, Engine, EngineRule, FileRef,
    FixResult, Patch, RiskLevel, Selection, TaskPlan, TaskType,
};
pub use domain::ports::{
    CommandOutcome, CommandRunner, EngineAdapter, InvokeOptions, OutputSummarizer, Planner,
    QuotaTracker,
};
pub use domain::{ChainError, EngineError};
pub use infrastructure::{ConfigError, ConfigLoader, FileQuotaStore, ShellCommandRunner};
pub use services::{
    match_shortcut, ChainOptions, EngineChain, EngineRegistry, FixApplicator, ModelSelector,
    Router, RunOptions, CAPABLE_ENGINES, MAX_LINT_ITERATIONS,
};
