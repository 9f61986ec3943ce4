//! Ports: capability interfaces the orchestration core depends on.

pub mod command_runner;
pub mod engine;
pub mod planner;
pub mod quota;
pub mod summarizer;

pub use command_runner::{CommandOutcome, CommandRunner};
pub use engine::{EngineAdapter, InvokeOptions};
pub use planner::Planner;
pub use quota::QuotaTracker;
pub use summarizer::OutputSummarizer;
