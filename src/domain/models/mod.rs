//! Domain models: plans, selections, diagnostics, fixes, configuration.

pub mod config;
pub mod diagnostic;
pub mod fix;
pub mod plan;
pub mod selection;

pub use config::{
    ClaudeConfig, CodexConfig, Config, CursorConfig, DiagnosticsConfig, EngineRule, EnginesConfig,
    LoggingConfig, OllamaConfig, QuotaConfig,
};
pub use diagnostic::{DiagnosticKind, DiagnosticOutcome, DiagnosticSummary, FileRef};
pub use fix::{FixResult, Patch};
pub use plan::{RiskLevel, TaskPlan, TaskType};
pub use selection::{Engine, Selection};
