//! Services layer: the orchestration core.

pub mod diagnostic_parser;
pub mod diagnostic_runner;
pub mod engine_chain;
pub mod engine_registry;
pub mod fix_applicator;
pub mod model_selector;
pub mod planner;
pub mod prompt_builder;
pub mod router;
pub mod summarizer;

pub use diagnostic_runner::DiagnosticRunner;
pub use engine_chain::{ChainOptions, EngineChain, CAPABLE_ENGINES};
pub use engine_registry::EngineRegistry;
pub use fix_applicator::{FixApplicator, MAX_LINT_ITERATIONS};
pub use model_selector::{ModelSelector, CONFIDENCE_THRESHOLD};
pub use planner::OllamaPlanner;
pub use prompt_builder::PromptBuilder;
pub use router::{match_shortcut, Router, RunOptions};
pub use summarizer::OllamaSummarizer;
