//! Engine adapters: one per external execution engine.

pub mod claude;
pub mod codex;
pub mod cursor;
pub mod ollama;
pub mod process;

use std::sync::Arc;

use crate::domain::models::EnginesConfig;
use crate::services::engine_registry::EngineRegistry;

pub use claude::ClaudeAdapter;
pub use codex::CodexAdapter;
pub use cursor::CursorAdapter;
pub use ollama::{OllamaAdapter, OllamaClient};

/// Build the production registry with all four engine adapters.
pub fn build_registry(config: &EnginesConfig) -> EngineRegistry {
    let mut registry = EngineRegistry::new();
    registry.register(Arc::new(ClaudeAdapter::new(config.claude.clone())));
    registry.register(Arc::new(CodexAdapter::new(config.codex.clone())));
    registry.register(Arc::new(CursorAdapter::new(config.cursor.clone())));
    registry.register(Arc::new(OllamaAdapter::new(config.ollama.clone())));
    registry
}
