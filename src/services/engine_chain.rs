//! Sequential fallback across engines.
//!
//! A chain is an ordered, deduplicated walk over engine adapters: try the
//! current engine, and on failure advance to the next. Fallback is strictly
//! sequential, never speculative; the order fixed at build time holds for
//! the whole execution.

use std::sync::Arc;

use console::style;
use tracing::{debug, warn};

use crate::domain::error::{ChainError, EngineError};
use crate::domain::models::Engine;
use crate::domain::ports::{EngineAdapter, InvokeOptions, QuotaTracker};
use crate::services::engine_registry::EngineRegistry;

/// Canonical fallback order. `fallback_from` roots a chain at the selected
/// engine and appends the remaining engines in this order.
pub const CAPABLE_ENGINES: [Engine; 4] =
    [Engine::Claude, Engine::Codex, Engine::Cursor, Engine::Ollama];

/// Generic per-execution options before per-engine shaping.
#[derive(Debug, Clone, Default)]
pub struct ChainOptions {
    pub model: Option<String>,
    pub fork_session: bool,
    pub resume: bool,
    pub cloud: bool,
}

/// Per-attempt callback invoked before dispatching to an engine during fix
/// application. Used for engine-specific checkpoint bookkeeping.
pub type AttemptHook<'a> = &'a (dyn Fn(Engine) + Send + Sync);

#[derive(Clone, Copy, PartialEq, Eq)]
enum ChainMode {
    Task,
    Fix,
}

struct ChainNode {
    engine: Engine,
    adapter: Arc<dyn EngineAdapter>,
}

/// Ordered fallback sequence over engine adapters.
pub struct EngineChain {
    nodes: Vec<ChainNode>,
    quota: Arc<dyn QuotaTracker>,
}

impl EngineChain {
    /// Fallback order rooted at `initial`: the initial engine first, then
    /// the remaining capable engines in canonical order, deduplicated.
    pub fn fallback_from(initial: Engine) -> Vec<Engine> {
        let mut order = vec![initial];
        order.extend(CAPABLE_ENGINES.iter().copied().filter(|e| *e != initial));
        order
    }

    /// Build a chain from an ordered engine list. Duplicates collapse onto
    /// their first occurrence; engines without a registered adapter fail
    /// the build.
    pub fn build(
        order: &[Engine],
        registry: &EngineRegistry,
        quota: Arc<dyn QuotaTracker>,
    ) -> Result<Self, EngineError> {
        let mut nodes = Vec::new();
        for &engine in order {
            if nodes.iter().any(|n: &ChainNode| n.engine == engine) {
                continue;
            }
            let adapter = registry
                .adapter(engine)
                .ok_or(EngineError::NotRegistered(engine))?;
            nodes.push(ChainNode { engine, adapter });
        }
        Ok(Self { nodes, quota })
    }

    /// Engines in attempt order.
    pub fn engines(&self) -> Vec<Engine> {
        self.nodes.iter().map(|n| n.engine).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Execute a task prompt, falling back across engines on failure.
    pub async fn execute(
        &self,
        prompt: &str,
        options: &ChainOptions,
    ) -> Result<String, ChainError> {
        self.run(prompt, options, ChainMode::Task, None).await
    }

    /// Execute a fix prompt. Identical control flow to `execute`, with an
    /// optional per-attempt hook fired before each dispatch and fix-specific
    /// usage and failure accounting.
    pub async fn execute_fix(
        &self,
        prompt: &str,
        options: &ChainOptions,
        on_attempt: Option<AttemptHook<'_>>,
    ) -> Result<String, ChainError> {
        self.run(prompt, options, ChainMode::Fix, on_attempt).await
    }

    async fn run(
        &self,
        prompt: &str,
        options: &ChainOptions,
        mode: ChainMode,
        on_attempt: Option<AttemptHook<'_>>,
    ) -> Result<String, ChainError> {
        let total = self.nodes.len();
        let mut last_error = String::from("no engines in chain");

        for (index, node) in self.nodes.iter().enumerate() {
            let attempt = index + 1;
            println!("{}", status_message(node.engine, attempt, total, mode));

            if let Some(hook) = on_attempt {
                hook(node.engine);
            }

            // Usage is charged per attempted engine, before dispatch, even
            // if the call then fails.
            match mode {
                ChainMode::Task => self.quota.record_task(node.engine),
                ChainMode::Fix => self.quota.record_fix(node.engine),
            }

            let shaped = shape_options(node.engine, options);
            debug!(engine = %node.engine, attempt, total, "dispatching to engine");

            match node
                .adapter
                .invoke(prompt, options.model.as_deref(), &shaped)
                .await
            {
                Ok(output) => return Ok(output),
                Err(err) => {
                    let label = match mode {
                        ChainMode::Task => format!("{} failed:", node.engine),
                        ChainMode::Fix => format!("{} failed during fix:", node.engine),
                    };
                    println!("{} {} {}", style("✗").red(), label, err.brief());
                    warn!(engine = %node.engine, error = %err, "engine attempt failed");
                    last_error = err.to_string();
                }
            }
        }

        Err(match mode {
            ChainMode::Task => ChainError::TaskExhausted {
                attempts: total,
                last_error,
            },
            ChainMode::Fix => ChainError::FixExhausted {
                attempts: total,
                last_error,
            },
        })
    }
}

fn status_message(engine: Engine, attempt: usize, total: usize, mode: ChainMode) -> String {
    let action = if attempt > 1 {
        "Falling back to"
    } else if mode == ChainMode::Fix {
        "Applying fix via"
    } else {
        "Executing task via"
    };
    format!("{action} {engine} (attempt {attempt}/{total})...")
}

/// Keep only the options the target engine understands.
fn shape_options(engine: Engine, options: &ChainOptions) -> InvokeOptions {
    match engine {
        Engine::Claude => InvokeOptions {
            fork_session: options.fork_session,
            ..Default::default()
        },
        Engine::Codex => InvokeOptions {
            resume: options.resume,
            ..Default::default()
        },
        Engine::Cursor => InvokeOptions {
            resume: options.resume,
            cloud: options.cloud,
            ..Default::default()
        },
        Engine::Ollama => InvokeOptions::default(),
    }
}
