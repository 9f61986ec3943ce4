//! Error taxonomy for the orchestration core.
//!
//! A failed engine attempt is recoverable while another engine remains in
//! the fallback chain; exhaustion of the whole chain is terminal. The two
//! conditions are distinct types so callers never inspect message text.

use thiserror::Error;

use super::models::Engine;

/// Failure of a single engine attempt. Recoverable at the chain level by
/// advancing to the next engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{engine} command failed: {output}")]
    CommandFailed { engine: Engine, output: String },

    #[error("{engine} timed out after {seconds}s")]
    Timeout { engine: Engine, seconds: u64 },

    #[error("{engine} could not be spawned: {reason}")]
    SpawnFailed { engine: Engine, reason: String },

    #[error("claude CLI is not logged in; run `claude login` in your terminal")]
    NotAuthenticated,

    #[error("ollama request failed: {0}")]
    Http(String),

    #[error("no adapter registered for engine {0}")]
    NotRegistered(Engine),
}

impl EngineError {
    /// First line of the message, for compact operator-facing output.
    pub fn brief(&self) -> String {
        self.to_string().lines().next().unwrap_or_default().to_string()
    }
}

/// Terminal failure after every engine in a fallback chain was attempted.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("all available AI engines failed to execute the task ({attempts} attempted): {last_error}")]
    TaskExhausted { attempts: usize, last_error: String },

    #[error("all available AI engines failed to apply the fix ({attempts} attempted): {last_error}")]
    FixExhausted { attempts: usize, last_error: String },
}

impl ChainError {
    pub fn attempts(&self) -> usize {
        match self {
            Self::TaskExhausted { attempts, .. } | Self::FixExhausted { attempts, .. } => *attempts,
        }
    }
}
