//! Engine adapter port.
//!
//! One implementation per execution engine. Adapters translate a generic
//! invocation into an engine-specific command or HTTP request, enforce a
//! hard timeout, and may retry once with a modified invocation when the
//! failure matches an engine-specific retryable signature.

use async_trait::async_trait;

use crate::domain::error::EngineError;
use crate::domain::models::Engine;

/// Options shaped per engine by the chain before dispatch.
///
/// Each engine understands a different subset: `fork_session` is meaningful
/// only to claude, `resume` to codex and cursor, `cloud` to cursor alone.
/// The chain clears unsupported fields so they never leak into an adapter
/// that would reject them.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    /// Continue from the engine's previous session, forking it.
    pub fork_session: bool,
    /// Resume the engine's previous session.
    pub resume: bool,
    /// Run the task in the engine's cloud environment.
    pub cloud: bool,
}

/// Port trait for execution engine implementations.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the chain holds them behind `Arc`.
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// The engine this adapter drives.
    fn engine(&self) -> Engine;

    /// Execute a prompt and return the engine's raw text output.
    ///
    /// # Errors
    /// - `EngineError::Timeout` - the hard per-call timeout elapsed
    /// - `EngineError::CommandFailed` - non-zero exit after any retry
    /// - `EngineError::NotAuthenticated` - engine requires a login
    /// - `EngineError::Http` - local HTTP engine unreachable or erroring
    async fn invoke(
        &self,
        prompt: &str,
        model: Option<&str>,
        options: &InvokeOptions,
    ) -> Result<String, EngineError>;
}
