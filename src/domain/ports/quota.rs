//! Quota accounting port.

use crate::domain::models::Engine;

/// Best-effort daily usage accounting per engine.
///
/// Usage is charged once per attempted engine call, before the adapter is
/// invoked, whether or not the call then succeeds. Task executions and fix
/// applications are tracked under separate counters. Implementations are
/// best-effort: recording failures are logged, never surfaced.
pub trait QuotaTracker: Send + Sync {
    /// Charge one task execution attempt to `engine`.
    fn record_task(&self, engine: Engine);

    /// Charge one fix application attempt to `engine`.
    fn record_fix(&self, engine: Engine);

    /// Total attempts (task + fix) charged to `engine` today.
    fn usage(&self, engine: Engine) -> u64;

    /// Whether any engine with a configured limit has reached it today.
    /// Consulted once, before a task starts.
    fn exceeded(&self) -> bool;
}
