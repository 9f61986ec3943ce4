//! Planner port.

use async_trait::async_trait;

use crate::domain::models::TaskPlan;

/// Produces the structured plan for a task.
///
/// Implementations must degrade to `TaskPlan::safe_default` when their
/// backing service is unreachable rather than returning an error; the
/// router never branches on planner failure.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, task: &str) -> TaskPlan;
}
