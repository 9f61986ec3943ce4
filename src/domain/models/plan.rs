//! Task plans produced by the planner.
//!
//! A plan classifies a natural-language task so the model selector can pick
//! an engine/model pair. Plans are immutable once produced; `slices` are
//! informational for logging and display only.

use serde::{Deserialize, Serialize};

/// Category of engineering task, as classified by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Architecture,
    Refactor,
    BulkPatch,
    TestGeneration,
    Summarization,
    InteractiveEdit,
}

impl TaskType {
    /// Whether tasks of this type are expected to modify code.
    ///
    /// Local models are never trusted with code-modifying task types.
    pub fn modifies_code(&self) -> bool {
        matches!(
            self,
            Self::Architecture | Self::Refactor | Self::BulkPatch | Self::TestGeneration
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::Refactor => "refactor",
            Self::BulkPatch => "bulk_patch",
            Self::TestGeneration => "test_generation",
            Self::Summarization => "summarization",
            Self::InteractiveEdit => "interactive_edit",
        }
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "architecture" => Ok(Self::Architecture),
            "refactor" => Ok(Self::Refactor),
            "bulk_patch" => Ok(Self::BulkPatch),
            "test_generation" => Ok(Self::TestGeneration),
            "summarization" => Ok(Self::Summarization),
            "interactive_edit" => Ok(Self::InteractiveEdit),
            other => Err(format!("unknown task type: {other}")),
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk classification attached to a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Structured decomposition of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPlan {
    pub task_type: TaskType,
    pub risk_level: RiskLevel,
    /// Planner confidence in its own classification, clamped to [0, 1].
    pub confidence: f64,
    /// Ordered work units. Informational only to the orchestration core.
    #[serde(default)]
    pub slices: Vec<String>,
}

impl TaskPlan {
    pub fn new(
        task_type: TaskType,
        risk_level: RiskLevel,
        confidence: f64,
        slices: Vec<String>,
    ) -> Self {
        Self {
            task_type,
            risk_level,
            confidence: confidence.clamp(0.0, 1.0),
            slices,
        }
    }

    /// Deterministic plan used when the planner's backing service is
    /// unreachable. Full confidence so selection proceeds without escalation.
    pub fn safe_default(task: &str) -> Self {
        Self::new(
            TaskType::Refactor,
            RiskLevel::Medium,
            1.0,
            vec![task.to_string()],
        )
    }

    /// Synthetic plan driving diagnostic fix escalations. Fixes are always
    /// treated as medium-risk refactors regardless of the original task.
    pub fn fix_default() -> Self {
        Self::new(TaskType::Refactor, RiskLevel::Medium, 1.0, vec![])
    }
}
