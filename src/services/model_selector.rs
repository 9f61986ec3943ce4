//! Risk- and confidence-aware engine/model selection.
//!
//! Maps a task plan to an `(engine, model)` pair using the configured
//! per-task-type rule table. Low confidence or high risk escalates to the
//! strongest model unconditionally; local models are never allowed to
//! modify code.

use std::collections::BTreeMap;

use crate::domain::models::{Engine, EngineRule, Selection, TaskPlan, TaskType};

/// Plans below this confidence escalate to claude opus regardless of the
/// rule table.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Stateless selection policy. Pure function of `(plan, rules)`; re-evaluate
/// for every escalation, since the plan driving a fix differs from the plan
/// driving the original task.
pub struct ModelSelector;

impl ModelSelector {
    /// Resolve the engine/model pair for a plan.
    ///
    /// Policy, in order:
    /// 1. confidence < 0.7 or high risk: claude opus, unconditionally.
    /// 2. rule table lookup by task type, falling back to the refactor rule.
    /// 3. safety override: ollama never executes code-modifying task types;
    ///    substitute claude sonnet.
    pub fn select(plan: &TaskPlan, rules: &BTreeMap<TaskType, EngineRule>) -> Selection {
        use crate::domain::models::RiskLevel;

        if plan.confidence < CONFIDENCE_THRESHOLD || plan.risk_level == RiskLevel::High {
            return Selection::new(Engine::Claude, Some("opus".to_string()));
        }

        let rule = rules
            .get(&plan.task_type)
            .or_else(|| rules.get(&TaskType::Refactor))
            .cloned()
            .unwrap_or_else(|| EngineRule::new(Engine::Claude, Some("sonnet")));

        if rule.engine == Engine::Ollama && plan.task_type.modifies_code() {
            return Selection::new(Engine::Claude, Some("sonnet".to_string()));
        }

        Selection::new(rule.engine, rule.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RiskLevel;

    fn rules() -> BTreeMap<TaskType, EngineRule> {
        BTreeMap::from([
            (
                TaskType::Refactor,
                EngineRule::new(Engine::Claude, Some("sonnet")),
            ),
            (
                TaskType::Summarization,
                EngineRule::new(Engine::Ollama, Some("qwen3:latest")),
            ),
            (TaskType::BulkPatch, EngineRule::new(Engine::Codex, None)),
        ])
    }

    fn plan(task_type: TaskType, risk: RiskLevel, confidence: f64) -> TaskPlan {
        TaskPlan::new(task_type, risk, confidence, vec![])
    }

    #[test]
    fn test_rule_table_lookup() {
        let selection = ModelSelector::select(
            &plan(TaskType::Refactor, RiskLevel::Low, 0.9),
            &rules(),
        );
        assert_eq!(selection, Selection::new(Engine::Claude, Some("sonnet".to_string())));
    }

    #[test]
    fn test_low_confidence_escalates_to_opus() {
        for task_type in [TaskType::Refactor, TaskType::Summarization, TaskType::BulkPatch] {
            let selection = ModelSelector::select(&plan(task_type, RiskLevel::Low, 0.5), &rules());
            assert_eq!(selection, Selection::new(Engine::Claude, Some("opus".to_string())));
        }
    }

    #[test]
    fn test_high_risk_escalates_to_opus() {
        let selection = ModelSelector::select(
            &plan(TaskType::BulkPatch, RiskLevel::High, 0.95),
            &rules(),
        );
        assert_eq!(selection, Selection::new(Engine::Claude, Some("opus".to_string())));
    }

    #[test]
    fn test_confidence_exactly_at_threshold_does_not_escalate() {
        let selection = ModelSelector::select(
            &plan(TaskType::BulkPatch, RiskLevel::Low, CONFIDENCE_THRESHOLD),
            &rules(),
        );
        assert_eq!(selection.engine, Engine::Codex);
    }

    #[test]
    fn test_unknown_task_type_falls_back_to_refactor_rule() {
        // architecture has no rule in the fixture table
        let selection = ModelSelector::select(
            &plan(TaskType::Architecture, RiskLevel::Low, 0.9),
            &rules(),
        );
        assert_eq!(selection, Selection::new(Engine::Claude, Some("sonnet".to_string())));
    }

    #[test]
    fn test_ollama_is_restricted_from_code_modifying_tasks() {
        let mut table = rules();
        table.insert(
            TaskType::Refactor,
            EngineRule::new(Engine::Ollama, Some("qwen3:latest")),
        );
        let selection = ModelSelector::select(&plan(TaskType::Refactor, RiskLevel::Low, 0.9), &table);
        assert_eq!(selection, Selection::new(Engine::Claude, Some("sonnet".to_string())));
    }

    #[test]
    fn test_ollama_is_allowed_for_summarization() {
        let selection = ModelSelector::select(
            &plan(TaskType::Summarization, RiskLevel::Low, 0.9),
            &rules(),
        );
        assert_eq!(
            selection,
            Selection::new(Engine::Ollama, Some("qwen3:latest".to_string()))
        );
    }
}
