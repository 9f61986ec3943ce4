//! Ollama-backed task planning with safe-mode degradation.
//!
//! The planner asks the local model to classify a task and decompose it
//! into slices, constrained by a JSON schema. When the local model is
//! unavailable or misbehaves the planner degrades to the deterministic
//! safe default plan instead of raising; routing must never depend on
//! ollama being up.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::models::TaskPlan;
use crate::domain::ports::Planner;
use crate::infrastructure::engines::OllamaClient;
use crate::services::prompt_builder::PromptBuilder;

/// Schema constraining the planner's reply.
fn plan_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["task_type", "risk_level", "confidence", "slices"],
        "additionalProperties": false,
        "properties": {
            "task_type": {
                "type": "string",
                "enum": [
                    "architecture",
                    "refactor",
                    "bulk_patch",
                    "test_generation",
                    "summarization",
                    "interactive_edit"
                ]
            },
            "risk_level": { "type": "string", "enum": ["low", "medium", "high"] },
            "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
            "slices": { "type": "array", "items": { "type": "string" } }
        }
    })
}

pub struct OllamaPlanner {
    client: Arc<OllamaClient>,
    /// Result of the startup health probe. When false the planner runs in
    /// safe mode and never touches the network.
    healthy: bool,
}

impl OllamaPlanner {
    pub fn new(client: Arc<OllamaClient>, healthy: bool) -> Self {
        Self { client, healthy }
    }

    async fn plan_via_ollama(&self, task: &str) -> Result<TaskPlan, crate::domain::EngineError> {
        let available = self.client.list_model_names().await?;
        let model = self.client.resolve_model(None, &available);
        let prompt = build_plan_prompt(task);

        let raw = self
            .client
            .generate(&prompt, &model, Some(&plan_schema()))
            .await?;

        let plan: TaskPlan = serde_json::from_str(&raw).map_err(|e| {
            crate::domain::EngineError::Http(format!("planner reply was not a valid plan: {e}"))
        })?;
        // Re-clamp confidence; schema bounds are advisory for local models.
        Ok(TaskPlan::new(
            plan.task_type,
            plan.risk_level,
            plan.confidence,
            plan.slices,
        ))
    }
}

fn build_plan_prompt(task: &str) -> String {
    PromptBuilder::new()
        .add_instruction(
            "Analyze the following engineering task.\n\
             Decompose it into discrete, executable work units (slices).\n\
             Assign a task type, risk level, and confidence score.",
        )
        .add_task(task)
        .add_instruction("Respond strictly as JSON. Slices should be a clean array of strings.")
        .build()
}

#[async_trait]
impl Planner for OllamaPlanner {
    async fn plan(&self, task: &str) -> TaskPlan {
        if !self.healthy {
            return TaskPlan::safe_default(task);
        }

        match self.plan_via_ollama(task).await {
            Ok(plan) => plan,
            Err(err) => {
                warn!(error = %err, "local planner failed, using safe default plan");
                println!("Local AI (ollama) failure: {}. Using safe default plan.", err.brief());
                TaskPlan::safe_default(task)
            }
        }
    }
}
