//! Router integration tests: shortcuts, quota gate, and task execution.

mod common;

use std::sync::Arc;

use common::{PanickingPlanner, RecordingQuota, ScriptedRunner, StaticSummarizer, SucceedingAdapter};
use hermes::domain::models::{Config, Engine};
use hermes::{EngineRegistry, Router, RunOptions};

fn full_registry() -> (EngineRegistry, Arc<SucceedingAdapter>) {
    let claude = Arc::new(SucceedingAdapter::new(Engine::Claude, "engine output"));
    let mut registry = EngineRegistry::new();
    registry.register(claude.clone());
    registry.register(Arc::new(SucceedingAdapter::new(Engine::Codex, "codex out")));
    registry.register(Arc::new(SucceedingAdapter::new(Engine::Cursor, "cursor out")));
    registry.register(Arc::new(SucceedingAdapter::new(Engine::Ollama, "local out")));
    (registry, claude)
}

#[tokio::test]
async fn test_run_tests_shortcut_bypasses_planning_and_selection() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, claude) = full_registry();

    let router = Router::new(
        Config::default(),
        registry,
        Arc::new(RecordingQuota::default()),
        // Panics if the router plans a shortcut task.
        Arc::new(PanickingPlanner),
        Arc::new(StaticSummarizer),
        Arc::new(ScriptedRunner::always(0, "ok")),
        dir.path().to_path_buf(),
    );

    router
        .run("run tests", &RunOptions::default())
        .await
        .unwrap();

    // Diagnostic passed immediately; no engine was consulted either.
    assert_eq!(claude.call_count(), 0);
}

#[tokio::test]
async fn test_quota_gate_stops_the_task_before_any_engine() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, claude) = full_registry();

    let router = Router::new(
        Config::default(),
        registry,
        Arc::new(RecordingQuota {
            exceeded: true,
            ..Default::default()
        }),
        Arc::new(PanickingPlanner),
        Arc::new(StaticSummarizer),
        Arc::new(ScriptedRunner::always(0, "ok")),
        dir.path().to_path_buf(),
    );

    let err = router
        .run("run tests", &RunOptions::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("quota"));
    assert_eq!(claude.call_count(), 0);
}

#[tokio::test]
async fn test_planned_task_executes_and_logs() {
    use async_trait::async_trait;
    use hermes::domain::models::{RiskLevel, TaskPlan, TaskType};
    use hermes::domain::ports::Planner;

    struct FixedPlanner;

    #[async_trait]
    impl Planner for FixedPlanner {
        async fn plan(&self, _task: &str) -> TaskPlan {
            TaskPlan::new(TaskType::Refactor, RiskLevel::Low, 0.9, vec!["one".into()])
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let (registry, claude) = full_registry();
    let quota = Arc::new(RecordingQuota::default());

    let router = Router::new(
        Config::default(),
        registry,
        quota.clone(),
        Arc::new(FixedPlanner),
        Arc::new(StaticSummarizer),
        Arc::new(ScriptedRunner::always(0, "ok")),
        dir.path().to_path_buf(),
    );

    router
        .run("refactor the widget", &RunOptions::default())
        .await
        .unwrap();

    // Refactor rule routes to claude, which succeeded on the first attempt.
    assert_eq!(claude.call_count(), 1);
    assert_eq!(quota.charged(), vec![(Engine::Claude, "task")]);
    let prompts = claude.prompts.lock().unwrap();
    assert!(prompts[0].contains("TASK:\nrefactor the widget"));

    // The task log captured the run and its result.
    let logs: Vec<_> = std::fs::read_dir(dir.path().join("logs"))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(logs.len(), 1);
    let log: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(logs[0].path()).unwrap()).unwrap();
    assert_eq!(log["task"], "refactor the widget");
    assert_eq!(log["selection"]["engine"], "claude");
    assert_eq!(log["result"], "engine output");
}

#[tokio::test]
async fn test_dry_run_stops_before_execution() {
    use async_trait::async_trait;
    use hermes::domain::models::TaskPlan;
    use hermes::domain::ports::Planner;

    struct SafePlanner;

    #[async_trait]
    impl Planner for SafePlanner {
        async fn plan(&self, task: &str) -> TaskPlan {
            TaskPlan::safe_default(task)
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let (registry, claude) = full_registry();

    let router = Router::new(
        Config::default(),
        registry,
        Arc::new(RecordingQuota::default()),
        Arc::new(SafePlanner),
        Arc::new(StaticSummarizer),
        Arc::new(ScriptedRunner::always(0, "ok")),
        dir.path().to_path_buf(),
    );

    router
        .run(
            "refactor the widget",
            &RunOptions {
                dry_run: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(claude.call_count(), 0);
}
