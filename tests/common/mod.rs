//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use hermes::domain::models::{DiagnosticKind, DiagnosticSummary, Engine, TaskPlan};
use hermes::domain::ports::{
    CommandOutcome, CommandRunner, EngineAdapter, InvokeOptions, OutputSummarizer, Planner,
    QuotaTracker,
};
use hermes::EngineError;

/// Adapter that always succeeds with a fixed output.
pub struct SucceedingAdapter {
    engine: Engine,
    output: String,
    pub prompts: Mutex<Vec<String>>,
}

impl SucceedingAdapter {
    pub fn new(engine: Engine, output: &str) -> Self {
        Self {
            engine,
            output: output.to_string(),
            prompts: Mutex::new(vec![]),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl EngineAdapter for SucceedingAdapter {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn invoke(
        &self,
        prompt: &str,
        _model: Option<&str>,
        _options: &InvokeOptions,
    ) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.output.clone())
    }
}

/// Adapter that always fails with a command failure.
pub struct FailingAdapter {
    engine: Engine,
    pub calls: Mutex<usize>,
}

impl FailingAdapter {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl EngineAdapter for FailingAdapter {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn invoke(
        &self,
        _prompt: &str,
        _model: Option<&str>,
        _options: &InvokeOptions,
    ) -> Result<String, EngineError> {
        *self.calls.lock().unwrap() += 1;
        Err(EngineError::CommandFailed {
            engine: self.engine,
            output: format!("{} exploded", self.engine),
        })
    }
}

/// In-memory quota recording every charge in order.
#[derive(Default)]
pub struct RecordingQuota {
    pub charges: Mutex<Vec<(Engine, &'static str)>>,
    pub exceeded: bool,
}

impl RecordingQuota {
    pub fn charged(&self) -> Vec<(Engine, &'static str)> {
        self.charges.lock().unwrap().clone()
    }
}

impl QuotaTracker for RecordingQuota {
    fn record_task(&self, engine: Engine) {
        self.charges.lock().unwrap().push((engine, "task"));
    }

    fn record_fix(&self, engine: Engine) {
        self.charges.lock().unwrap().push((engine, "fix"));
    }

    fn usage(&self, engine: Engine) -> u64 {
        self.charges
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == engine)
            .count() as u64
    }

    fn exceeded(&self) -> bool {
        self.exceeded
    }
}

/// Command runner that replays a script of exit codes, then repeats the
/// last one forever.
pub struct ScriptedRunner {
    script: Mutex<VecDeque<(i32, String)>>,
    last: Mutex<(i32, String)>,
    pub runs: Mutex<usize>,
}

impl ScriptedRunner {
    pub fn new(script: Vec<(i32, &str)>) -> Self {
        let queue: VecDeque<(i32, String)> = script
            .into_iter()
            .map(|(code, out)| (code, out.to_string()))
            .collect();
        let last = queue.back().cloned().unwrap_or((0, String::new()));
        Self {
            script: Mutex::new(queue),
            last: Mutex::new(last),
            runs: Mutex::new(0),
        }
    }

    /// A runner that always returns the same exit code and output.
    pub fn always(code: i32, output: &str) -> Self {
        Self::new(vec![(code, output)])
    }

    pub fn run_count(&self) -> usize {
        *self.runs.lock().unwrap()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, _command: &str) -> CommandOutcome {
        *self.runs.lock().unwrap() += 1;
        let (code, output) = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.lock().unwrap().clone());
        CommandOutcome {
            output,
            exit_status: code,
        }
    }
}

/// Summarizer returning a fixed actionable summary.
pub struct StaticSummarizer;

#[async_trait]
impl OutputSummarizer for StaticSummarizer {
    async fn summarize(&self, _raw: &str, _kind: DiagnosticKind) -> DiagnosticSummary {
        DiagnosticSummary {
            failed_items: vec!["summarized failure".to_string()],
            error_summary: "summarized".to_string(),
            files: vec![],
        }
    }
}

/// Planner that fails the test if it is ever consulted.
pub struct PanickingPlanner;

#[async_trait]
impl Planner for PanickingPlanner {
    async fn plan(&self, task: &str) -> TaskPlan {
        panic!("planner should not be consulted for task: {task}");
    }
}
