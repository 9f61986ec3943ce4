//! Task routing: quota gate, shortcut dispatch, plan, select, execute.
//!
//! The router is the composition point of the core. Diagnostic shortcut
//! tasks ("run tests", "lint", ...) bypass planning and selection entirely
//! and go straight to the diagnostic loop; everything else is planned,
//! matched to an engine/model pair, and executed over the fallback chain.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use console::style;
use regex::Regex;
use tracing::info;

use crate::domain::models::{Config, DiagnosticKind, DiagnosticOutcome, Selection, TaskPlan};
use crate::domain::ports::{CommandRunner, OutputSummarizer, Planner, QuotaTracker};
use crate::infrastructure::{context, git, TaskLogger};
use crate::services::diagnostic_runner::DiagnosticRunner;
use crate::services::engine_chain::{ChainOptions, EngineChain};
use crate::services::engine_registry::EngineRegistry;
use crate::services::fix_applicator::FixApplicator;
use crate::services::model_selector::ModelSelector;
use crate::services::prompt_builder::PromptBuilder;

static TEST_SHORTCUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(run\s+|check\s+)?(test|fix|diagnostic)(s|es|ing)?\s*$")
        .expect("test shortcut pattern")
});

static SYNTAX_SHORTCUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(run\s+|check\s+)?(syntax|compile)(\s+check)?\s*$")
        .expect("syntax shortcut pattern")
});

static LINT_SHORTCUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(run\s+|check\s+)?(lint|format|style)(ting|ing|s)?\s*$")
        .expect("lint shortcut pattern")
});

/// Options forwarded from the CLI `run` command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    /// Forwarded to the cursor engine only.
    pub cloud: bool,
    /// Create a task branch before execution and commit afterwards.
    pub git: bool,
}

pub struct Router {
    config: Config,
    registry: EngineRegistry,
    quota: Arc<dyn QuotaTracker>,
    planner: Arc<dyn Planner>,
    summarizer: Arc<dyn OutputSummarizer>,
    command_runner: Arc<dyn CommandRunner>,
    /// Workspace root; patch paths, logs, and context resolve against it.
    root: PathBuf,
}

impl Router {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        registry: EngineRegistry,
        quota: Arc<dyn QuotaTracker>,
        planner: Arc<dyn Planner>,
        summarizer: Arc<dyn OutputSummarizer>,
        command_runner: Arc<dyn CommandRunner>,
        root: PathBuf,
    ) -> Self {
        Self {
            config,
            registry,
            quota,
            planner,
            summarizer,
            command_runner,
            root,
        }
    }

    /// Route and execute one task.
    pub async fn run(&self, task: &str, options: &RunOptions) -> Result<()> {
        let logger = TaskLogger::new(self.root.join(&self.config.log_dir))?;
        println!("Task ID: {}", logger.task_id());

        // One quota gate per task, before any engine is touched.
        if self.quota.exceeded() {
            println!(
                "{} Daily engine quota exceeded. Try again later or raise the limits.",
                style("✗").red()
            );
            bail!("daily engine quota exceeded");
        }

        if let Some(kind) = match_shortcut(task) {
            let outcome = self.run_diagnostic(kind, options.dry_run).await?;
            info!(kind = %kind, success = outcome.is_success(), "diagnostic shortcut finished");
            return Ok(());
        }

        let plan = self.planner.plan(task).await;
        let selection = ModelSelector::select(&plan, &self.config.models);
        self.execute_engine_task(task, &plan, &selection, options, &logger)
            .await
    }

    /// Run one diagnostic loop for the configured verification command.
    pub async fn run_diagnostic(
        &self,
        kind: DiagnosticKind,
        dry_run: bool,
    ) -> Result<DiagnosticOutcome> {
        let (command, title) = self.diagnostic_command(kind);
        let workspace_context = context::load(&self.root, &self.config.workspaces);

        let applicator = FixApplicator::new(
            self.config.models.clone(),
            self.registry.clone(),
            self.quota.clone(),
            self.command_runner.clone(),
            self.summarizer.clone(),
            workspace_context,
            self.root.clone(),
        );
        let runner = DiagnosticRunner::new(
            self.command_runner.clone(),
            self.summarizer.clone(),
            applicator,
        );
        runner.run(&command, kind, &title, dry_run).await
    }

    fn diagnostic_command(&self, kind: DiagnosticKind) -> (String, String) {
        let diagnostics = &self.config.diagnostics;
        match kind {
            DiagnosticKind::Test => (diagnostics.test_command.clone(), "Running tests".to_string()),
            DiagnosticKind::Lint => (diagnostics.lint_command.clone(), "Running linter".to_string()),
            DiagnosticKind::Syntax => (
                diagnostics.syntax_command.clone(),
                "Checking syntax".to_string(),
            ),
        }
    }

    async fn execute_engine_task(
        &self,
        task: &str,
        plan: &TaskPlan,
        selection: &Selection,
        options: &RunOptions,
        logger: &TaskLogger,
    ) -> Result<()> {
        println!("Engine selected: {}", selection.describe());

        if options.dry_run {
            println!("--- DRY RUN MODE ---");
            return Ok(());
        }

        logger.log_task(task, plan, selection)?;
        if options.git {
            git::create_branch(&logger.task_id().to_string()).await;
        }

        let order = EngineChain::fallback_from(selection.engine);
        let chain = EngineChain::build(&order, &self.registry, self.quota.clone())
            .context("failed to build fallback chain")?;

        let workspace_context = context::load(&self.root, &self.config.workspaces);
        let prompt = PromptBuilder::new()
            .add_context(&workspace_context)
            .add_task(task)
            .build();

        let chain_options = ChainOptions {
            model: selection.model.clone(),
            fork_session: true,
            resume: true,
            cloud: options.cloud,
        };

        let output = chain.execute(&prompt, &chain_options).await?;
        logger.log_result(&output)?;

        if options.git {
            git::commit_changes(&logger.task_id().to_string(), task).await;
        }

        println!("{output}");
        Ok(())
    }
}

/// Map shortcut task texts straight to a diagnostic, bypassing planning
/// and selection.
pub fn match_shortcut(task: &str) -> Option<DiagnosticKind> {
    if TEST_SHORTCUT.is_match(task) {
        Some(DiagnosticKind::Test)
    } else if SYNTAX_SHORTCUT.is_match(task) {
        Some(DiagnosticKind::Syntax)
    } else if LINT_SHORTCUT.is_match(task) {
        Some(DiagnosticKind::Lint)
    } else {
        None
    }
}
