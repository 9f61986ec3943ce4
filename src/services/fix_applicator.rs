//! Fix escalation: turn a diagnostic summary into applied patches.
//!
//! Builds a fix request from the summary and the failing file contents,
//! drives the engine fallback chain to obtain a JSON fix response, applies
//! the patches to the workspace, and re-runs verification. Lint failures
//! iterate one offense at a time under a fixed budget; test and syntax
//! failures get a single fix-apply-verify pass.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use console::style;
use regex::Regex;
use tracing::info;

use crate::domain::models::{
    DiagnosticKind, DiagnosticOutcome, DiagnosticSummary, Engine, EngineRule, FixResult, Selection,
    TaskPlan, TaskType,
};
use crate::domain::ports::{CommandRunner, OutputSummarizer, QuotaTracker};
use crate::services::diagnostic_runner::{print_summary, summarize_output};
use crate::services::engine_chain::{ChainOptions, EngineChain};
use crate::services::engine_registry::EngineRegistry;
use crate::services::model_selector::ModelSelector;
use crate::services::prompt_builder::PromptBuilder;

/// Budget for the lint single-offense iteration.
pub const MAX_LINT_ITERATIONS: usize = 20;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern"));

/// Applies engine-produced fixes in response to diagnostic failures.
pub struct FixApplicator {
    models: BTreeMap<TaskType, EngineRule>,
    registry: EngineRegistry,
    quota: Arc<dyn QuotaTracker>,
    command_runner: Arc<dyn CommandRunner>,
    summarizer: Arc<dyn OutputSummarizer>,
    /// Workspace context prepended to fix prompts.
    context: String,
    /// Root against which patch paths and failing-file reads resolve.
    root: PathBuf,
}

impl FixApplicator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        models: BTreeMap<TaskType, EngineRule>,
        registry: EngineRegistry,
        quota: Arc<dyn QuotaTracker>,
        command_runner: Arc<dyn CommandRunner>,
        summarizer: Arc<dyn OutputSummarizer>,
        context: String,
        root: PathBuf,
    ) -> Self {
        Self {
            models,
            registry,
            quota,
            command_runner,
            summarizer,
            context,
            root,
        }
    }

    /// Escalate a diagnostic failure to the engines.
    ///
    /// Lint iterates one offense at a time up to the budget; test and
    /// syntax get a single pass. A malformed fix response is fatal for the
    /// whole escalation, not silently treated as "no patches".
    pub async fn escalate(
        &self,
        kind: DiagnosticKind,
        summary: DiagnosticSummary,
        verify_command: &str,
    ) -> Result<DiagnosticOutcome> {
        match kind {
            DiagnosticKind::Lint => self.escalate_lint(summary, verify_command).await,
            _ => {
                let fixed = self.escalate_once(&summary, kind, verify_command, false).await?;
                Ok(if fixed {
                    DiagnosticOutcome::Fixed
                } else {
                    DiagnosticOutcome::Failed
                })
            }
        }
    }

    /// Lint loop: fix only the first offense, re-verify, re-summarize the
    /// remaining offenses, repeat. Bounded; running out of budget is a
    /// partial success ("some offenses may remain"), not an error.
    async fn escalate_lint(
        &self,
        summary: DiagnosticSummary,
        verify_command: &str,
    ) -> Result<DiagnosticOutcome> {
        let mut current = summary;

        for iteration in 1..=MAX_LINT_ITERATIONS {
            if iteration > 1 {
                println!("\n--- Fix iteration {iteration}/{MAX_LINT_ITERATIONS} ---");
            }

            if self
                .escalate_once(&current, DiagnosticKind::Lint, verify_command, true)
                .await?
            {
                return Ok(DiagnosticOutcome::Fixed);
            }

            let verify = self.command_runner.run(verify_command).await;
            if verify.succeeded() {
                println!("Lint issues resolved on re-check.");
                return Ok(DiagnosticOutcome::Fixed);
            }

            current =
                summarize_output(&verify.output, DiagnosticKind::Lint, self.summarizer.as_ref())
                    .await;
            print_summary(&current, "Remaining offenses");
        }

        println!("\nReached max iterations ({MAX_LINT_ITERATIONS}). Some offenses may remain.");
        Ok(DiagnosticOutcome::Exhausted)
    }

    /// One fix-apply-verify pass. Returns whether verification now passes.
    async fn escalate_once(
        &self,
        summary: &DiagnosticSummary,
        kind: DiagnosticKind,
        verify_command: &str,
        fix_first_only: bool,
    ) -> Result<bool> {
        // Diagnostic fixes are always medium-risk refactors, whatever the
        // original task was. Re-resolve the selection fresh each pass.
        let selection = ModelSelector::select(&TaskPlan::fix_default(), &self.models);
        println!("Selected engine for fix: {}", selection.describe());
        info!(engine = %selection.engine, "escalating diagnostic fix");

        let prompt = self.build_fix_prompt(summary, kind, fix_first_only);
        let fix = self.request_fix(&prompt, &selection).await?;

        if !fix.patches.is_empty() {
            self.apply_patches(&fix)?;
        }

        let verify = self.command_runner.run(verify_command).await;
        if verify.succeeded() {
            println!("Fix successful! {} issues resolved. {}", kind, style("✓").green());
            Ok(true)
        } else {
            println!("Fix failed. {} issues still persist. {}", kind, style("✗").red());
            Ok(false)
        }
    }

    fn build_fix_prompt(
        &self,
        summary: &DiagnosticSummary,
        kind: DiagnosticKind,
        fix_first_only: bool,
    ) -> String {
        let mut builder = PromptBuilder::new()
            .add_context(&self.context)
            .add_diagnostic(kind, &summary.failed_items, &summary.error_summary)
            .add_instruction(&format!("TASK: Fix the {kind} failures identified above."));

        if fix_first_only {
            builder = builder.add_instruction("Fix ONLY the first offense listed.");
        }

        builder
            .add_instruction(
                "You MUST respond with JSON containing 'explanation' and 'patches' \
                 (each patch with 'file' and 'content' fields).",
            )
            .add_files(&self.root, &summary.files)
            .build()
    }

    /// Drive the fallback chain rooted at the selected engine and parse the
    /// JSON fix response.
    async fn request_fix(&self, prompt: &str, selection: &Selection) -> Result<FixResult> {
        let order = EngineChain::fallback_from(selection.engine);
        let chain = EngineChain::build(&order, &self.registry, self.quota.clone())
            .context("failed to build fix fallback chain")?;

        let options = ChainOptions {
            model: selection.model.clone(),
            fork_session: true,
            resume: true,
            cloud: false,
        };

        let raw = chain
            .execute_fix(prompt, &options, Some(&note_checkpoint))
            .await?;
        parse_fix_response(&raw)
    }

    /// Apply each patch by overwriting the file at its declared relative
    /// path. Per-file atomicity only; the patch list is not one transaction.
    fn apply_patches(&self, fix: &FixResult) -> Result<()> {
        for patch in &fix.patches {
            let path = self.root.join(&patch.file);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create parent dirs for {}", patch.file))?;
            }
            std::fs::write(&path, &patch.content)
                .with_context(|| format!("failed to write patch to {}", patch.file))?;
            println!("Applied fix to {} {}", patch.file, style("✓").green());
        }
        Ok(())
    }
}

/// Checkpoint bookkeeping before each fix attempt. Engines with native
/// session persistence need no extra work; the task branch covers the rest.
fn note_checkpoint(engine: Engine) {
    let message = match engine {
        Engine::Claude => "Leveraging claude auto-checkpoint...".to_string(),
        Engine::Codex => "Leveraging codex session persistence...".to_string(),
        other => format!("Ensuring state persistence for {other}..."),
    };
    println!("{message}");
}

/// Parse an engine's fix response as JSON, stripping a fenced code block
/// if present. A parse failure prints the raw output for operator
/// diagnosis and is fatal for the attempt.
pub fn parse_fix_response(raw: &str) -> Result<FixResult> {
    let json_str = FENCE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str());

    serde_json::from_str(json_str).map_err(|err| {
        println!(
            "\n{} Failed to parse valid JSON from the AI engine's response.",
            style("!").yellow()
        );
        println!("--- Raw Output ---\n{raw}\n----------------");
        anyhow!("engine fix response was not valid JSON: {err}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fix_response_plain_json() {
        let raw = r#"{"explanation": "x", "patches": []}"#;
        let fix = parse_fix_response(raw).unwrap();
        assert_eq!(fix.explanation, "x");
        assert!(fix.patches.is_empty());
    }

    #[test]
    fn test_parse_fix_response_strips_json_fence() {
        let raw = "Here you go:\n```json\n{\"explanation\": \"y\", \"patches\": [{\"file\": \"a.rs\", \"content\": \"fn main() {}\"}]}\n```\nDone.";
        let fix = parse_fix_response(raw).unwrap();
        assert_eq!(fix.explanation, "y");
        assert_eq!(fix.patches[0].file, "a.rs");
    }

    #[test]
    fn test_parse_fix_response_strips_bare_fence() {
        let raw = "```\n{\"explanation\": \"z\", \"patches\": []}\n```";
        let fix = parse_fix_response(raw).unwrap();
        assert_eq!(fix.explanation, "z");
    }

    #[test]
    fn test_parse_fix_response_malformed_is_an_error() {
        assert!(parse_fix_response("I could not produce a fix, sorry.").is_err());
    }
}
