//! Diagnostic loop entry: run a verification command and escalate failures.
//!
//! One run walks the state machine
//! `RUNNING -> (PASSED | FAILED) -> [ESCALATING] -> (FIXED | EXHAUSTED)`.
//! A failing command's output goes through the structural parser first; the
//! LLM summarizer is the slow-path fallback when nothing actionable comes
//! back.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::domain::models::{DiagnosticKind, DiagnosticOutcome, DiagnosticSummary};
use crate::domain::ports::{CommandRunner, OutputSummarizer};
use crate::services::diagnostic_parser;
use crate::services::fix_applicator::FixApplicator;

/// Runs verification commands and hands failures to the fix applicator.
pub struct DiagnosticRunner {
    command_runner: Arc<dyn CommandRunner>,
    summarizer: Arc<dyn OutputSummarizer>,
    applicator: FixApplicator,
}

impl DiagnosticRunner {
    pub fn new(
        command_runner: Arc<dyn CommandRunner>,
        summarizer: Arc<dyn OutputSummarizer>,
        applicator: FixApplicator,
    ) -> Self {
        Self {
            command_runner,
            summarizer,
            applicator,
        }
    }

    /// Run one diagnostic: execute `command`, and on failure summarize the
    /// output and escalate to the fix applicator (unless `dry_run`).
    pub async fn run(
        &self,
        command: &str,
        kind: DiagnosticKind,
        title: &str,
        dry_run: bool,
    ) -> Result<DiagnosticOutcome> {
        let spinner = create_spinner(&format!("{title}..."));
        let result = self.command_runner.run(command).await;
        spinner.finish_and_clear();

        if result.succeeded() {
            println!("{title} passed! {}", style("✓").green());
            return Ok(DiagnosticOutcome::Passed);
        }

        info!(command, kind = %kind, exit_status = result.exit_status, "verification failed");
        let spinner = create_spinner(&format!("{title} failed. Summarizing diagnostic output..."));
        let summary = summarize_output(&result.output, kind, self.summarizer.as_ref()).await;
        spinner.finish_and_clear();

        print_summary(
            &summary,
            &format!("Diagnostic Summary ({})", kind.as_str().to_uppercase()),
        );

        if dry_run {
            println!("Dry run: skipping escalation.");
            return Ok(DiagnosticOutcome::SkippedEscalation);
        }

        self.applicator.escalate(kind, summary, command).await
    }
}

/// Parse raw verification output, escalating to the LLM summarizer only
/// when the structural parser yields nothing actionable.
pub async fn summarize_output(
    raw_output: &str,
    kind: DiagnosticKind,
    summarizer: &dyn OutputSummarizer,
) -> DiagnosticSummary {
    let parsed = diagnostic_parser::parse(raw_output, kind);
    if parsed.is_actionable() {
        return parsed;
    }
    summarizer.summarize(raw_output, kind).await
}

/// Render a summary as an attribute/value table on stdout.
pub fn print_summary(summary: &DiagnosticSummary, title: &str) {
    println!("\n--- {title} ---");
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Attribute", "Value"]);
    table.add_row(vec![
        Cell::new("Failed Items"),
        Cell::new(summary.failed_items.join("\n")),
    ]);
    table.add_row(vec![
        Cell::new("Error Summary"),
        Cell::new(&summary.error_summary),
    ]);
    println!("{table}");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedSummarizer {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl OutputSummarizer for CannedSummarizer {
        async fn summarize(&self, _raw: &str, _kind: DiagnosticKind) -> DiagnosticSummary {
            *self.calls.lock().unwrap() += 1;
            DiagnosticSummary {
                failed_items: vec!["from summarizer".to_string()],
                error_summary: "summarized".to_string(),
                files: vec![],
            }
        }
    }

    #[tokio::test]
    async fn test_actionable_parse_skips_summarizer() {
        let summarizer = CannedSummarizer {
            calls: Mutex::new(0),
        };
        let summary =
            summarize_output("lib/foo.rb:10:5: C: msg", DiagnosticKind::Lint, &summarizer).await;
        assert_eq!(*summarizer.calls.lock().unwrap(), 0);
        assert!(!summary.files.is_empty());
    }

    #[tokio::test]
    async fn test_blank_output_escalates_to_summarizer() {
        let summarizer = CannedSummarizer {
            calls: Mutex::new(0),
        };
        let summary = summarize_output("", DiagnosticKind::Test, &summarizer).await;
        assert_eq!(*summarizer.calls.lock().unwrap(), 1);
        assert_eq!(summary.error_summary, "summarized");
    }

    #[tokio::test]
    async fn test_unparseable_text_is_still_actionable_without_summarizer() {
        // Raw-line fallback counts as actionable; the summarizer stays cold.
        let summarizer = CannedSummarizer {
            calls: Mutex::new(0),
        };
        let summary = summarize_output("free form noise", DiagnosticKind::Lint, &summarizer).await;
        assert_eq!(*summarizer.calls.lock().unwrap(), 0);
        assert_eq!(summary.failed_items, vec!["free form noise".to_string()]);
    }
}
