//! Ollama-backed summarization of unparseable diagnostic output.
//!
//! Pure fallback role: only consulted when the structural parser comes
//! back empty-handed. Output is pre-filtered per diagnostic type and
//! truncated before it goes to the local model, and the reply is
//! constrained to the diagnostic summary schema. Failures degrade to a
//! labeled minimal summary; nothing here may raise into the fix loop.

use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use tracing::warn;

use crate::domain::models::{DiagnosticKind, DiagnosticSummary};
use crate::domain::ports::OutputSummarizer;
use crate::infrastructure::engines::OllamaClient;
use crate::services::prompt_builder::PromptBuilder;

const MAX_SUMMARY_INPUT: usize = 5_000;

static LINT_OFFENSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\d+:\d+: [CWEF]: ").expect("lint offense pattern"));

static TEST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\)\s)|(Failure)|(\bexpected\b)|(\bgot\b)|(\.\w+:\d+)")
        .expect("test marker pattern")
});

fn summary_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "required": ["failed_items", "error_summary", "files"],
        "properties": {
            "failed_items": { "type": "array", "items": { "type": "string" } },
            "error_summary": { "type": "string" },
            "files": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["path", "line"],
                    "properties": {
                        "path": { "type": "string" },
                        "line": { "type": "integer" }
                    }
                }
            }
        }
    })
}

pub struct OllamaSummarizer {
    client: Arc<OllamaClient>,
    healthy: bool,
}

impl OllamaSummarizer {
    pub fn new(client: Arc<OllamaClient>, healthy: bool) -> Self {
        Self { client, healthy }
    }

    async fn summarize_via_ollama(
        &self,
        raw_output: &str,
        kind: DiagnosticKind,
    ) -> Result<DiagnosticSummary, crate::domain::EngineError> {
        let available = self.client.list_model_names().await?;
        let model = self.client.resolve_model(None, &available);

        let truncated = filter_and_truncate(raw_output, kind);
        let prompt = PromptBuilder::new()
            .add_instruction(summary_instruction(kind))
            .add_instruction(&truncated)
            .build();

        let raw = self
            .client
            .generate(&prompt, &model, Some(&summary_schema()))
            .await?;

        let summary: DiagnosticSummary = serde_json::from_str(&raw).map_err(|e| {
            crate::domain::EngineError::Http(format!("summarizer reply was not a valid summary: {e}"))
        })?;
        Ok(summary.dedup_files())
    }
}

#[async_trait]
impl OutputSummarizer for OllamaSummarizer {
    async fn summarize(&self, raw_output: &str, kind: DiagnosticKind) -> DiagnosticSummary {
        if !self.healthy {
            return safe_fallback("local model unavailable");
        }

        match self.summarize_via_ollama(raw_output, kind).await {
            Ok(summary) => summary,
            Err(err) => {
                warn!(error = %err, kind = %kind, "summarizer failed, using labeled fallback");
                safe_fallback(&err.brief())
            }
        }
    }
}

fn summary_instruction(kind: DiagnosticKind) -> &'static str {
    match kind {
        DiagnosticKind::Lint => "Summarize lint offenses. Extract file paths and line numbers:",
        DiagnosticKind::Syntax => "Summarize syntax errors. Extract file paths and line numbers:",
        DiagnosticKind::Test => "Summarize test failures. Extract file paths and line numbers:",
    }
}

/// Keep only the lines worth summarizing for this diagnostic type, capped
/// at `MAX_SUMMARY_INPUT` characters.
fn filter_and_truncate(output: &str, kind: DiagnosticKind) -> String {
    let filtered = filter_output(output, kind);
    if filtered.len() <= MAX_SUMMARY_INPUT {
        return filtered;
    }
    let mut end = MAX_SUMMARY_INPUT;
    while !filtered.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n\n[... output truncated ...]", &filtered[..end])
}

fn filter_output(output: &str, kind: DiagnosticKind) -> String {
    let lines = output.lines();
    let selected: Vec<&str> = match kind {
        DiagnosticKind::Lint => lines.filter(|l| LINT_OFFENSE.is_match(l)).take(20).collect(),
        DiagnosticKind::Test => lines.filter(|l| TEST_MARKER.is_match(l)).take(50).collect(),
        DiagnosticKind::Syntax => lines.take(100).collect(),
    };
    selected.join("\n")
}

fn safe_fallback(reason: &str) -> DiagnosticSummary {
    DiagnosticSummary {
        failed_items: vec![],
        error_summary: format!("Safe mode: {reason}"),
        files: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{FileRef, OllamaConfig};

    fn client(base_url: &str) -> Arc<OllamaClient> {
        Arc::new(OllamaClient::new(OllamaConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn test_unhealthy_summarizer_returns_labeled_fallback() {
        let summarizer = OllamaSummarizer::new(client("http://127.0.0.1:1"), false);
        let summary = summarizer.summarize("whatever", DiagnosticKind::Lint).await;
        assert!(summary.error_summary.starts_with("Safe mode:"));
        assert!(summary.failed_items.is_empty());
        assert!(summary.files.is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_instead_of_raising() {
        let summarizer = OllamaSummarizer::new(client("http://127.0.0.1:1"), true);
        let summary = summarizer.summarize("whatever", DiagnosticKind::Test).await;
        assert!(summary.error_summary.starts_with("Safe mode:"));
    }

    #[tokio::test]
    async fn test_parses_and_dedups_structured_reply() {
        let mut server = mockito::Server::new_async().await;
        let _tags = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models": [{"name": "qwen3:latest"}]}"#)
            .create_async()
            .await;
        let summary_json = r#"{"failed_items": ["lib/foo.rb:10: broken"], "error_summary": "1 failure", "files": [{"path": "lib/foo.rb", "line": 10}, {"path": "lib/foo.rb", "line": 10}]}"#;
        let body = serde_json::json!({ "response": summary_json }).to_string();
        let _generate = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let summarizer = OllamaSummarizer::new(client(&server.url()), true);
        let summary = summarizer.summarize("raw logs", DiagnosticKind::Lint).await;
        assert_eq!(summary.files, vec![FileRef::new("lib/foo.rb", 10)]);
        assert_eq!(summary.error_summary, "1 failure");
    }

    #[test]
    fn test_filter_lint_keeps_offense_lines_only() {
        let output = "Inspecting 3 files\nlib/a.rb:1:2: C: bad\nnoise\nlib/b.rb:2:3: W: meh\n";
        let filtered = filter_output(output, DiagnosticKind::Lint);
        assert_eq!(filtered, "lib/a.rb:1:2: C: bad\nlib/b.rb:2:3: W: meh");
    }

    #[test]
    fn test_filter_test_keeps_failure_markers() {
        let output = "randomized seed 123\n1) Foo does a thing\n   Failure: nope\n   at spec/foo_spec.rb:12\nfooter\n";
        let filtered = filter_output(output, DiagnosticKind::Test);
        assert!(filtered.contains("1) Foo does a thing"));
        assert!(filtered.contains("Failure: nope"));
        assert!(filtered.contains("spec/foo_spec.rb:12"));
        assert!(!filtered.contains("randomized seed"));
    }

    #[test]
    fn test_truncation_appends_marker() {
        let long = "x".repeat(MAX_SUMMARY_INPUT + 100);
        let truncated = filter_and_truncate(&long, DiagnosticKind::Syntax);
        assert!(truncated.ends_with("[... output truncated ...]"));
        assert!(truncated.len() < long.len());
    }
}
