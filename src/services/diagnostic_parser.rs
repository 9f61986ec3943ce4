//! Structural parsing of verification tool output.
//!
//! Converts raw lint/test/syntax output into a normalized
//! `DiagnosticSummary` without any I/O. JSON reports are tried first, then
//! line-oriented text patterns; anything else falls back to a conservative
//! summary of the raw lines. Keeping this fast path structural avoids
//! shipping raw logs to a language model for summarization.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::models::{DiagnosticKind, DiagnosticSummary, FileRef};

/// Raw-line cap for the conservative fallback summary.
const FALLBACK_MAX_LINES: usize = 50;

static LINT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?):(\d+):\d+: ([CWEF]): (.+)$").expect("lint line pattern")
});

static SYNTAX_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?):(\d+):\s*(.+)$").expect("syntax line pattern"));

static LOCATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w./-]+\.\w+):(\d+)").expect("location marker pattern"));

/// Parse raw verification output into a normalized summary.
///
/// Pure and deterministic: same output and kind, same summary.
pub fn parse(raw_output: &str, kind: DiagnosticKind) -> DiagnosticSummary {
    let cleaned = console::strip_ansi_codes(raw_output).into_owned();
    if cleaned.trim().is_empty() {
        return fallback_summary(&cleaned, kind);
    }

    let summary = match kind {
        DiagnosticKind::Lint => parse_lint(&cleaned),
        DiagnosticKind::Test => parse_test(&cleaned),
        DiagnosticKind::Syntax => parse_syntax(&cleaned),
    };

    if summary.is_actionable() {
        summary
    } else {
        fallback_summary(&cleaned, kind)
    }
}

// --- lint ---------------------------------------------------------------

#[derive(Deserialize)]
struct LintReport {
    #[serde(default)]
    files: Vec<LintFile>,
}

#[derive(Deserialize)]
struct LintFile {
    path: String,
    #[serde(default)]
    offenses: Vec<LintOffense>,
}

#[derive(Deserialize)]
struct LintOffense {
    #[serde(default)]
    message: String,
    #[serde(default)]
    location: LintLocation,
}

#[derive(Deserialize, Default)]
struct LintLocation {
    line: Option<u32>,
    start_line: Option<u32>,
}

fn parse_lint(output: &str) -> DiagnosticSummary {
    let Ok(report) = serde_json::from_str::<LintReport>(output) else {
        return parse_lint_text(output);
    };

    let mut collector = Collector::default();
    for file in &report.files {
        for offense in &file.offenses {
            let line = offense.location.line.or(offense.location.start_line).unwrap_or(0);
            collector.push(&file.path, line, &offense.message);
        }
    }
    collector.into_summary("lint")
}

fn parse_lint_text(output: &str) -> DiagnosticSummary {
    let mut collector = Collector::default();
    for line in output.lines() {
        if let Some(caps) = LINT_LINE.captures(line.trim_end()) {
            let path = caps[1].trim().to_string();
            let line_num = caps[2].parse().unwrap_or(0);
            collector.push(&path, line_num, &caps[4]);
        }
    }
    collector.into_summary("lint")
}

// --- test ---------------------------------------------------------------

#[derive(Deserialize)]
struct TestReport {
    #[serde(default)]
    examples: Vec<TestExample>,
}

#[derive(Deserialize)]
struct TestExample {
    #[serde(default)]
    status: String,
    file_path: Option<String>,
    line_number: Option<u32>,
    exception: Option<TestException>,
    full_description: Option<String>,
}

#[derive(Deserialize)]
struct TestException {
    #[serde(default)]
    message: String,
}

fn parse_test(output: &str) -> DiagnosticSummary {
    let Ok(report) = serde_json::from_str::<TestReport>(output) else {
        return parse_test_text(output);
    };

    let mut collector = Collector::default();
    for example in &report.examples {
        if example.status != "failed" {
            continue;
        }
        let path = example
            .file_path
            .as_deref()
            .map(|p| p.strip_prefix("./").unwrap_or(p))
            .unwrap_or_default();
        let line = example.line_number.unwrap_or(0);
        let message = example
            .exception
            .as_ref()
            .map(|e| e.message.as_str())
            .or(example.full_description.as_deref())
            .unwrap_or_default();
        collector.push(path, line, message);
    }
    collector.into_summary("test")
}

/// Text fallback: scan for stack-trace-style `path:line` location markers.
fn parse_test_text(output: &str) -> DiagnosticSummary {
    let mut collector = Collector::default();
    for line in output.lines() {
        if let Some(caps) = LOCATION_MARKER.captures(line) {
            let path = caps[1].strip_prefix("./").unwrap_or(&caps[1]).to_string();
            let line_num = caps[2].parse().unwrap_or(0);
            collector.push_raw(line.trim(), &path, line_num);
        }
    }
    collector.into_summary("test")
}

// --- syntax -------------------------------------------------------------

fn parse_syntax(output: &str) -> DiagnosticSummary {
    let mut collector = Collector::default();
    for line in output.lines() {
        if let Some(caps) = SYNTAX_LINE.captures(line.trim_end()) {
            let path = caps[1].trim().to_string();
            let line_num = caps[2].parse().unwrap_or(0);
            collector.push(&path, line_num, caps[3].trim());
        }
    }
    collector.into_summary("syntax")
}

// --- shared -------------------------------------------------------------

/// Accumulates failed items and `(path, line)`-deduplicated file refs.
#[derive(Default)]
struct Collector {
    failed_items: Vec<String>,
    files: Vec<FileRef>,
    seen: HashSet<(String, u32)>,
}

impl Collector {
    fn push(&mut self, path: &str, line: u32, message: &str) {
        self.failed_items.push(format!("{path}:{line}: {message}"));
        self.push_file(path, line);
    }

    /// Record an already-formatted failed item with its location.
    fn push_raw(&mut self, item: &str, path: &str, line: u32) {
        self.failed_items.push(item.to_string());
        self.push_file(path, line);
    }

    fn push_file(&mut self, path: &str, line: u32) {
        if self.seen.insert((path.to_string(), line)) {
            self.files.push(FileRef::new(path, line));
        }
    }

    fn into_summary(self, source: &str) -> DiagnosticSummary {
        let error_summary = build_error_summary(self.failed_items.len(), source);
        DiagnosticSummary {
            failed_items: self.failed_items,
            error_summary,
            files: self.files,
        }
    }
}

fn build_error_summary(count: usize, source: &str) -> String {
    if count == 0 {
        format!("No {source} issues found.")
    } else {
        format!("There are {count} failed {source} item(s).")
    }
}

/// Conservative summary when nothing structural matched: at most the first
/// 50 raw lines, no file refs. An entirely blank output yields an empty
/// (non-actionable) summary, which escalates to the LLM summarizer.
fn fallback_summary(output: &str, kind: DiagnosticKind) -> DiagnosticSummary {
    let failed_items: Vec<String> = output
        .lines()
        .take(FALLBACK_MAX_LINES)
        .map(String::from)
        .collect();
    DiagnosticSummary {
        failed_items,
        error_summary: format!("Could not structurally parse {kind} output; raw lines provided."),
        files: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_json_round_trip() {
        let report = serde_json::json!({
            "files": [
                {
                    "path": "lib/foo.rb",
                    "offenses": [
                        { "message": "Line too long", "location": { "line": 10 } }
                    ]
                }
            ]
        })
        .to_string();

        let summary = parse(&report, DiagnosticKind::Lint);
        assert_eq!(summary.files, vec![FileRef::new("lib/foo.rb", 10)]);
        assert!(summary.failed_items.iter().any(|i| i.contains("lib/foo.rb:10:")));
        assert!(summary.error_summary.contains("1 failed"));
    }

    #[test]
    fn test_lint_json_uses_start_line_when_line_missing() {
        let report = serde_json::json!({
            "files": [
                {
                    "path": "lib/bar.rb",
                    "offenses": [
                        { "message": "Offense", "location": { "start_line": 5 } }
                    ]
                }
            ]
        })
        .to_string();

        let summary = parse(&report, DiagnosticKind::Lint);
        assert_eq!(summary.files, vec![FileRef::new("lib/bar.rb", 5)]);
    }

    #[test]
    fn test_lint_text_fallback_matches_json_result() {
        let summary = parse("lib/foo.rb:10:5: C: msg", DiagnosticKind::Lint);
        assert_eq!(summary.files, vec![FileRef::new("lib/foo.rb", 10)]);
        assert!(summary.failed_items.iter().any(|i| i.contains("lib/foo.rb:10:")));
    }

    #[test]
    fn test_lint_text_accepts_all_severity_letters() {
        for severity in ["C", "W", "E", "F"] {
            let line = format!("lib/foo.rb:3:1: {severity}: msg");
            let summary = parse(&line, DiagnosticKind::Lint);
            assert_eq!(summary.files, vec![FileRef::new("lib/foo.rb", 3)], "severity {severity}");
        }
    }

    #[test]
    fn test_deduplicates_offenses_at_same_path_and_line() {
        let report = serde_json::json!({
            "files": [
                {
                    "path": "lib/foo.rb",
                    "offenses": [
                        { "message": "first", "location": { "line": 10 } },
                        { "message": "second", "location": { "line": 10 } },
                        { "message": "third", "location": { "line": 11 } }
                    ]
                }
            ]
        })
        .to_string();

        let summary = parse(&report, DiagnosticKind::Lint);
        assert_eq!(
            summary.files,
            vec![FileRef::new("lib/foo.rb", 10), FileRef::new("lib/foo.rb", 11)]
        );
        assert_eq!(summary.failed_items.len(), 3);
    }

    #[test]
    fn test_test_json_report() {
        let report = serde_json::json!({
            "examples": [
                {
                    "status": "failed",
                    "file_path": "./spec/foo_spec.rb",
                    "line_number": 42,
                    "exception": { "message": "expected 1, got 2" }
                },
                {
                    "status": "passed",
                    "file_path": "./spec/bar_spec.rb",
                    "line_number": 7
                }
            ]
        })
        .to_string();

        let summary = parse(&report, DiagnosticKind::Test);
        assert_eq!(summary.files, vec![FileRef::new("spec/foo_spec.rb", 42)]);
        assert!(summary.failed_items[0].contains("spec/foo_spec.rb:42:"));
        assert!(summary.failed_items[0].contains("expected 1, got 2"));
    }

    #[test]
    fn test_test_text_fallback_scans_location_markers() {
        let output = "Failure:\n  something broke\n  at src/runner.rs:88 in run\n";
        let summary = parse(output, DiagnosticKind::Test);
        assert_eq!(summary.files, vec![FileRef::new("src/runner.rs", 88)]);
    }

    #[test]
    fn test_syntax_line_matching() {
        let output = "lib/broken.rb:14: unexpected end-of-input\n";
        let summary = parse(output, DiagnosticKind::Syntax);
        assert_eq!(summary.files, vec![FileRef::new("lib/broken.rb", 14)]);
        assert!(summary.failed_items[0].contains("unexpected end-of-input"));
    }

    #[test]
    fn test_strips_ansi_escapes_before_parsing() {
        let output = "\u{1b}[31mlib/foo.rb:10:5: C: msg\u{1b}[0m";
        let summary = parse(output, DiagnosticKind::Lint);
        assert_eq!(summary.files, vec![FileRef::new("lib/foo.rb", 10)]);
    }

    #[test]
    fn test_blank_output_yields_empty_non_actionable_summary() {
        let summary = parse("   \n  ", DiagnosticKind::Lint);
        assert!(!summary.is_actionable());
        assert!(summary.error_summary.contains("Could not structurally parse"));
    }

    #[test]
    fn test_unparseable_output_falls_back_to_raw_lines() {
        let output: String = (1..=60).map(|i| format!("noise {i}\n")).collect();
        let summary = parse(&output, DiagnosticKind::Lint);
        assert_eq!(summary.failed_items.len(), 50);
        assert!(summary.files.is_empty());
        assert!(summary.error_summary.contains("Could not structurally parse"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let output = "lib/foo.rb:10:5: C: msg\nlib/foo.rb:11:1: W: other";
        let first = parse(output, DiagnosticKind::Lint);
        let second = parse(output, DiagnosticKind::Lint);
        assert_eq!(first.failed_items, second.failed_items);
        assert_eq!(first.files, second.files);
    }
}
