//! Normalized diagnostic results.

use serde::{Deserialize, Serialize};

/// Category of automated verification whose failure output is parsed and
/// fed back into the fix loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Lint,
    Syntax,
    Test,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lint => "lint",
            Self::Syntax => "syntax",
            Self::Test => "test",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failing location. Summaries deduplicate these by `(path, line)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    pub line: u32,
}

impl FileRef {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

/// Normalized view of a failed verification run.
///
/// Produced fresh per failure and consumed immediately by the fix
/// applicator; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticSummary {
    #[serde(default)]
    pub failed_items: Vec<String>,
    #[serde(default)]
    pub error_summary: String,
    #[serde(default)]
    pub files: Vec<FileRef>,
}

impl DiagnosticSummary {
    /// Whether the parser extracted anything the fix loop can act on.
    /// An empty summary escalates to the LLM summarizer instead.
    pub fn is_actionable(&self) -> bool {
        !self.files.is_empty() || !self.failed_items.is_empty()
    }

    /// Enforce the `(path, line)` uniqueness invariant, keeping first
    /// occurrences in order. Applied to summaries from sources that do not
    /// guarantee it themselves.
    pub fn dedup_files(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.files
            .retain(|f| seen.insert((f.path.clone(), f.line)));
        self
    }
}

/// Terminal states of one diagnostic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticOutcome {
    /// Verification passed without escalation.
    Passed,
    /// A fix was applied and re-verification passed.
    Fixed,
    /// Fix escalation ran but verification still fails.
    Failed,
    /// The lint iteration budget ran out; some offenses may remain.
    Exhausted,
    /// Dry run stopped before escalation.
    SkippedEscalation,
}

impl DiagnosticOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Passed | Self::Fixed)
    }
}
