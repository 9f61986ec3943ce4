//! Diagnostic output summarizer port.

use async_trait::async_trait;

use crate::domain::models::{DiagnosticKind, DiagnosticSummary};

/// Language-model fallback used when the structural diagnostic parser
/// yields nothing actionable.
///
/// Implementations must degrade to a clearly labeled minimal summary on
/// their own failure instead of propagating an error into the fix loop.
#[async_trait]
pub trait OutputSummarizer: Send + Sync {
    async fn summarize(&self, raw_output: &str, kind: DiagnosticKind) -> DiagnosticSummary;
}
