//! Fluent builder assembling engine prompts from sections.

use std::path::Path;

use tracing::debug;

use crate::domain::models::{DiagnosticKind, FileRef};

/// Builds a prompt out of ordered sections joined by blank lines. Empty
/// sections are skipped.
#[derive(Default)]
pub struct PromptBuilder {
    sections: Vec<String>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_context(mut self, context: &str) -> Self {
        if !context.trim().is_empty() {
            self.sections.push(context.to_string());
        }
        self
    }

    pub fn add_task(mut self, task: &str) -> Self {
        self.sections.push(format!("TASK:\n{task}"));
        self
    }

    pub fn add_diagnostic(
        mut self,
        kind: DiagnosticKind,
        failed_items: &[String],
        error_summary: &str,
    ) -> Self {
        self.sections.push(format!(
            "DIAGNOSTIC SUMMARY ({}):\nFailed Items: {}\nError: {}",
            kind.as_str().to_uppercase(),
            failed_items.join(", "),
            error_summary,
        ));
        self
    }

    /// Embed the contents of the failing files, read from disk relative to
    /// `root`. Missing files are skipped.
    pub fn add_files(mut self, root: &Path, files: &[FileRef]) -> Self {
        let mut rendered = Vec::new();
        for file in files {
            let path = root.join(&file.path);
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    rendered.push(format!("--- FILE: {} ---\n{}", file.path, content));
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable failing file");
                }
            }
        }
        if !rendered.is_empty() {
            self.sections
                .push(format!("FAILING FILE CONTENTS:\n{}", rendered.join("\n\n")));
        }
        self
    }

    pub fn add_instruction(mut self, instruction: &str) -> Self {
        if !instruction.trim().is_empty() {
            self.sections.push(instruction.to_string());
        }
        self
    }

    pub fn build(self) -> String {
        self.sections.join("\n\n")
    }
}
