//! Fix responses returned by engines during escalation.

use serde::{Deserialize, Serialize};

/// One file replacement from a fix response. Applied by overwriting the
/// file at the declared relative path; parent directories are created as
/// needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub file: String,
    pub content: String,
}

/// Parsed engine reply to a fix request.
///
/// Engines are instructed to answer with JSON carrying an explanation and a
/// list of file patches, possibly wrapped in a fenced code block. Patches
/// apply per-file; the set of files is not one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResult {
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub patches: Vec<Patch>,
}
