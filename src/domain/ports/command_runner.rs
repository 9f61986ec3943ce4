//! Verification command runner port.

use async_trait::async_trait;

/// Captured result of a verification command.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Combined stdout and stderr.
    pub output: String,
    pub exit_status: i32,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_status == 0
    }
}

/// Runs a shell command and captures its output.
///
/// Never errors on a non-zero exit; callers branch on `exit_status`. A
/// failure to launch the command at all is reported as exit status 1 with
/// the launch error as output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> CommandOutcome;
}
