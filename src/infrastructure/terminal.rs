//! Shell command execution for verification runs.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::ports::{CommandOutcome, CommandRunner};

/// Runs verification commands through `sh -c`, capturing combined output.
/// A non-zero exit is a result, not an error; failing to launch the shell
/// at all reports exit status 1 with the launch error as output.
pub struct ShellCommandRunner;

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str) -> CommandOutcome {
        debug!(command, "running verification command");
        match Command::new("sh").arg("-c").arg(command).output().await {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                CommandOutcome {
                    output: combined,
                    exit_status: output.status.code().unwrap_or(1),
                }
            }
            Err(err) => CommandOutcome {
                output: format!("failed to launch command: {err}"),
                exit_status: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_zero_exit_with_output() {
        let outcome = ShellCommandRunner.run("echo hello").await;
        assert_eq!(outcome.exit_status, 0);
        assert!(outcome.succeeded());
        assert!(outcome.output.contains("hello"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_returned_not_raised() {
        let outcome = ShellCommandRunner.run("echo broken >&2; exit 4").await;
        assert_eq!(outcome.exit_status, 4);
        assert!(!outcome.succeeded());
        assert!(outcome.output.contains("broken"));
    }
}
