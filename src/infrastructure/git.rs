//! Git branch/commit helpers around task execution.
//!
//! Best-effort: a workspace without git (or a failing git invocation) logs
//! a warning and never interrupts the task.

use tokio::process::Command;
use tracing::warn;

async fn git(args: &[&str]) -> bool {
    match Command::new("git").args(args).output().await {
        Ok(output) => {
            if !output.status.success() {
                warn!(
                    args = ?args,
                    stderr = %String::from_utf8_lossy(&output.stderr),
                    "git command failed"
                );
            }
            output.status.success()
        }
        Err(err) => {
            warn!(args = ?args, error = %err, "failed to launch git");
            false
        }
    }
}

/// Create a `task-<id>` branch for the upcoming changes.
pub async fn create_branch(task_id: &str) {
    git(&["checkout", "-b", &format!("task-{task_id}")]).await;
}

/// Stage and commit everything the task changed.
pub async fn commit_changes(task_id: &str, task: &str) {
    if git(&["add", "-A"]).await {
        git(&["commit", "-m", &format!("hermes: task-{task_id} {task}")]).await;
    }
}
