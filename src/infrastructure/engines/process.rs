//! Shared subprocess execution for CLI engines.
//!
//! Every CLI adapter runs through the same skeleton: spawn the engine
//! binary, optionally feed the prompt on stdin, capture combined output,
//! and enforce a hard timeout that kills the child on expiry.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::domain::error::EngineError;
use crate::domain::models::Engine;

/// Combined output of a finished engine process.
#[derive(Debug)]
pub struct ProcessResult {
    /// stdout followed by stderr.
    pub output: String,
    pub success: bool,
}

/// Run `binary args...` with a hard timeout, optionally piping `stdin_data`.
pub async fn run_with_timeout(
    engine: Engine,
    binary: &str,
    args: &[String],
    stdin_data: Option<&str>,
    timeout_secs: u64,
) -> Result<ProcessResult, EngineError> {
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .stdin(if stdin_data.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| EngineError::SpawnFailed {
        engine,
        reason: e.to_string(),
    })?;

    if let Some(data) = stdin_data {
        let mut stdin = child.stdin.take().ok_or_else(|| EngineError::SpawnFailed {
            engine,
            reason: "failed to open stdin handle".to_string(),
        })?;
        stdin
            .write_all(data.as_bytes())
            .await
            .map_err(|e| EngineError::SpawnFailed {
                engine,
                reason: format!("failed to write prompt to stdin: {e}"),
            })?;
        // Close stdin so the engine sees end of input.
        drop(stdin);
    }

    let waited = timeout(Duration::from_secs(timeout_secs), async {
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let mut output = String::new();
        if let Some(mut stdout) = stdout {
            tokio::io::AsyncReadExt::read_to_string(&mut stdout, &mut output)
                .await
                .map_err(|e| EngineError::SpawnFailed {
                    engine,
                    reason: format!("failed to read stdout: {e}"),
                })?;
        }
        if let Some(mut stderr) = stderr {
            tokio::io::AsyncReadExt::read_to_string(&mut stderr, &mut output)
                .await
                .map_err(|e| EngineError::SpawnFailed {
                    engine,
                    reason: format!("failed to read stderr: {e}"),
                })?;
        }

        let status = child.wait().await.map_err(|e| EngineError::SpawnFailed {
            engine,
            reason: format!("failed to wait for process: {e}"),
        })?;

        Ok::<_, EngineError>(ProcessResult {
            output,
            success: status.success(),
        })
    })
    .await;

    match waited {
        Ok(result) => result,
        Err(_) => {
            let _ = child.kill().await;
            Err(EngineError::Timeout {
                engine,
                seconds: timeout_secs,
            })
        }
    }
}
