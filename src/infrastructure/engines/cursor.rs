//! Cursor agent CLI adapter.
//!
//! The prompt is embedded directly in the invocation (no stdin piping),
//! prefixed with a framing instruction so the agent works autonomously
//! instead of conversing. Resume and cloud modes are mutually exclusive in
//! flag construction; a resume attempt against a fresh workspace retries
//! once with resume disabled. Agent-style multi-step tasks get a longer
//! timeout than the other CLI engines.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error::EngineError;
use crate::domain::models::{CursorConfig, Engine};
use crate::domain::ports::{EngineAdapter, InvokeOptions};

use super::process::run_with_timeout;

const AGENT_FRAMING: &str =
    "Act as an autonomous agent. Do not converse or ask questions; complete the task and report the result.";

pub struct CursorAdapter {
    config: CursorConfig,
}

impl CursorAdapter {
    pub fn new(config: CursorConfig) -> Self {
        Self { config }
    }

    fn build_args(prompt: &str, resume: bool, cloud: bool) -> Vec<String> {
        // --trust --yolo ensures no interactive prompts in headless mode
        let mut args = vec![
            "-p".to_string(),
            format!("{AGENT_FRAMING}\n\n{prompt}"),
            "--trust".to_string(),
            "--yolo".to_string(),
        ];
        if cloud {
            args.push("-c".to_string());
        } else if resume {
            args.push("--continue".to_string());
        }
        args
    }
}

#[async_trait]
impl EngineAdapter for CursorAdapter {
    fn engine(&self) -> Engine {
        Engine::Cursor
    }

    async fn invoke(
        &self,
        prompt: &str,
        _model: Option<&str>,
        options: &InvokeOptions,
    ) -> Result<String, EngineError> {
        let mut result = run_with_timeout(
            Engine::Cursor,
            &self.config.binary,
            &Self::build_args(prompt, options.resume, options.cloud),
            None,
            self.config.timeout_secs,
        )
        .await?;

        if !result.success && result.output.contains("No previous chats found") {
            debug!("cursor found no previous chats, retrying without resume");
            result = run_with_timeout(
                Engine::Cursor,
                &self.config.binary,
                &Self::build_args(prompt, false, options.cloud),
                None,
                self.config.timeout_secs,
            )
            .await?;
        }

        if result.success {
            Ok(result.output)
        } else {
            Err(EngineError::CommandFailed {
                engine: Engine::Cursor,
                output: result.output,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded_with_framing() {
        let args = CursorAdapter::build_args("rename foo", false, false);
        assert_eq!(args[0], "-p");
        assert!(args[1].starts_with(AGENT_FRAMING));
        assert!(args[1].ends_with("rename foo"));
        assert_eq!(&args[2..], ["--trust", "--yolo"]);
    }

    #[test]
    fn test_resume_adds_continue_flag() {
        let args = CursorAdapter::build_args("task", true, false);
        assert!(args.contains(&"--continue".to_string()));
        assert!(!args.contains(&"-c".to_string()));
    }

    #[test]
    fn test_cloud_and_resume_are_mutually_exclusive() {
        let args = CursorAdapter::build_args("task", true, true);
        assert!(args.contains(&"-c".to_string()));
        assert!(!args.contains(&"--continue".to_string()));
    }
}
