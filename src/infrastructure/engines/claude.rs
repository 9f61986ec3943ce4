//! Claude CLI adapter.
//!
//! Requires an authenticated CLI session, checked before every invocation.
//! The prompt is passed on stdin (`-p -`) rather than as an argument so
//! large prompts never hit argument-length limits. Fork-session mode adds
//! the continuation flags.

use async_trait::async_trait;

use crate::domain::error::EngineError;
use crate::domain::models::{ClaudeConfig, Engine};
use crate::domain::ports::{EngineAdapter, InvokeOptions};

use super::process::run_with_timeout;

const DEFAULT_MODEL: &str = "sonnet";

pub struct ClaudeAdapter {
    config: ClaudeConfig,
}

impl ClaudeAdapter {
    pub fn new(config: ClaudeConfig) -> Self {
        Self { config }
    }

    async fn check_auth(&self) -> Result<(), EngineError> {
        let result = run_with_timeout(
            Engine::Claude,
            &self.config.binary,
            &["auth".to_string(), "status".to_string()],
            None,
            self.config.timeout_secs,
        )
        .await?;

        if result.success {
            Ok(())
        } else {
            Err(EngineError::NotAuthenticated)
        }
    }

    fn build_args(model: &str, fork_session: bool) -> Vec<String> {
        // --allow-dangerously-skip-permissions bypasses interactive prompts
        let mut args = vec![
            "--model".to_string(),
            model.to_string(),
            "-p".to_string(),
            "-".to_string(),
            "--allow-dangerously-skip-permissions".to_string(),
        ];
        if fork_session {
            args.push("--continue".to_string());
            args.push("--fork-session".to_string());
        }
        args
    }
}

#[async_trait]
impl EngineAdapter for ClaudeAdapter {
    fn engine(&self) -> Engine {
        Engine::Claude
    }

    async fn invoke(
        &self,
        prompt: &str,
        model: Option<&str>,
        options: &InvokeOptions,
    ) -> Result<String, EngineError> {
        self.check_auth().await?;

        let model = model.unwrap_or(DEFAULT_MODEL);
        let args = Self::build_args(model, options.fork_session);
        let result = run_with_timeout(
            Engine::Claude,
            &self.config.binary,
            &args,
            Some(prompt),
            self.config.timeout_secs,
        )
        .await?;

        if result.success {
            Ok(result.output)
        } else {
            Err(EngineError::CommandFailed {
                engine: Engine::Claude,
                output: result.output,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_reads_prompt_from_stdin() {
        let args = ClaudeAdapter::build_args("sonnet", false);
        assert_eq!(
            args,
            vec!["--model", "sonnet", "-p", "-", "--allow-dangerously-skip-permissions"]
        );
    }

    #[test]
    fn test_build_args_fork_session_adds_continuation_flags() {
        let args = ClaudeAdapter::build_args("opus", true);
        assert!(args.contains(&"--continue".to_string()));
        assert!(args.contains(&"--fork-session".to_string()));
    }
}
