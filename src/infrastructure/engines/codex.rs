//! Codex CLI adapter.
//!
//! Always runs `codex exec` in fully-automated mode for headless use. A
//! `--resume` failure against a tool with no prior session (or an older
//! tool without the flag) drops the flag and retries once.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::error::EngineError;
use crate::domain::models::{CodexConfig, Engine};
use crate::domain::ports::{EngineAdapter, InvokeOptions};

use super::process::run_with_timeout;

pub struct CodexAdapter {
    config: CodexConfig,
}

impl CodexAdapter {
    pub fn new(config: CodexConfig) -> Self {
        Self { config }
    }

    fn build_args(resume: bool) -> Vec<String> {
        // --full-auto is the low-friction automation mode.
        let mut args = vec!["exec".to_string(), "--full-auto".to_string(), "-".to_string()];
        if resume {
            args.push("--resume".to_string());
        }
        args
    }

    fn should_retry_without_resume(output: &str) -> bool {
        output.contains("No session found") || output.contains("error: unexpected argument")
    }
}

#[async_trait]
impl EngineAdapter for CodexAdapter {
    fn engine(&self) -> Engine {
        Engine::Codex
    }

    async fn invoke(
        &self,
        prompt: &str,
        _model: Option<&str>,
        options: &InvokeOptions,
    ) -> Result<String, EngineError> {
        let mut result = run_with_timeout(
            Engine::Codex,
            &self.config.binary,
            &Self::build_args(options.resume),
            Some(prompt),
            self.config.timeout_secs,
        )
        .await?;

        if !result.success && options.resume && Self::should_retry_without_resume(&result.output) {
            debug!("codex rejected --resume, retrying without it");
            result = run_with_timeout(
                Engine::Codex,
                &self.config.binary,
                &Self::build_args(false),
                Some(prompt),
                self.config.timeout_secs,
            )
            .await?;
        }

        if result.success {
            Ok(result.output)
        } else {
            Err(EngineError::CommandFailed {
                engine: Engine::Codex,
                output: result.output,
            })
        }
    }
}
