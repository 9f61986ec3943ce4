//! Configuration model for hermes.
//!
//! Loaded hierarchically by `infrastructure::config::ConfigLoader`:
//! programmatic defaults, then `~/.hermes/config.yaml`, then project
//! `.hermes/config.yaml`, then `HERMES_*` environment variables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::plan::TaskType;
use super::selection::Engine;

/// Main configuration structure for hermes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Per-task-type selection rules consulted by the model selector.
    #[serde(default = "default_models")]
    pub models: BTreeMap<TaskType, EngineRule>,

    /// Engine connection parameters.
    #[serde(default)]
    pub engines: EnginesConfig,

    /// Daily usage limits and quota file location.
    #[serde(default)]
    pub quota: QuotaConfig,

    /// Verification commands for the diagnostic shortcuts.
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Explicitly registered workspace roots for context loading.
    #[serde(default)]
    pub workspaces: Vec<String>,

    /// Directory for per-task JSON logs, relative to the workspace root.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

/// One row of the model selection rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineRule {
    pub engine: Engine,
    #[serde(default)]
    pub model: Option<String>,
}

impl EngineRule {
    pub fn new(engine: Engine, model: Option<&str>) -> Self {
        Self {
            engine,
            model: model.map(String::from),
        }
    }
}

fn default_models() -> BTreeMap<TaskType, EngineRule> {
    BTreeMap::from([
        (
            TaskType::Architecture,
            EngineRule::new(Engine::Claude, Some("opus")),
        ),
        (
            TaskType::Refactor,
            EngineRule::new(Engine::Claude, Some("sonnet")),
        ),
        (TaskType::BulkPatch, EngineRule::new(Engine::Codex, None)),
        (
            TaskType::TestGeneration,
            EngineRule::new(Engine::Claude, Some("sonnet")),
        ),
        (
            TaskType::Summarization,
            EngineRule::new(Engine::Ollama, None),
        ),
        (
            TaskType::InteractiveEdit,
            EngineRule::new(Engine::Cursor, None),
        ),
    ])
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: default_models(),
            engines: EnginesConfig::default(),
            quota: QuotaConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            logging: LoggingConfig::default(),
            workspaces: vec![],
            log_dir: default_log_dir(),
        }
    }
}

/// Connection parameters for all four engines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EnginesConfig {
    #[serde(default)]
    pub claude: ClaudeConfig,
    #[serde(default)]
    pub codex: CodexConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClaudeConfig {
    /// Path to the claude CLI executable.
    #[serde(default = "default_claude_binary")]
    pub binary: String,
    #[serde(default = "default_cli_timeout")]
    pub timeout_secs: u64,
}

fn default_claude_binary() -> String {
    "claude".to_string()
}

const fn default_cli_timeout() -> u64 {
    30
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            timeout_secs: default_cli_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CodexConfig {
    #[serde(default = "default_codex_binary")]
    pub binary: String,
    #[serde(default = "default_cli_timeout")]
    pub timeout_secs: u64,
}

fn default_codex_binary() -> String {
    "codex".to_string()
}

impl Default for CodexConfig {
    fn default() -> Self {
        Self {
            binary: default_codex_binary(),
            timeout_secs: default_cli_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CursorConfig {
    /// The cursor agent CLI.
    #[serde(default = "default_cursor_binary")]
    pub binary: String,
    /// Cursor drives agent-style multi-step tasks, so it gets a longer
    /// timeout than the other CLI engines.
    #[serde(default = "default_cursor_timeout")]
    pub timeout_secs: u64,
}

fn default_cursor_binary() -> String {
    "agent".to_string()
}

const fn default_cursor_timeout() -> u64 {
    120
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            binary: default_cursor_binary(),
            timeout_secs: default_cursor_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default = "default_cli_timeout")]
    pub timeout_secs: u64,
    /// Context window requested from the model.
    #[serde(default = "default_num_ctx")]
    pub num_ctx: u32,
    /// Known-good local models tried, in order, when the requested model is
    /// not installed.
    #[serde(default = "default_preferred_models")]
    pub preferred_models: Vec<String>,
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

const fn default_num_ctx() -> u32 {
    8192
}

fn default_preferred_models() -> Vec<String> {
    vec!["qwen3:latest".to_string(), "qwen3:8b".to_string()]
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            timeout_secs: default_cli_timeout(),
            num_ctx: default_num_ctx(),
            preferred_models: default_preferred_models(),
        }
    }
}

/// Daily usage limits. Engines without an entry are unmetered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct QuotaConfig {
    #[serde(default = "default_quota_limits")]
    pub limits: BTreeMap<Engine, u64>,
}

fn default_quota_limits() -> BTreeMap<Engine, u64> {
    BTreeMap::from([(Engine::Claude, 50), (Engine::Codex, 100)])
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            limits: default_quota_limits(),
        }
    }
}

/// Verification commands run by the diagnostic shortcuts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DiagnosticsConfig {
    #[serde(default = "default_test_command")]
    pub test_command: String,
    #[serde(default = "default_lint_command")]
    pub lint_command: String,
    #[serde(default = "default_syntax_command")]
    pub syntax_command: String,
}

fn default_test_command() -> String {
    "cargo test".to_string()
}

fn default_lint_command() -> String {
    "cargo clippy".to_string()
}

fn default_syntax_command() -> String {
    "cargo check".to_string()
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            test_command: default_test_command(),
            lint_command: default_lint_command(),
            syntax_command: default_syntax_command(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
