//! Hierarchical configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::{Config, TaskType};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Model rule table must contain a refactor rule (it is the fallback for unknown task types)")]
    MissingRefactorRule,

    #[error("Invalid timeout for {0}: must be at least 1 second")]
    InvalidTimeout(&'static str),

    #[error("Invalid quota limit for {0}: limits must be positive")]
    InvalidQuotaLimit(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. `~/.hermes/config.yaml` (global)
    /// 3. `.hermes/config.yaml` (project)
    /// 4. Environment variables (`HERMES_*` prefix)
    ///
    /// Reload-on-read: callers load fresh at each decision point rather
    /// than caching a snapshot across tasks.
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global) = Self::global_config_path() {
            figment = figment.merge(Yaml::file(global));
        }

        let config: Config = figment
            .merge(Yaml::file(".hermes/config.yaml"))
            .merge(Env::prefixed("HERMES_").split("__"))
            .extract()
            .context("failed to extract configuration")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file over the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".hermes").join("config.yaml"))
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if !config.models.contains_key(&TaskType::Refactor) {
            return Err(ConfigError::MissingRefactorRule);
        }

        if config.engines.claude.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("claude"));
        }
        if config.engines.codex.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("codex"));
        }
        if config.engines.cursor.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("cursor"));
        }
        if config.engines.ollama.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("ollama"));
        }

        for (engine, limit) in &config.quota.limits {
            if *limit == 0 {
                return Err(ConfigError::InvalidQuotaLimit(engine.to_string()));
            }
        }

        Ok(())
    }

    /// Write the default configuration to `path` (used by `hermes init`).
    pub fn write_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(&Config::default())
            .context("failed to serialize default config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Persist a modified configuration back to the project config file.
    pub fn save(config: &Config, path: impl AsRef<Path>) -> Result<()> {
        Self::validate(config)?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(config).context("failed to serialize config")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
