//! Engines and the resolved engine/model selection.

use serde::{Deserialize, Serialize};

/// An external execution engine hermes can route work to.
///
/// CLI-driven engines (claude, codex, cursor) are invoked as subprocesses;
/// ollama is a local HTTP service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Claude,
    Codex,
    Cursor,
    Ollama,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Cursor => "cursor",
            Self::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Self::Claude),
            "codex" => Ok(Self::Codex),
            "cursor" => Ok(Self::Cursor),
            "ollama" => Ok(Self::Ollama),
            other => Err(format!("unknown engine: {other}")),
        }
    }
}

/// The engine/model pair resolved for a plan.
///
/// Never persisted; recomputed for every escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub engine: Engine,
    /// Engine-specific model alias (e.g. "opus"). `None` lets the engine
    /// pick its own default.
    pub model: Option<String>,
}

impl Selection {
    pub fn new(engine: Engine, model: impl Into<Option<String>>) -> Self {
        Self {
            engine,
            model: model.into(),
        }
    }

    /// Display label for operator-facing messages.
    pub fn describe(&self) -> String {
        format!(
            "{} ({})",
            self.engine,
            self.model.as_deref().unwrap_or("default")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_round_trip() {
        for engine in [Engine::Claude, Engine::Codex, Engine::Cursor, Engine::Ollama] {
            let parsed: Engine = engine.as_str().parse().unwrap();
            assert_eq!(parsed, engine);
        }
        assert!("gpt".parse::<Engine>().is_err());
    }

    #[test]
    fn test_describe_falls_back_to_default() {
        let selection = Selection::new(Engine::Claude, Some("opus".to_string()));
        assert_eq!(selection.describe(), "claude (opus)");

        let selection = Selection::new(Engine::Cursor, None);
        assert_eq!(selection.describe(), "cursor (default)");
    }
}
