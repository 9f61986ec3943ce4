//! Ollama engine: a local HTTP model server, not a subprocess.
//!
//! The client wraps the two endpoints the orchestrator needs (`/api/tags`
//! and `/api/generate`). The adapter resolves a usable installed model
//! before generating: the requested model if installed, else the first
//! known-good preferred model, else whatever is installed first. The model
//! selector never routes code-modifying tasks here.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::domain::error::EngineError;
use crate::domain::models::{Engine, OllamaConfig};
use crate::domain::ports::{EngineAdapter, InvokeOptions};

/// Minimal client for the ollama local API.
pub struct OllamaClient {
    http: reqwest::Client,
    config: OllamaConfig,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { http, config }
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Names of the locally installed models.
    pub async fn list_model_names(&self) -> Result<Vec<String>, EngineError> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::Http(e.to_string()))?;

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Generate a completion. `format` constrains the reply to a JSON
    /// schema when the caller needs structured output.
    pub async fn generate(
        &self,
        prompt: &str,
        model: &str,
        format: Option<&serde_json::Value>,
    ) -> Result<String, EngineError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let mut body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": { "num_ctx": self.config.num_ctx },
        });
        if let Some(schema) = format {
            body["format"] = schema.clone();
        }

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?
            .error_for_status()
            .map_err(|e| EngineError::Http(e.to_string()))?;

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Http(e.to_string()))?;
        Ok(generated.response)
    }

    /// Strict 5s connectivity probe; `/api/tags` is the lightweight check.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        matches!(
            self.http
                .get(&url)
                .timeout(Duration::from_secs(5))
                .send()
                .await,
            Ok(response) if response.status().is_success()
        )
    }

    /// Pick a usable installed model: the requested one if installed, else
    /// the first preferred model that is, else the first installed, else
    /// the last-resort preferred name.
    pub fn resolve_model(&self, requested: Option<&str>, available: &[String]) -> String {
        if let Some(model) = requested {
            if available.iter().any(|name| name == model) {
                return model.to_string();
            }
        }
        for preferred in &self.config.preferred_models {
            if available.iter().any(|name| name == preferred) {
                return preferred.clone();
            }
        }
        available
            .first()
            .cloned()
            .or_else(|| self.config.preferred_models.last().cloned())
            .unwrap_or_else(|| "qwen3:8b".to_string())
    }
}

/// Engine adapter over the ollama client.
pub struct OllamaAdapter {
    client: OllamaClient,
}

impl OllamaAdapter {
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            client: OllamaClient::new(config),
        }
    }
}

#[async_trait]
impl EngineAdapter for OllamaAdapter {
    fn engine(&self) -> Engine {
        Engine::Ollama
    }

    async fn invoke(
        &self,
        prompt: &str,
        model: Option<&str>,
        _options: &InvokeOptions,
    ) -> Result<String, EngineError> {
        let available = self.client.list_model_names().await?;
        let model = self.client.resolve_model(model, &available);
        self.client.generate(prompt, &model, None).await
    }
}
