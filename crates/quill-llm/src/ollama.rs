//! Local inference server client (Ollama-compatible API)

use async_trait::async_trait;
use futures::StreamExt;
use quill_core::{
    GenerationConfig, LlmError, LlmResult, NotificationSink, ProviderCapabilities, StreamEvent,
};
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::compose::ComposedPrompt;
use crate::provider::{LlmProvider, ModelInfo};
use crate::stream;

/// Client for a local Ollama-compatible inference server
pub struct OllamaProvider {
    client: reqwest::Client,
    base_url: String,
    keep_alive: String,
    timeout: Duration,
}

impl OllamaProvider {
    /// Create a provider over a shared HTTP client
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        keep_alive: String,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            base_url,
            keep_alive,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn build_generate_request(
        &self,
        prompt: &ComposedPrompt,
        config: &GenerationConfig,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "prompt": prompt.user,
            "model": config.model,
            "stream": true,
            "keep_alive": self.keep_alive,
            "options": {
                "temperature": config.temperature,
                "num_predict": config.max_length,
                "top_p": config.top_p,
                "top_k": config.top_k,
                "repeat_penalty": config.repeat_penalty,
                "num_ctx": config.context_window,
            },
        });
        if let Some(system) = &prompt.system {
            body["system"] = serde_json::json!(system);
        }
        body
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "Ollama"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            vision: false,
            // embeddings come from a separate endpoint used only by the
            // cache, not from this capability surface
            embeddings: false,
            model_pulling: true,
            model_deletion: true,
            streaming: true,
        }
    }

    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        config: &GenerationConfig,
        cancel: CancellationToken,
    ) -> LlmResult<String> {
        let url = format!("{}/generate", self.base_url);
        let body = self.build_generate_request(prompt, config);

        debug!(model = %config.model, "issuing generate request");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                operation: "generate",
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }

        let events = stream::generate_events(response.bytes_stream(), cancel);
        stream::collect_text(events).await
    }

    async fn list_models(&self) -> LlmResult<Vec<ModelInfo>> {
        let url = format!("{}/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                operation: "list models",
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(format!("bad tags response: {}", e)))?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| ModelInfo {
                name: m.name,
                modified_at: m.modified_at,
                size: m.size,
                digest: m.digest,
                owned_by: None,
            })
            .collect())
    }

    async fn pull_model(
        &self,
        model: &str,
        sink: &dyn NotificationSink,
        cancel: CancellationToken,
    ) -> LlmResult<()> {
        let url = format!("{}/pull", self.base_url);
        let body = serde_json::json!({
            "name": model,
            "insecure": false,
            "stream": true,
        });

        info!(model, "pulling model");
        let response = self
            .client
            .post(&url)
            .json(&body)
            // pulls can run far longer than a generate call
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                operation: "pull",
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }

        let mut events = stream::pull_events(response.bytes_stream(), cancel);
        while let Some(event) = events.next().await {
            match event? {
                StreamEvent::Status {
                    status,
                    completed: Some(done),
                    total: Some(total),
                } => sink.notify(&format!("{} ({}/{})", status, done, total)),
                StreamEvent::Status { status, .. } => sink.notify(&status),
                StreamEvent::Fragment(_) => {}
                StreamEvent::Done => break,
            }
        }
        Ok(())
    }

    async fn delete_model(&self, model: &str) -> LlmResult<()> {
        let url = format!("{}/delete", self.base_url);
        let body = serde_json::json!({ "name": model });

        info!(model, "deleting model");
        let response = self
            .client
            .delete(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                operation: "delete",
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }
        Ok(())
    }
}

// Local server response types
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Debug, Deserialize)]
struct TaggedModel {
    name: String,
    #[serde(default)]
    modified_at: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    digest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Capability;

    fn provider() -> OllamaProvider {
        OllamaProvider::new(
            reqwest::Client::new(),
            "http://localhost:11434/api".to_string(),
            "5m".to_string(),
            120,
        )
    }

    #[test]
    fn capability_set_matches_local_server() {
        let caps = provider().capabilities();
        assert!(caps.supports(Capability::Streaming));
        assert!(caps.supports(Capability::ModelPulling));
        assert!(caps.supports(Capability::ModelDeletion));
        assert!(!caps.supports(Capability::Vision));
        assert!(!caps.supports(Capability::Embeddings));
    }

    #[test]
    fn generate_request_maps_every_sampling_field() {
        // exactly-representable floats so the json comparison is exact
        let config = GenerationConfig {
            model: "llama3.2".into(),
            system_prompt: String::new(),
            temperature: 0.5,
            max_length: 512,
            top_p: 0.75,
            top_k: 40,
            repeat_penalty: 1.5,
            context_window: 4096,
        };
        let prompt = ComposedPrompt {
            system: None,
            user: "TEXT...".into(),
        };
        let body = provider().build_generate_request(&prompt, &config);

        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], true);
        assert_eq!(body["keep_alive"], "5m");
        assert_eq!(body["options"]["temperature"], 0.5);
        assert_eq!(body["options"]["num_predict"], 512);
        assert_eq!(body["options"]["top_p"], 0.75);
        assert_eq!(body["options"]["top_k"], 40);
        assert_eq!(body["options"]["repeat_penalty"], 1.5);
        assert_eq!(body["options"]["num_ctx"], 4096);
        assert!(body.get("system").is_none());
    }

    #[test]
    fn system_text_included_only_when_present() {
        let config = GenerationConfig {
            model: "llama3.2".into(),
            system_prompt: "sys".into(),
            temperature: 0.8,
            max_length: 2048,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            context_window: 4096,
        };
        let prompt = ComposedPrompt {
            system: Some("sys".into()),
            user: "body".into(),
        };
        let body = provider().build_generate_request(&prompt, &config);
        assert_eq!(body["system"], "sys");
    }
}
