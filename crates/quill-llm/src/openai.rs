//! Hosted cloud API client (OpenAI-compatible, bearer-token authenticated)

use async_trait::async_trait;
use quill_core::{GenerationConfig, LlmError, LlmResult, ProviderCapabilities};
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::compose::ComposedPrompt;
use crate::provider::{LlmProvider, ModelInfo};
use crate::stream::strip_wrapping_quotes;

/// Client for an OpenAI-compatible hosted API
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Create a provider over a shared HTTP client
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn build_chat_request(
        &self,
        messages: Vec<serde_json::Value>,
        config: &GenerationConfig,
    ) -> serde_json::Value {
        // repeat penalty approximates frequency penalty; there is no
        // presence-penalty analogue, so it stays 0. top_k and the context
        // window have no OpenAI equivalent and are omitted entirely.
        serde_json::json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
            "max_tokens": config.max_length,
            "top_p": config.top_p,
            "frequency_penalty": config.repeat_penalty,
            "presence_penalty": 0,
            "stream": false,
        })
    }

    async fn send_chat(
        &self,
        body: serde_json::Value,
        cancel: &CancellationToken,
    ) -> LlmResult<String> {
        // The cloud call is a single-document parse, not a line loop;
        // cancellation before the call returns the empty accumulation.
        if cancel.is_cancelled() {
            return Ok(String::new());
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %body["model"], "issuing chat completion request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                operation: "chat completion",
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(format!("bad chat response: {}", e)))?;

        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| LlmError::Decode("no choices in response".to_string()))?;

        Ok(strip_wrapping_quotes(content.trim()).to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            vision: true,
            embeddings: false,
            model_pulling: false,
            model_deletion: false,
            // declared; the chat call itself runs in non-streaming mode
            streaming: true,
        }
    }

    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        config: &GenerationConfig,
        cancel: CancellationToken,
    ) -> LlmResult<String> {
        let mut messages = Vec::new();
        if let Some(system) = &prompt.system {
            messages.push(serde_json::json!({ "role": "system", "content": system }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": prompt.user }));

        let body = self.build_chat_request(messages, config);
        self.send_chat(body, &cancel).await
    }

    async fn list_models(&self) -> LlmResult<Vec<ModelInfo>> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
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

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(format!("bad models response: {}", e)))?;

        Ok(models
            .data
            .into_iter()
            .map(|m| ModelInfo {
                name: m.id,
                modified_at: None,
                size: None,
                digest: None,
                owned_by: m.owned_by,
            })
            .collect())
    }

    async fn analyze_image(
        &self,
        image_base64: &str,
        instruction: &str,
        config: &GenerationConfig,
    ) -> LlmResult<String> {
        let mut messages = Vec::new();
        if !config.system_prompt.trim().is_empty() {
            messages.push(serde_json::json!({
                "role": "system",
                "content": config.system_prompt.trim(),
            }));
        }
        messages.push(serde_json::json!({
            "role": "user",
            "content": [
                { "type": "text", "text": instruction },
                {
                    "type": "image_url",
                    "image_url": { "url": format!("data:image/png;base64,{image_base64}") },
                },
            ],
        }));

        let body = self.build_chat_request(messages, config);
        self.send_chat(body, &CancellationToken::new()).await
    }
}

// Cloud API response types
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<CloudModel>,
}

#[derive(Debug, Deserialize)]
struct CloudModel {
    id: String,
    #[serde(default)]
    owned_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::Capability;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(
            reqwest::Client::new(),
            "sk-test".to_string(),
            "https://api.openai.com/v1".to_string(),
            60,
        )
    }

    #[test]
    fn capability_set_matches_hosted_api() {
        let caps = provider().capabilities();
        assert!(caps.supports(Capability::Vision));
        assert!(caps.supports(Capability::Streaming));
        assert!(!caps.supports(Capability::ModelPulling));
        assert!(!caps.supports(Capability::ModelDeletion));
    }

    #[test]
    fn chat_request_maps_repeat_penalty_to_frequency_penalty() {
        let config = GenerationConfig {
            model: "gpt-4o-mini".into(),
            system_prompt: String::new(),
            temperature: 0.5,
            max_length: 256,
            top_p: 1.0,
            top_k: 40,
            repeat_penalty: 0.25,
            context_window: 4096,
        };
        let body = provider().build_chat_request(
            vec![serde_json::json!({"role": "user", "content": "hi"})],
            &config,
        );

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["frequency_penalty"], 0.25);
        assert_eq!(body["presence_penalty"], 0);
        assert_eq!(body["stream"], false);
        // no per-request fields for these on the hosted API
        assert!(body.get("top_k").is_none());
        assert!(body.get("num_ctx").is_none());
    }
}
