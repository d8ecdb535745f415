//! Embedding endpoint client
//!
//! The local inference server exposes embeddings on a separate endpoint
//! from generation; the semantic cache is its only consumer, which is why
//! embeddings do not appear in the provider capability surface.

use async_trait::async_trait;
use quill_core::{EmbeddingProvider, LlmError, LlmResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Embedding client for the local inference server
pub struct OllamaEmbeddings {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
    timeout: Duration,
}

impl OllamaEmbeddings {
    /// Create an embedding client over a shared HTTP client
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        model: String,
        dimensions: usize,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            base_url,
            model,
            dimensions,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddings {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        debug!(model = %self.model, chars = text.len(), "embedding text");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                operation: "embed",
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(format!("bad embedding response: {}", e)))?;

        if parsed.embedding.len() != self.dimensions {
            return Err(LlmError::Decode(format!(
                "expected {} dimensions, got {}",
                self.dimensions,
                parsed.embedding.len()
            )));
        }
        Ok(parsed.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}
