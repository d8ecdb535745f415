//! The uniform capability surface all providers implement

use async_trait::async_trait;
use quill_core::{
    Capability, GenerationConfig, LlmError, LlmResult, NotificationSink, ProviderCapabilities,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::compose::ComposedPrompt;

/// A model available from a provider.
///
/// Local servers report modification time, size, and digest; hosted APIs
/// report ownership. Absent fields stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model name or id
    pub name: String,
    /// Last-modified timestamp as reported by a local server
    pub modified_at: Option<String>,
    /// On-disk size in bytes, when reported
    pub size: Option<u64>,
    /// Content digest, when reported
    pub digest: Option<String>,
    /// Owning organization, when reported by a hosted API
    pub owned_by: Option<String>,
}

/// A text-generation provider.
///
/// Providers are polymorphic over one capability surface; callers check
/// [`ProviderCapabilities::supports`] before invoking a capability-specific
/// operation. The capability-gated methods default to a clearly signaled
/// [`LlmError::UnsupportedCapability`] failure rather than a silent no-op.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// The capability set this provider advertises
    fn capabilities(&self) -> ProviderCapabilities;

    /// Send a composed prompt and return the final answer text.
    ///
    /// Cancellation during a streaming decode is a successful early return
    /// carrying whatever text accumulated.
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        config: &GenerationConfig,
        cancel: CancellationToken,
    ) -> LlmResult<String>;

    /// List the models this provider can serve
    async fn list_models(&self) -> LlmResult<Vec<ModelInfo>>;

    /// Analyze an image (base64-encoded) under the given instruction
    async fn analyze_image(
        &self,
        _image_base64: &str,
        _instruction: &str,
        _config: &GenerationConfig,
    ) -> LlmResult<String> {
        Err(LlmError::unsupported(self.name(), Capability::Vision))
    }

    /// Pull a model onto the local server, forwarding progress to the sink
    async fn pull_model(
        &self,
        _model: &str,
        _sink: &dyn NotificationSink,
        _cancel: CancellationToken,
    ) -> LlmResult<()> {
        Err(LlmError::unsupported(self.name(), Capability::ModelPulling))
    }

    /// Delete a model from the local server
    async fn delete_model(&self, _model: &str) -> LlmResult<()> {
        Err(LlmError::unsupported(self.name(), Capability::ModelDeletion))
    }
}

/// Fail fast when a provider lacks a capability the caller is about to use
pub fn ensure_capability(provider: &dyn LlmProvider, capability: Capability) -> LlmResult<()> {
    if provider.capabilities().supports(capability) {
        Ok(())
    } else {
        Err(LlmError::unsupported(provider.name(), capability))
    }
}
