//! Provider capability model
//!
//! Every provider advertises a fixed capability set. Callers must check
//! `supports()` before invoking a capability-specific operation; providers
//! reject unsupported calls with a clearly signaled error rather than
//! silently no-opping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named optional feature of a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Image analysis via the chat endpoint
    Vision,
    /// Text embedding generation
    Embeddings,
    /// Downloading models onto the local server
    ModelPulling,
    /// Removing models from the local server
    ModelDeletion,
    /// Incremental NDJSON response streaming
    Streaming,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Vision => "vision",
            Capability::Embeddings => "embeddings",
            Capability::ModelPulling => "model pulling",
            Capability::ModelDeletion => "model deletion",
            Capability::Streaming => "streaming",
        };
        write!(f, "{}", name)
    }
}

/// Capability set advertised by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    /// Image analysis support
    pub vision: bool,
    /// Embedding generation support
    pub embeddings: bool,
    /// Model pulling support
    pub model_pulling: bool,
    /// Model deletion support
    pub model_deletion: bool,
    /// Streaming response support
    pub streaming: bool,
}

impl ProviderCapabilities {
    /// Whether the given capability is present in this set
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Vision => self.vision,
            Capability::Embeddings => self.embeddings,
            Capability::ModelPulling => self.model_pulling,
            Capability::ModelDeletion => self.model_deletion,
            Capability::Streaming => self.streaming,
        }
    }
}
