//! Settings snapshot

use quill_core::{LlmError, LlmResult, ProviderKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cache-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// SQLite database path; `:memory:` for an in-memory cache
    #[serde(default = "default_cache_path")]
    pub db_path: String,
    /// Embedding vector dimensionality (must match the embedding model)
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Default similarity threshold for lookups and duplicate suppression
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f32,
}

fn default_cache_path() -> String {
    "quill-cache.db".to_string()
}

fn default_dimensions() -> usize {
    768 // nomic-embed-text
}

fn default_threshold() -> f32 {
    0.25
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            db_path: default_cache_path(),
            dimensions: default_dimensions(),
            similarity_threshold: default_threshold(),
        }
    }
}

/// One snapshot of runtime settings.
///
/// Read fresh by the caller at the start of each request and handed into
/// the pipeline; nothing in quill caches it across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the local inference server API
    #[serde(default = "default_ollama_url")]
    pub ollama_base_url: String,
    /// Base URL of the cloud provider API
    #[serde(default = "default_openai_url")]
    pub openai_base_url: String,
    /// Bearer token for the cloud provider; empty means unconfigured
    #[serde(default)]
    pub openai_api_key: String,
    /// Model used when neither caller nor task names one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Ollama keep_alive value passed on generate requests
    #[serde(default = "default_keep_alive")]
    pub keep_alive: String,
    /// Model used for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Semantic cache settings
    #[serde(default)]
    pub cache: CacheSettings,
}

fn default_ollama_url() -> String {
    ProviderKind::Ollama.default_endpoint().to_string()
}

fn default_openai_url() -> String {
    ProviderKind::OpenAI.default_endpoint().to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_keep_alive() -> String {
    "5m".to_string()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_base_url: default_ollama_url(),
            openai_base_url: default_openai_url(),
            openai_api_key: String::new(),
            default_model: default_model(),
            keep_alive: default_keep_alive(),
            embedding_model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
            cache: CacheSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a TOML document
    pub fn from_toml_str(raw: &str) -> LlmResult<Self> {
        let settings: Settings = toml::from_str(raw)
            .map_err(|e| LlmError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the snapshot is usable for the given provider.
    ///
    /// Raised synchronously before any I/O; a missing API key for the cloud
    /// provider is a configuration error, not a transport one.
    pub fn validate_for(&self, kind: ProviderKind) -> LlmResult<()> {
        match kind {
            ProviderKind::Ollama => {
                if self.ollama_base_url.trim().is_empty() {
                    return Err(LlmError::Config(
                        "Ollama base URL is not configured".to_string(),
                    ));
                }
            }
            ProviderKind::OpenAI => {
                if self.openai_api_key.trim().is_empty() {
                    return Err(LlmError::Config(
                        "OpenAI API key is not configured".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Structural validation applied after loading
    pub fn validate(&self) -> LlmResult<()> {
        if self.default_model.trim().is_empty() {
            return Err(LlmError::Config("default_model must not be empty".into()));
        }
        if self.cache.dimensions == 0 {
            return Err(LlmError::Config(
                "cache.dimensions must be greater than zero".into(),
            ));
        }
        if self.cache.similarity_threshold < 0.0 {
            return Err(LlmError::Config(
                "cache.similarity_threshold must be non-negative".into(),
            ));
        }
        debug!(model = %self.default_model, "Settings validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.ollama_base_url, "http://localhost:11434/api");
        assert_eq!(settings.cache.dimensions, 768);
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            default_model = "mistral"
            openai_api_key = "sk-test"

            [cache]
            db_path = ":memory:"
            similarity_threshold = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(settings.default_model, "mistral");
        assert_eq!(settings.cache.db_path, ":memory:");
        assert_eq!(settings.cache.similarity_threshold, 0.5);
        // untouched fields keep their defaults
        assert_eq!(settings.keep_alive, "5m");
    }

    #[test]
    fn openai_requires_api_key() {
        let settings = Settings::default();
        assert!(settings.validate_for(ProviderKind::Ollama).is_ok());
        assert!(matches!(
            settings.validate_for(ProviderKind::OpenAI),
            Err(LlmError::Config(_))
        ));
    }

    #[test]
    fn zero_dimensions_rejected() {
        let mut settings = Settings::default();
        settings.cache.dimensions = 0;
        assert!(settings.validate().is_err());
    }
}
