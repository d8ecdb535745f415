//! Provider registry
//!
//! Holds one instance per provider kind over a shared HTTP client and
//! exposes selection by kind or by user-supplied name. Registries are
//! cheap to build and are rebuilt from a fresh settings snapshot for each
//! request, so settings edits take effect on the next call.

use quill_core::{LlmError, LlmResult, ProviderKind};
use quill_config::Settings;
use std::collections::HashMap;
use std::sync::Arc;

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;
use crate::provider::LlmProvider;

/// Registry of provider implementations
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    /// Build both providers from a settings snapshot.
    ///
    /// The cloud provider is registered even when its API key is absent;
    /// the pipeline validates settings for the selected kind before any
    /// request is issued.
    pub fn from_settings(client: &reqwest::Client, settings: &Settings) -> Self {
        let mut providers: HashMap<ProviderKind, Arc<dyn LlmProvider>> = HashMap::new();
        providers.insert(
            ProviderKind::Ollama,
            Arc::new(OllamaProvider::new(
                client.clone(),
                settings.ollama_base_url.clone(),
                settings.keep_alive.clone(),
                settings.timeout_secs,
            )),
        );
        providers.insert(
            ProviderKind::OpenAI,
            Arc::new(OpenAiProvider::new(
                client.clone(),
                settings.openai_api_key.clone(),
                settings.openai_base_url.clone(),
                settings.timeout_secs,
            )),
        );
        Self { providers }
    }

    /// Select a provider by kind
    pub fn select(&self, kind: ProviderKind) -> LlmResult<Arc<dyn LlmProvider>> {
        self.providers
            .get(&kind)
            .cloned()
            .ok_or_else(|| LlmError::UnknownProvider(kind.to_string()))
    }

    /// Select a provider by user-supplied name
    pub fn select_by_name(&self, name: &str) -> LlmResult<Arc<dyn LlmProvider>> {
        self.select(ProviderKind::parse(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_kinds_are_registered() {
        let settings = Settings::default();
        let registry = ProviderRegistry::from_settings(&reqwest::Client::new(), &settings);

        assert_eq!(registry.select(ProviderKind::Ollama).unwrap().name(), "Ollama");
        assert_eq!(registry.select(ProviderKind::OpenAI).unwrap().name(), "OpenAI");
    }

    #[test]
    fn unknown_name_is_a_distinct_error() {
        let settings = Settings::default();
        let registry = ProviderRegistry::from_settings(&reqwest::Client::new(), &settings);

        assert!(matches!(
            registry.select_by_name("copilot"),
            Err(LlmError::UnknownProvider(_))
        ));
    }
}
