//! Generation-config resolution
//!
//! Merges a per-task configuration record with provider defaults and static
//! fallback constants into one effective configuration. Resolution is total
//! and side-effect-free: every field has a value afterwards, and the task
//! record is never mutated.

use quill_core::{GenerationConfig, ProviderKind, TaskConfig};

use crate::settings::Settings;

/// Static fallback constants, the last layer of resolution
pub mod defaults {
    /// Fallback sampling temperature
    pub const TEMPERATURE: f32 = 0.8;
    /// Fallback maximum generated length (tokens)
    pub const MAX_LENGTH: u32 = 2048;
    /// Fallback nucleus sampling threshold
    pub const TOP_P: f32 = 0.9;
    /// Fallback top-k sampling
    pub const TOP_K: u32 = 40;
    /// Fallback repeat penalty
    pub const REPEAT_PENALTY: f32 = 1.1;
    /// Fallback context window (tokens)
    pub const CONTEXT_WINDOW: u32 = 4096;
}

/// Per-provider default values, the middle layer of resolution.
///
/// `None` means the provider has no opinion for that field and the static
/// fallback applies. OpenAI's frequency penalty approximates repeat
/// penalty but defaults to no penalty at all, and it has no top-k or
/// context-window knobs.
struct ProviderDefaults {
    temperature: Option<f32>,
    max_length: Option<u32>,
    top_p: Option<f32>,
    top_k: Option<u32>,
    repeat_penalty: Option<f32>,
    context_window: Option<u32>,
}

fn provider_defaults(kind: ProviderKind) -> ProviderDefaults {
    match kind {
        ProviderKind::Ollama => ProviderDefaults {
            temperature: Some(0.8),
            max_length: Some(2048),
            top_p: Some(0.9),
            top_k: Some(40),
            repeat_penalty: Some(1.1),
            context_window: Some(4096),
        },
        ProviderKind::OpenAI => ProviderDefaults {
            temperature: Some(1.0),
            max_length: Some(2048),
            top_p: Some(1.0),
            top_k: None,
            repeat_penalty: Some(0.0),
            context_window: None,
        },
    }
}

/// Resolve the effective generation configuration.
///
/// Per-field order: task override (when the task is present and the field
/// is set) → provider default → static fallback. The model falls back to
/// the settings snapshot's default model, and the system prompt to the
/// task's (empty when no task is given).
pub fn resolve(
    task: Option<&TaskConfig>,
    kind: ProviderKind,
    settings: &Settings,
) -> GenerationConfig {
    let provider = provider_defaults(kind);

    let model = task
        .and_then(|t| t.model.clone())
        .unwrap_or_else(|| settings.default_model.clone());
    let system_prompt = task.map(|t| t.system_prompt.clone()).unwrap_or_default();

    GenerationConfig {
        model,
        system_prompt,
        temperature: task
            .and_then(|t| t.temperature)
            .or(provider.temperature)
            .unwrap_or(defaults::TEMPERATURE),
        max_length: task
            .and_then(|t| t.max_length)
            .or(provider.max_length)
            .unwrap_or(defaults::MAX_LENGTH),
        top_p: task
            .and_then(|t| t.top_p)
            .or(provider.top_p)
            .unwrap_or(defaults::TOP_P),
        top_k: task
            .and_then(|t| t.top_k)
            .or(provider.top_k)
            .unwrap_or(defaults::TOP_K),
        repeat_penalty: task
            .and_then(|t| t.repeat_penalty)
            .or(provider.repeat_penalty)
            .unwrap_or(defaults::REPEAT_PENALTY),
        context_window: task
            .and_then(|t| t.context_window)
            .or(provider.context_window)
            .unwrap_or(defaults::CONTEXT_WINDOW),
    }
}
