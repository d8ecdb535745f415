//! Task and generation configuration types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored per-task configuration record.
///
/// Loaded from the task-preset store once per request and treated as
/// immutable from then on; saving a task later produces a new snapshot for
/// the next request, never a mutation of one already in flight. Every
/// sampling field is optional; unset fields fall through to provider
/// defaults during resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Unique task name
    pub name: String,
    /// System/instruction prompt, empty string means none
    #[serde(default)]
    pub system_prompt: String,
    /// Target model name override
    #[serde(default)]
    pub model: Option<String>,
    /// Sampling temperature override
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Maximum generated length override (tokens)
    #[serde(default)]
    pub max_length: Option<u32>,
    /// Nucleus sampling override
    #[serde(default)]
    pub top_p: Option<f32>,
    /// Top-k sampling override
    #[serde(default)]
    pub top_k: Option<u32>,
    /// Repeat penalty override
    #[serde(default)]
    pub repeat_penalty: Option<f32>,
    /// Context window override (tokens)
    #[serde(default)]
    pub context_window: Option<u32>,
    /// Whether the task is active
    #[serde(default = "default_active")]
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl TaskConfig {
    /// Create a task with only a name; all sampling fields unset
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            system_prompt: String::new(),
            model: None,
            temperature: None,
            max_length: None,
            top_p: None,
            top_k: None,
            repeat_penalty: None,
            context_window: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fully-resolved generation parameters.
///
/// Produced by the config resolver; every field is concrete. Request
/// composition never sees an unresolved value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model to generate with
    pub model: String,
    /// System/instruction prompt, empty string means none
    pub system_prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum generated length (tokens)
    pub max_length: u32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Top-k sampling
    pub top_k: u32,
    /// Repeat penalty
    pub repeat_penalty: f32,
    /// Context window (tokens)
    pub context_window: u32,
}
