//! # Quill Core
//!
//! Shared types and traits for the quill AI orchestration stack.
//!
//! This crate is the foundation layer: it defines the provider capability
//! model, the task/generation configuration types, the streaming event
//! vocabulary, and the error taxonomy shared by every other quill crate.
//! It deliberately has no HTTP or storage dependencies so that the provider
//! and cache crates can depend on it without cycles.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod config;
pub mod error;
pub mod provider;
pub mod stream;
pub mod traits;

pub use capability::{Capability, ProviderCapabilities};
pub use config::{GenerationConfig, TaskConfig};
pub use error::{LlmError, LlmResult};
pub use provider::ProviderKind;
pub use stream::StreamEvent;
pub use traits::{EmbeddingProvider, NoopSink, NotificationSink};
