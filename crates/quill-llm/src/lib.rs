//! # Quill LLM
//!
//! Provider clients and request orchestration for the quill stack.
//!
//! ## Modules
//!
//! - [`provider`]: the uniform capability surface all providers implement
//! - [`registry`]: capability-based provider selection
//! - [`compose`]: prompt composition from (input, task, config)
//! - [`stream`]: NDJSON stream decoding under cancellation
//! - [`ollama`]: local inference server client
//! - [`openai`]: hosted cloud API client
//! - [`embeddings`]: embedding endpoint client for the semantic cache
//! - [`pipeline`]: end-to-end request flow and session cancellation
//!
//! ## Example
//!
//! ```rust,no_run
//! use quill_config::Settings;
//! use quill_core::ProviderKind;
//! use quill_llm::pipeline::{Pipeline, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::default();
//!     let pipeline = Pipeline::new();
//!     let session = Session::new();
//!
//!     let answer = pipeline
//!         .run(
//!             "The quick brown fox",
//!             "Summarize the text",
//!             None,
//!             ProviderKind::Ollama,
//!             &settings,
//!             session.token(),
//!         )
//!         .await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compose;
pub mod embeddings;
pub mod ollama;
pub mod openai;
pub mod pipeline;
pub mod provider;
pub mod registry;
pub mod stream;

pub use compose::{compose, ComposedPrompt};
pub use embeddings::OllamaEmbeddings;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use pipeline::{Pipeline, Session};
pub use provider::{ensure_capability, LlmProvider, ModelInfo};
pub use registry::ProviderRegistry;
