//! Error types for the semantic cache

use thiserror::Error;

/// Semantic cache error type
#[derive(Error, Debug)]
pub enum CacheError {
    /// The vector table was never provisioned; run `schema::initialize` first
    #[error("Cache not initialized: run the one-time setup before lookup/store")]
    NotInitialized,

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The embedding call failed
    #[error("Embedding error: {0}")]
    Embedding(#[from] quill_core::LlmError),

    /// Underlying rusqlite error
    #[error("SQLite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
