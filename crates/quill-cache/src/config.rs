//! Cache configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the semantic cache store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Database file path
    pub path: PathBuf,
    /// Embedding vector dimensionality; must match the embedding model
    pub dimensions: usize,
    /// Default similarity threshold (cosine distance, boundary inclusive)
    pub similarity_threshold: f32,
    /// Maximum number of records a lookup returns
    pub top_k: usize,
}

impl CacheConfig {
    /// Configuration for a database at the given path
    pub fn new(path: impl Into<PathBuf>, dimensions: usize) -> Self {
        Self {
            path: path.into(),
            dimensions,
            ..Default::default()
        }
    }

    /// In-memory configuration for tests
    pub fn memory(dimensions: usize) -> Self {
        Self::new(":memory:", dimensions)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("quill-cache.db"),
            dimensions: 768,
            similarity_threshold: 0.25,
            top_k: 10,
        }
    }
}
