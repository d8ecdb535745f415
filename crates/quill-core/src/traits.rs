//! Collaborator traits shared across the quill crates

use async_trait::async_trait;

use crate::error::LlmResult;

/// Receiver for progress and status strings during long-running operations.
///
/// The UI layer implements this; the core only pushes short human-readable
/// lines (pull progress, busy state) through it.
pub trait NotificationSink: Send + Sync {
    /// Deliver one status line
    fn notify(&self, status: &str);
}

/// A sink that discards everything; for tests and headless callers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn notify(&self, _status: &str) {}
}

/// Produces a fixed-length embedding vector for a text.
///
/// Implemented over the local inference server's embedding endpoint; the
/// semantic cache is its only consumer. The provider embeds exactly the
/// text it is given; asymmetric query/document markers are the caller's
/// concern.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;

    /// Dimensionality of vectors produced by this provider
    fn dimensions(&self) -> usize;
}
