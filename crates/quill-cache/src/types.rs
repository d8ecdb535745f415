//! Cache record types

use serde::{Deserialize, Serialize};

/// One cached question/answer record.
///
/// `distance` is populated only by lookups (distance from the query
/// embedding, non-negative); it is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Row id of the record
    pub id: i64,
    /// Owning task name
    pub task: String,
    /// The canonical question text as stored
    pub question: String,
    /// The cached answer
    pub answer: String,
    /// Distance from the query embedding, set at query time
    pub distance: Option<f32>,
}

/// Result of a cache lookup: records ordered by ascending distance,
/// bounded by the configured top-k
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheQueryResult {
    /// Matching records, closest first
    pub records: Vec<EmbeddingRecord>,
}

impl CacheQueryResult {
    /// The closest match, if any
    pub fn best(&self) -> Option<&EmbeddingRecord> {
        self.records.first()
    }

    /// Whether the lookup found nothing within the threshold
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
