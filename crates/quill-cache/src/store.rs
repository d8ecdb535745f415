//! The semantic cache store

use crate::connection::CachePool;
use crate::error::CacheResult;
use crate::schema;
use crate::types::{CacheQueryResult, EmbeddingRecord};
use chrono::Utc;
use quill_core::EmbeddingProvider;
use rusqlite::params;
use std::sync::Arc;
use tracing::{debug, info};
use zerocopy::AsBytes;

/// Marker prefixed to query-time embedding inputs.
///
/// Distinct from the storage marker so embedding models with asymmetric
/// encodings (nomic-embed style) can treat questions and stored documents
/// differently.
pub const QUERY_MARKER: &str = "search_query: ";

/// Marker prefixed to storage-time embedding inputs
pub const DOCUMENT_MARKER: &str = "search_document: ";

/// Vector-similarity cache of (task, question) → answer.
///
/// Records for the same task whose input embeddings lie within the
/// threshold of each other are considered the same question; `store`
/// enforces this with a check-then-insert sequence rather than a
/// uniqueness constraint on the vector.
pub struct SemanticCache {
    pool: CachePool,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SemanticCache {
    /// Create a cache over a pool and an embedding provider
    pub fn new(pool: CachePool, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { pool, embedder }
    }

    /// Provision the schema; must run once before any lookup or store
    pub fn initialize(&self) -> CacheResult<()> {
        schema::initialize(&self.pool)
    }

    /// The configured threshold, for callers that carry no per-request one
    pub fn default_threshold(&self) -> f32 {
        self.pool.config().similarity_threshold
    }

    /// Find cached answers for `input` under `task`.
    ///
    /// Returns up to top-k records whose cosine distance to the query
    /// embedding is `<= threshold` (boundary inclusive), closest first.
    pub async fn lookup(
        &self,
        task: &str,
        input: &str,
        threshold: f32,
    ) -> CacheResult<CacheQueryResult> {
        let embedding = self
            .embedder
            .embed(&format!("{QUERY_MARKER}{input}"))
            .await?;
        let top_k = self.pool.config().top_k;

        let records = self.pool.with_connection(|conn| {
            schema::ensure_initialized(conn)?;

            let neighbors = nearest_neighbors(conn, task, &embedding, top_k)?;
            let mut records = Vec::new();
            for (rowid, distance) in neighbors {
                if distance > threshold {
                    // neighbors arrive in ascending order; the rest are
                    // farther still
                    break;
                }
                let (question, answer): (String, String) = conn.query_row(
                    "SELECT question, answer FROM cache_entries WHERE id = ?1",
                    params![rowid],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )?;
                records.push(EmbeddingRecord {
                    id: rowid,
                    task: task.to_string(),
                    question,
                    answer,
                    distance: Some(distance),
                });
            }
            Ok(records)
        })?;

        debug!(task, hits = records.len(), "cache lookup");
        Ok(CacheQueryResult { records })
    }

    /// Store an answer for `input` under `task`, unless a near-duplicate
    /// already exists.
    ///
    /// Returns `true` when a record was written, `false` when an existing
    /// record within the threshold suppressed the insert.
    pub async fn store(
        &self,
        task: &str,
        input: &str,
        answer: &str,
        threshold: f32,
    ) -> CacheResult<bool> {
        let embedding = self
            .embedder
            .embed(&format!("{DOCUMENT_MARKER}{input}"))
            .await?;

        self.pool.with_connection(|conn| {
            schema::ensure_initialized(conn)?;

            // Check-then-insert; not transactional, matching the upstream
            // behavior for a single-writer desktop session.
            let neighbors = nearest_neighbors(conn, task, &embedding, 1)?;
            if let Some(&(rowid, distance)) = neighbors.first() {
                if distance <= threshold {
                    debug!(task, rowid, distance, "duplicate suppressed");
                    return Ok(false);
                }
            }

            conn.execute(
                "INSERT INTO cache_entries (task, question, answer, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![task, input, answer, Utc::now().to_rfc3339()],
            )?;
            let id = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO cache_vectors (rowid, embedding, task)
                 VALUES (?1, ?2, ?3)",
                params![id, embedding.as_bytes(), task],
            )?;
            info!(task, id, "cached answer");
            Ok(true)
        })
    }
}

/// KNN query against the vector table, filtered to one task.
///
/// Returns (rowid, distance) pairs in ascending distance order.
fn nearest_neighbors(
    conn: &rusqlite::Connection,
    task: &str,
    embedding: &[f32],
    limit: usize,
) -> CacheResult<Vec<(i64, f32)>> {
    let mut stmt = conn.prepare(
        "SELECT rowid, distance FROM cache_vectors
         WHERE embedding MATCH ?1 AND task = ?2
         ORDER BY distance
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(params![embedding.as_bytes(), task, limit as i64], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f32>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
