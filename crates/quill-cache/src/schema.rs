//! Cache schema provisioning
//!
//! Provisioning is a deliberate one-time setup step, separate from opening
//! the database. Lookup and store refuse to run against an unprovisioned
//! database with [`CacheError::NotInitialized`]; that situation is a
//! configuration error, not a transient one.

use crate::connection::CachePool;
use crate::error::{CacheError, CacheResult};
use rusqlite::Connection;
use tracing::info;

/// Provision the cache tables and vector index.
///
/// Idempotent: re-running against an already-provisioned database is a
/// no-op. The vector column dimensionality comes from the pool's
/// configuration and must match the embedding model in use.
pub fn initialize(pool: &CachePool) -> CacheResult<()> {
    let dimensions = pool.config().dimensions;
    pool.with_connection(|conn| {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cache_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task TEXT NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_cache_entries_task
                ON cache_entries(task);",
        )?;
        conn.execute_batch(&format!(
            "CREATE VIRTUAL TABLE IF NOT EXISTS cache_vectors USING vec0(
                embedding float[{dimensions}] distance_metric=cosine,
                task text
            );"
        ))?;
        info!(dimensions, "cache schema provisioned");
        Ok(())
    })
}

/// Fail unless the schema has been provisioned on this database
pub fn ensure_initialized(conn: &Connection) -> CacheResult<()> {
    let present: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type IN ('table', 'view') AND name = 'cache_vectors'",
            [],
            |row| row.get(0),
        )
        .map_err(CacheError::Rusqlite)?;
    if present == 0 {
        return Err(CacheError::NotInitialized);
    }
    Ok(())
}
