//! SQLite connection management with the sqlite-vec extension
//!
//! Uses a simple Arc<Mutex<Connection>> instead of a pooling crate: the
//! cache serves one desktop session, and SQLite in WAL mode handles the
//! read concurrency that leaves.

use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use parking_lot::Mutex;
use rusqlite::ffi::sqlite3_auto_extension;
use rusqlite::Connection;
use sqlite_vec::sqlite3_vec_init;
use std::sync::Arc;
use tracing::{debug, info};

/// Thread-safe SQLite connection wrapper with sqlite-vec loaded
#[derive(Clone)]
pub struct CachePool {
    conn: Arc<Mutex<Connection>>,
    config: CacheConfig,
}

impl CachePool {
    /// Open (or create) the cache database described by the configuration
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        info!(path = ?config.path, "opening cache database");

        // Register sqlite-vec before the connection opens so vec0 virtual
        // tables are available on it.
        unsafe {
            sqlite3_auto_extension(Some(std::mem::transmute(sqlite3_vec_init as *const ())));
        }

        let conn = if config.path.to_str() == Some(":memory:") {
            Connection::open_in_memory()?
        } else {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        CacheError::Connection(format!("Failed to create directory: {}", e))
                    })?;
                }
            }
            Connection::open(&config.path)?
        };

        let pool = Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        };
        pool.configure_pragmas()?;
        Ok(pool)
    }

    /// Create an in-memory pool for testing
    pub fn memory(dimensions: usize) -> CacheResult<Self> {
        Self::new(CacheConfig::memory(dimensions))
    }

    /// The configuration this pool was opened with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Execute a closure with the connection.
    ///
    /// Acquisition is scoped per operation; the lock is released on every
    /// exit path, success or failure.
    pub fn with_connection<F, T>(&self, f: F) -> CacheResult<T>
    where
        F: FnOnce(&Connection) -> CacheResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    fn configure_pragmas(&self) -> CacheResult<()> {
        self.with_connection(|conn| {
            debug!("configuring cache pragmas");
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
            conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_pool_answers_queries() {
        let pool = CachePool::memory(4).expect("pool");
        pool.with_connection(|conn| {
            let two: i64 = conn.query_row("SELECT 1 + 1", [], |row| row.get(0))?;
            assert_eq!(two, 2);
            Ok(())
        })
        .expect("query");
    }

    #[test]
    fn vec_extension_is_loaded() {
        let pool = CachePool::memory(4).expect("pool");
        pool.with_connection(|conn| {
            let version: String = conn.query_row("SELECT vec_version()", [], |row| row.get(0))?;
            assert!(version.starts_with('v'));
            Ok(())
        })
        .expect("vec_version");
    }

    #[test]
    fn file_pool_enables_wal() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CacheConfig::new(dir.path().join("cache.db"), 4);
        let pool = CachePool::new(config).expect("pool");

        pool.with_connection(|conn| {
            let mode: String = conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0))?;
            assert_eq!(mode.to_lowercase(), "wal");
            Ok(())
        })
        .expect("pragma");
    }
}
