//! # Quill Cache
//!
//! Semantic answer cache for the quill stack.
//!
//! Answers are keyed by task name and an embedding of the input text.
//! Lookups return previously stored answers whose embeddings lie within a
//! distance threshold of the query; stores suppress near-duplicates under
//! the same threshold, so the cache never accumulates two records for the
//! same task whose inputs are effectively the same question.
//!
//! Storage is SQLite with the sqlite-vec extension; the vector table must
//! be provisioned once via [`schema::initialize`] before any lookup or
//! store is attempted.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod error;
pub mod schema;
pub mod store;
pub mod types;

pub use config::CacheConfig;
pub use connection::CachePool;
pub use error::{CacheError, CacheResult};
pub use store::SemanticCache;
pub use types::{CacheQueryResult, EmbeddingRecord};
