//! # Quill Configuration
//!
//! Settings loading and generation-config resolution for the quill stack.
//!
//! Settings are an explicit snapshot passed into each public operation
//! rather than process-wide mutable state: callers reload the snapshot
//! between requests, so edits to stored settings take effect on the next
//! call without hidden globals and without a restart.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod resolver;
pub mod settings;

pub use resolver::{defaults, resolve};
pub use settings::{CacheSettings, Settings};
