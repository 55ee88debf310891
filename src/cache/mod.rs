//! # Query Result Cache
//!
//! In-memory, session-scoped cache of query results.
//!
//! ## Architecture
//!
//! ```text
//! query text ──▶ CacheKey (lowercase + trim + base64) ──▶ ResultCache (insertion-ordered map)
//! ```
//!
//! ## Eviction
//!
//! - **Capacity**: FIFO by insertion once `max_entries` is reached. Not an LRU.
//! - **Age**: entries older than `max_age_ms` are never returned.
//!
//! Both policies apply independently; an entry leaves the cache as soon as
//! either one selects it.

pub mod key;
pub mod result_cache;

pub use key::{encode, CacheKey};
pub use result_cache::{CacheEntry, CacheSnapshot, ResultCache};
