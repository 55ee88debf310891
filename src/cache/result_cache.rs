//! Bounded, time-expiring query result cache
//!
//! Entries are kept in insertion order. When the cache is full the oldest
//! inserted entry is evicted, regardless of how recently it was read. Reads do
//! not reorder entries, and overwriting an existing key keeps its position.
//! Expiry is independent of the size bound: stale entries are dropped lazily on
//! `get` and swept eagerly before every `set`.

use crate::cache::key::CacheKey;
use crate::config::QueryCacheConfig;
use crate::engine::ResultSet;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Entry stored in the cache
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Query text as submitted, before normalization
    pub query: String,
    /// Cached query results
    pub results: Arc<ResultSet>,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Latency of the execution that produced these results
    pub execution_time_ms: f64,
    created_at: Instant,
}

impl CacheEntry {
    fn new(query: &str, results: Arc<ResultSet>, execution_time_ms: f64) -> Self {
        Self {
            query: query.to_string(),
            results,
            timestamp: Utc::now().timestamp_millis(),
            execution_time_ms,
            created_at: Instant::now(),
        }
    }

    /// Check if this entry has outlived `max_age`
    pub fn is_expired(&self, max_age: Duration) -> bool {
        self.created_at.elapsed() > max_age
    }

    /// Get the age of this entry
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// Point-in-time view of the cache contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheSnapshot {
    pub size: usize,
    /// Original query text of each entry, oldest first
    pub queries: Vec<String>,
}

/// Thread-safe FIFO result cache keyed by normalized query text
pub struct ResultCache {
    entries: Mutex<IndexMap<CacheKey, CacheEntry>>,
    config: QueryCacheConfig,
}

impl ResultCache {
    /// Create a new result cache with the given configuration
    pub fn new(config: QueryCacheConfig) -> Self {
        Self {
            entries: Mutex::new(IndexMap::with_capacity(config.max_entries)),
            config,
        }
    }

    /// Create a cache with default limits (50 entries, 5 minute max age)
    pub fn with_defaults() -> Self {
        Self::new(QueryCacheConfig::default())
    }

    /// Create a cache with explicit limits
    pub fn with_limits(max_entries: usize, max_age: Duration) -> Self {
        Self::new(QueryCacheConfig {
            max_entries,
            max_age_ms: max_age.as_millis() as u64,
            ..QueryCacheConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &QueryCacheConfig {
        &self.config
    }

    /// Look up the cached result for `query`.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn get(&self, query: &str) -> Option<CacheEntry> {
        if !self.config.enabled {
            return None;
        }

        let key = CacheKey::from_query(query);
        let max_age = self.config.max_age();
        let mut entries = self.entries.lock();

        let expired = match entries.get(&key) {
            None => {
                debug!(query = %query, "Result cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(max_age),
        };

        if expired {
            entries.shift_remove(&key);
            debug!(query = %query, remaining = entries.len(), "Result cache entry expired on read");
            return None;
        }

        debug!(query = %query, "Result cache hit");
        entries.get(&key).cloned()
    }

    /// Store `results` for `query`.
    ///
    /// Sweeps expired entries, evicts the oldest entry when at capacity, then
    /// inserts or overwrites the entry for the normalized key.
    pub fn set(&self, query: &str, results: impl Into<Arc<ResultSet>>, execution_time_ms: f64) {
        if !self.config.enabled || self.config.max_entries == 0 {
            return;
        }

        let key = CacheKey::from_query(query);
        let entry = CacheEntry::new(query, results.into(), execution_time_ms);
        let max_age = self.config.max_age();
        let mut entries = self.entries.lock();

        let before = entries.len();
        entries.retain(|_, existing| !existing.is_expired(max_age));
        let expired = before - entries.len();
        if expired > 0 {
            debug!(expired, "Swept expired result cache entries");
        }

        if entries.len() >= self.config.max_entries {
            if let Some((_, evicted)) = entries.shift_remove_index(0) {
                debug!(evicted_query = %evicted.query, "Evicted oldest result cache entry");
            }
        }

        entries.insert(key, entry);
    }

    /// Remove every entry
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let cleared = entries.len();
        entries.clear();
        debug!(cleared, "Result cache cleared");
    }

    /// Current size and cached query texts, oldest first
    pub fn get_stats(&self) -> CacheSnapshot {
        let entries = self.entries.lock();
        CacheSnapshot {
            size: entries.len(),
            queries: entries.values().map(|entry| entry.query.clone()).collect(),
        }
    }

    /// Expire entries that have exceeded the max age, returning how many were removed
    pub fn expire_stale(&self) -> usize {
        let max_age = self.config.max_age();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(max_age));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("enabled", &self.config.enabled)
            .field("max_entries", &self.config.max_entries)
            .field("max_age_ms", &self.config.max_age_ms)
            .field("current_entries", &self.len())
            .finish()
    }
}
