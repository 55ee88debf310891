//! Query Cache Configuration Management
//!
//! Configuration for the result cache. Provides environment-specific presets so
//! tests can use tiny, fast-expiring caches while production keeps the standard
//! 50 entry / 5 minute limits.

use super::error::{ConfigResult, ConfigurationError};
use crate::constants::cache::{DEFAULT_MAX_AGE_MS, DEFAULT_MAX_ENTRIES};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Configuration for result cache behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryCacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
    pub max_age_ms: u64,
}

impl Default for QueryCacheConfig {
    /// Default configuration suitable for production
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_age_ms: DEFAULT_MAX_AGE_MS,
        }
    }
}

impl QueryCacheConfig {
    /// Create test-optimized configuration with rapid invalidation
    pub fn for_test() -> Self {
        Self {
            enabled: true,
            max_entries: 10,
            max_age_ms: 1_000, // 1 second for rapid test feedback
        }
    }

    /// Create development-optimized configuration
    pub fn for_development() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_age_ms: 60_000, // reloaded tables show up within a minute
        }
    }

    /// Check if result caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get max age as Duration
    pub fn max_age(&self) -> Duration {
        Duration::from_millis(self.max_age_ms)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.enabled {
            warn!("Query cache is disabled - every query will hit the engine");
            return Ok(());
        }

        if self.max_entries == 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.max_entries",
                "0",
                "must be greater than 0 when the cache is enabled",
            ));
        }

        if self.max_age_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "cache.max_age_ms",
                "0",
                "must be greater than 0 when the cache is enabled",
            ));
        }

        Ok(())
    }
}
