//! # DataGuard Configuration System
//!
//! Layered configuration for the cache, retry, orchestration, chat store and
//! logging concerns.
//!
//! ## Architecture
//!
//! - **Built-in defaults**: every section has a production-safe `Default`
//! - **File layers**: `config/dataguard.toml`, then `config/dataguard-<env>.toml`
//! - **Environment overrides**: `DATAGUARD_<SECTION>__<FIELD>` variables win last
//! - **Explicit validation**: invalid limits are rejected at load time
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dataguard_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//!
//! let max_entries = manager.config().cache.max_entries;
//! let retries = manager.config().retry.max_retries;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod query_cache_config;

use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;
pub use query_cache_config::QueryCacheConfig;

/// Root configuration structure mirroring `config/dataguard.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataguardConfig {
    /// Result cache limits
    pub cache: QueryCacheConfig,

    /// Retry behavior around engine execution
    pub retry: RetryConfig,

    /// Query orchestration settings
    pub orchestration: OrchestrationConfig,

    /// Chat transcript persistence
    pub chat: ChatConfig,

    /// Structured logging settings
    pub logging: LoggingConfig,
}

/// Retry and backoff configuration for engine calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Wrap engine execution in the retry helper
    pub enabled: bool,

    /// Total attempts before the last failure is surfaced
    pub max_retries: u32,

    /// Delay before the first retry; doubles on each subsequent retry
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: constants::retry::DEFAULT_MAX_RETRIES,
            initial_delay_ms: constants::retry::DEFAULT_INITIAL_DELAY_MS,
        }
    }
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Share one engine execution between concurrent runs of the same query
    pub coalesce_in_flight: bool,

    /// Number of submitted queries kept in history
    pub history_limit: usize,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            coalesce_in_flight: false,
            history_limit: constants::history::DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Directory holding one JSON transcript per chat
    pub directory: PathBuf,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(constants::chat::DEFAULT_CHAT_DIRECTORY),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; falls back to `RUST_LOG`, then the environment default
    pub level: Option<String>,

    /// Write JSON log files into this directory when set
    pub directory: Option<PathBuf>,

    /// Emit console output as JSON instead of human-readable lines
    pub json: bool,
}

impl DataguardConfig {
    /// Configuration tuned for tests: small cache, fast retries
    pub fn for_test() -> Self {
        Self {
            cache: QueryCacheConfig::for_test(),
            retry: RetryConfig {
                enabled: false,
                max_retries: constants::retry::DEFAULT_MAX_RETRIES,
                initial_delay_ms: 1,
            },
            ..Self::default()
        }
    }

    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.cache.validate()?;

        if self.retry.max_retries == 0 {
            return Err(ConfigurationError::invalid_value(
                "retry.max_retries",
                "0",
                "at least one attempt is required",
            ));
        }

        if self.orchestration.history_limit == 0 {
            return Err(ConfigurationError::invalid_value(
                "orchestration.history_limit",
                "0",
                "must be greater than 0",
            ));
        }

        if self.chat.directory.as_os_str().is_empty() {
            return Err(ConfigurationError::validation_error(
                "chat.directory must not be empty",
            ));
        }

        Ok(())
    }
}

/// Detect the runtime environment from the usual environment variables
pub fn detect_environment() -> String {
    constants::system::ENVIRONMENT_VARIABLES
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .unwrap_or_else(|| constants::system::DEFAULT_ENVIRONMENT.to_string())
        .to_lowercase()
}
