//! Configuration Loader
//!
//! Environment-aware configuration loading. Handles file discovery,
//! environment detection and merging of the configuration layers.

use super::error::{ConfigResult, ConfigurationError};
use super::DataguardConfig;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const BASE_CONFIG_FILE: &str = "dataguard.toml";

/// Loaded, validated configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: DataguardConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = super::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config = Self::load_and_merge_config(&config_directory, environment)?;
        config.validate()?;

        info!(
            environment = %environment,
            cache_enabled = config.cache.enabled,
            cache_max_entries = config.cache.max_entries,
            retry_enabled = config.retry.enabled,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &DataguardConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Merge defaults, the base file, the environment file and env overrides
    fn load_and_merge_config(
        config_directory: &Path,
        environment: &str,
    ) -> ConfigResult<DataguardConfig> {
        let base_file = config_directory.join(BASE_CONFIG_FILE);
        let environment_file = Self::environment_file(config_directory, environment);

        debug!(
            base = %base_file.display(),
            environment_file = %environment_file.display(),
            "Resolving configuration layers"
        );

        let merged = Config::builder()
            .add_source(Config::try_from(&DataguardConfig::default())?)
            .add_source(File::from(base_file).required(false))
            .add_source(File::from(environment_file).required(false))
            .add_source(
                Environment::with_prefix("DATAGUARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigurationError::environment_error(environment, e))?;

        Ok(merged.try_deserialize()?)
    }

    fn environment_file(config_directory: &Path, environment: &str) -> PathBuf {
        config_directory.join(format!("dataguard-{environment}.toml"))
    }
}
