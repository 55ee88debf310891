//! # Structured Logging Module
//!
//! Environment-aware structured logging. Console output is always on; a JSON
//! file layer is added when a log directory is configured.

use crate::config::{detect_environment, LoggingConfig};
use chrono::Utc;
use std::fs;
use std::process;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();
static FILE_WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize structured logging with environment defaults
pub fn init_structured_logging() {
    init_structured_logging_with(&LoggingConfig::default());
}

/// Initialize structured logging from the `logging` configuration section.
///
/// Only the first call has any effect. An already-installed global subscriber
/// is left in place.
pub fn init_structured_logging_with(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = detect_environment();
        let filter = resolve_filter(config, &environment);
        let pid = process::id();

        let console_layer = if config.json {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(EnvFilter::new(&filter))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(EnvFilter::new(&filter))
                .boxed()
        };

        let mut log_file = None;
        let mut directory_error = None;
        let file_layer = match &config.directory {
            Some(log_dir) => match fs::create_dir_all(log_dir) {
                Ok(()) => {
                    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
                    let file_name = format!("{environment}.{pid}.{timestamp}.log");
                    log_file = Some(log_dir.join(&file_name));

                    let appender = tracing_appender::rolling::never(log_dir, file_name);
                    let (file_writer, guard) = tracing_appender::non_blocking(appender);
                    let _ = FILE_WRITER_GUARD.set(guard);

                    Some(
                        fmt::layer()
                            .with_writer(file_writer)
                            .with_target(true)
                            .with_thread_ids(true)
                            .with_ansi(false)
                            .json()
                            .with_filter(EnvFilter::new(&filter)),
                    )
                }
                Err(error) => {
                    directory_error = Some(format!("{}: {error}", log_dir.display()));
                    None
                }
            },
            None => None,
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        if let Some(error) = directory_error {
            tracing::warn!(error = %error, "Could not create log directory, file logging disabled");
        }

        tracing::info!(
            pid,
            environment = %environment,
            filter = %filter,
            log_file = log_file.as_ref().map(|path| path.display().to_string()),
            "Structured logging initialized"
        );
    });
}

/// Pick the filter directive: configured level, then `RUST_LOG`, then the
/// environment default
fn resolve_filter(config: &LoggingConfig, environment: &str) -> String {
    config
        .level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| get_log_level(environment).to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for query runs
pub fn log_query_operation(
    operation: &str,
    query: &str,
    cached: bool,
    duration_ms: Option<f64>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        query = %query,
        cached,
        duration_ms,
        status = %status,
        details,
        timestamp = %Utc::now().to_rfc3339(),
        "QUERY_OPERATION"
    );
}

/// Log structured data for result cache maintenance
pub fn log_cache_operation(operation: &str, query: &str, cache_size: Option<usize>) {
    tracing::debug!(
        operation = %operation,
        query = %query,
        cache_size,
        timestamp = %Utc::now().to_rfc3339(),
        "CACHE_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
