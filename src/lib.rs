#![allow(clippy::doc_markdown)] // Allow technical terms like DuckDB, CSV in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DataGuard Core
//!
//! Query result caching and execution orchestration for the DataGuard SQL
//! analytics front-end.
//!
//! ## Overview
//!
//! Users upload CSV files into an embedded analytical engine and run SQL against
//! them, either typed by hand or proposed by an AI assistant. This crate sits
//! between the user interface and the engine: it memoizes recent result sets,
//! keeps aggregate statistics over every attempt, and turns raw engine failures
//! into coded, displayable errors.
//!
//! ## Module Organization
//!
//! - [`cache`] - Bounded, time-expiring FIFO result cache
//! - [`metrics`] - Query attempt statistics
//! - [`orchestration`] - The per-query flow and error classification
//! - [`resilience`] - Retry with exponential backoff
//! - [`engine`] - Contract for the analytical engine collaborator
//! - [`export`] - CSV, JSON, Markdown and HTML result export
//! - [`chat`] - Assistant transcript persistence
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Crate-level error type
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dataguard_core::config::ConfigManager;
//! use dataguard_core::engine::QueryEngine;
//! use dataguard_core::orchestration::QueryOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example(engine: Arc<dyn QueryEngine>) -> Result<(), Box<dyn std::error::Error>> {
//! dataguard_core::logging::init_structured_logging();
//!
//! let manager = ConfigManager::load()?;
//! let orchestrator = QueryOrchestrator::from_config(engine, manager.config());
//!
//! let first = orchestrator.run("SELECT region, SUM(total) FROM sales GROUP BY 1").await?;
//! let second = orchestrator.run("select region, sum(total) from sales group by 1").await?;
//! assert!(!first.cached && second.cached);
//!
//! let stats = orchestrator.stats();
//! println!("hit rate {:.1}%", stats.cache_hit_rate());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod chat;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod orchestration;
pub mod resilience;

pub use cache::{CacheEntry, CacheKey, ResultCache};
pub use config::{ConfigManager, DataguardConfig, QueryCacheConfig};
pub use engine::{EngineError, QueryEngine, ResultSet, SqlSuggestion};
pub use error::{DataguardError, Result};
pub use metrics::{QueryStats, StatsAggregator};
pub use orchestration::{
    ErrorCode, ErrorContext, OrchestrationError, QueryError, QueryOrchestrator, QueryOutcome,
};
pub use resilience::{run_with_retry, RetryPolicy};
