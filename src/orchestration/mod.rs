//! # Query Orchestration
//!
//! Coordinates cache lookup, engine execution, statistics and error
//! classification for each query the user submits.
//!
//! ## Core Components
//!
//! - **QueryOrchestrator**: runs one query attempt through the result cache and the engine
//! - **ErrorClassifier**: turns raw engine failures into displayable, coded contexts
//! - **QueryHistory**: bounded record of submitted queries
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dataguard_core::cache::ResultCache;
//! use dataguard_core::engine::QueryEngine;
//! use dataguard_core::metrics::StatsAggregator;
//! use dataguard_core::orchestration::QueryOrchestrator;
//! use std::sync::Arc;
//!
//! # async fn example(engine: Arc<dyn QueryEngine>) -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = QueryOrchestrator::new(
//!     engine,
//!     Arc::new(ResultCache::with_defaults()),
//!     Arc::new(StatsAggregator::new()),
//! );
//!
//! let outcome = orchestrator.run("SELECT * FROM sales").await?;
//! println!("{} rows, cached: {}", outcome.result.row_count, outcome.cached);
//! # Ok(())
//! # }
//! ```

pub mod error_classifier;
pub mod errors;
pub mod history;
pub mod query_orchestrator;

pub use error_classifier::{classify, ErrorClassifier, StandardErrorClassifier};
pub use errors::{ErrorCode, ErrorContext, OrchestrationError, QueryError};
pub use history::{QueryHistory, QueryHistoryEntry};
pub use query_orchestrator::{QueryOrchestrator, QueryOrchestratorBuilder, QueryOutcome};
