//! # Query Orchestrator
//!
//! Coordinates one query attempt end to end: cache lookup, engine execution,
//! cache population, statistics and failure classification.
//!
//! ## Flow
//!
//! ```text
//! Idle ──empty text──▶ Rejected
//!   │
//!   ▼
//! CacheLookup ──hit──▶ Done (cached, 0 ms)
//!   │ miss
//!   ▼
//! Executing ──ok──▶ populate cache, record ──▶ Done
//!   │ err
//!   ▼
//! classify, record ──▶ Failed
//! ```
//!
//! Lookup always precedes execution, and execution precedes cache population and
//! stats recording. A run whose future is dropped while executing records nothing.
//!
//! Two concurrent runs of the same query both miss and both execute unless
//! in-flight coalescing is enabled, in which case they share one engine call.
//! Coalesced waiters are each recorded as a non-cached attempt. Once any waiter
//! finishes or is dropped, the shared execution leaves the in-flight map.

use crate::cache::{CacheKey, ResultCache};
use crate::config::DataguardConfig;
use crate::engine::{EngineError, QueryEngine, ResultSet, SqlSuggestion};
use crate::logging::{log_cache_operation, log_query_operation};
use crate::metrics::{QueryStats, StatsAggregator};
use crate::orchestration::error_classifier::{ErrorClassifier, StandardErrorClassifier};
use crate::orchestration::errors::{ErrorContext, OrchestrationError};
use crate::orchestration::history::{QueryHistory, QueryHistoryEntry};
use crate::resilience::{run_with_retry, RetryPolicy};
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Successful result of [`QueryOrchestrator::run`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub result: Arc<ResultSet>,
    /// Served from the result cache without invoking the engine
    pub cached: bool,
    /// Engine latency in milliseconds; 0 for cache hits
    pub time_ms: f64,
}

#[derive(Debug, Clone)]
struct Execution {
    result: Arc<ResultSet>,
    time_ms: f64,
}

type SharedExecution = Shared<BoxFuture<'static, Result<Execution, ErrorContext>>>;

/// Everything one engine execution needs, owned so it can outlive the caller
#[derive(Clone)]
struct Executor {
    engine: Arc<dyn QueryEngine>,
    cache: Arc<ResultCache>,
    classifier: Arc<dyn ErrorClassifier>,
    retry: Option<RetryPolicy>,
}

impl Executor {
    /// Run `query` on the engine, populating the cache on success
    async fn execute(self, query: String) -> Result<Execution, ErrorContext> {
        let start = Instant::now();

        let outcome = match self.retry {
            Some(policy) => {
                let engine = self.engine.clone();
                let sql = query.as_str();
                run_with_retry(policy, || engine.execute(sql)).await
            }
            None => self.engine.execute(&query).await,
        };

        match outcome {
            Ok(result_set) => {
                let time_ms = start.elapsed().as_secs_f64() * 1000.0;
                let result = Arc::new(result_set);
                self.cache.set(&query, result.clone(), time_ms);
                log_cache_operation("set", &query, Some(self.cache.len()));
                Ok(Execution { result, time_ms })
            }
            Err(error) => Err(self.classify(&query, &error)),
        }
    }

    fn classify(&self, query: &str, error: &EngineError) -> ErrorContext {
        let context = self.classifier.classify(error);
        warn!(
            engine = self.engine.engine_name(),
            classifier = self.classifier.classifier_name(),
            query = %query,
            code = %context.code,
            recoverable = context.recoverable,
            raw_error = %error,
            "Query execution failed"
        );
        context
    }
}

/// Removes a coalesced execution from the in-flight map when a waiter finishes
/// or is dropped. Waiters still holding the shared future keep it alive, while
/// later runs start a fresh execution instead of resuming an abandoned one.
struct InFlightRelease<'a> {
    in_flight: &'a DashMap<CacheKey, SharedExecution>,
    key: &'a CacheKey,
    shared: &'a SharedExecution,
}

impl Drop for InFlightRelease<'_> {
    fn drop(&mut self) {
        self.in_flight
            .remove_if(self.key, |_, existing| existing.ptr_eq(self.shared));
    }
}

/// Runs queries through the result cache and the engine
pub struct QueryOrchestrator {
    executor: Executor,
    stats: Arc<StatsAggregator>,
    history: QueryHistory,
    in_flight: Option<DashMap<CacheKey, SharedExecution>>,
}

impl QueryOrchestrator {
    /// Orchestrator with the standard classifier, no retry and no coalescing
    pub fn new(
        engine: Arc<dyn QueryEngine>,
        cache: Arc<ResultCache>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self::builder(engine).cache(cache).stats(stats).build()
    }

    pub fn builder(engine: Arc<dyn QueryEngine>) -> QueryOrchestratorBuilder {
        QueryOrchestratorBuilder::new(engine)
    }

    /// Build cache, stats, retry and history from loaded configuration
    pub fn from_config(engine: Arc<dyn QueryEngine>, config: &DataguardConfig) -> Self {
        let mut builder = Self::builder(engine)
            .cache(Arc::new(ResultCache::new(config.cache.clone())))
            .coalesce_in_flight(config.orchestration.coalesce_in_flight)
            .history_limit(config.orchestration.history_limit);

        if config.retry.enabled {
            builder = builder.retry(RetryPolicy::from(&config.retry));
        }

        builder.build()
    }

    /// Run one query attempt
    pub async fn run(&self, query: &str) -> Result<QueryOutcome, OrchestrationError> {
        if query.trim().is_empty() {
            debug!("Rejected empty query");
            return Err(OrchestrationError::EmptyQuery);
        }

        self.history.add(query);

        if let Some(entry) = self.executor.cache.get(query) {
            self.stats.record(true, 0.0, true);
            log_query_operation("run", query, true, Some(0.0), "success", None);
            return Ok(QueryOutcome {
                result: entry.results,
                cached: true,
                time_ms: 0.0,
            });
        }

        let start = Instant::now();
        let outcome = match &self.in_flight {
            Some(in_flight) => self.run_coalesced(in_flight, query).await,
            None => self.executor.clone().execute(query.to_string()).await,
        };

        match outcome {
            Ok(execution) => {
                let time_ms = if self.in_flight.is_some() {
                    start.elapsed().as_secs_f64() * 1000.0
                } else {
                    execution.time_ms
                };
                self.stats.record(false, time_ms, true);
                log_query_operation(
                    "run",
                    query,
                    false,
                    Some(time_ms),
                    "success",
                    Some(&format!("{} rows", execution.result.row_count)),
                );
                Ok(QueryOutcome {
                    result: execution.result,
                    cached: false,
                    time_ms,
                })
            }
            Err(context) => {
                self.stats.record(false, 0.0, false);
                log_query_operation("run", query, false, None, "failed", Some(&context.message));
                Err(OrchestrationError::Failed(context))
            }
        }
    }

    /// Run the SQL proposed by the assistant
    pub async fn run_suggestion(
        &self,
        suggestion: &SqlSuggestion,
    ) -> Result<QueryOutcome, OrchestrationError> {
        debug!(
            table_used = suggestion.table_used.as_deref(),
            "Running assistant suggestion"
        );
        self.run(&suggestion.query).await
    }

    async fn run_coalesced(
        &self,
        in_flight: &DashMap<CacheKey, SharedExecution>,
        query: &str,
    ) -> Result<Execution, ErrorContext> {
        let key = CacheKey::from_query(query);

        let shared = in_flight
            .entry(key.clone())
            .or_insert_with(|| {
                self.executor
                    .clone()
                    .execute(query.to_string())
                    .boxed()
                    .shared()
            })
            .clone();

        let _release = InFlightRelease {
            in_flight,
            key: &key,
            shared: &shared,
        };
        shared.clone().await
    }

    /// Snapshot of the aggregate statistics
    pub fn stats(&self) -> QueryStats {
        self.stats.snapshot()
    }

    pub fn stats_aggregator(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.executor.cache
    }

    pub fn engine(&self) -> &Arc<dyn QueryEngine> {
        &self.executor.engine
    }

    /// Submitted queries, oldest first
    pub fn history(&self) -> Vec<QueryHistoryEntry> {
        self.history.entries()
    }

    /// Forget query history and zero the statistics
    pub fn clear_history(&self) {
        self.history.clear();
        self.stats.reset();
        info!("Query history and statistics cleared");
    }

    pub fn clear_cache(&self) {
        self.executor.cache.clear();
        log_cache_operation("clear", "*", Some(0));
    }
}

impl std::fmt::Debug for QueryOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryOrchestrator")
            .field("engine", &self.executor.engine.engine_name())
            .field("classifier", &self.executor.classifier.classifier_name())
            .field("retry", &self.executor.retry)
            .field("coalesce_in_flight", &self.in_flight.is_some())
            .field("cache", &self.executor.cache)
            .finish()
    }
}

/// Builder for [`QueryOrchestrator`]
pub struct QueryOrchestratorBuilder {
    engine: Arc<dyn QueryEngine>,
    cache: Option<Arc<ResultCache>>,
    stats: Option<Arc<StatsAggregator>>,
    classifier: Option<Arc<dyn ErrorClassifier>>,
    retry: Option<RetryPolicy>,
    coalesce_in_flight: bool,
    history_limit: Option<usize>,
}

impl QueryOrchestratorBuilder {
    fn new(engine: Arc<dyn QueryEngine>) -> Self {
        Self {
            engine,
            cache: None,
            stats: None,
            classifier: None,
            retry: None,
            coalesce_in_flight: false,
            history_limit: None,
        }
    }

    pub fn cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn stats(mut self, stats: Arc<StatsAggregator>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Wrap every engine call in the retry helper
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn coalesce_in_flight(mut self, enabled: bool) -> Self {
        self.coalesce_in_flight = enabled;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn build(self) -> QueryOrchestrator {
        let executor = Executor {
            engine: self.engine,
            cache: self
                .cache
                .unwrap_or_else(|| Arc::new(ResultCache::with_defaults())),
            classifier: self
                .classifier
                .unwrap_or_else(|| Arc::new(StandardErrorClassifier::new())),
            retry: self.retry,
        };

        info!(
            engine = executor.engine.engine_name(),
            cache_enabled = executor.cache.is_enabled(),
            retry = executor.retry.is_some(),
            coalesce_in_flight = self.coalesce_in_flight,
            "Query orchestrator initialized"
        );

        QueryOrchestrator {
            executor,
            stats: self.stats.unwrap_or_default(),
            history: self
                .history_limit
                .map(QueryHistory::new)
                .unwrap_or_default(),
            in_flight: self.coalesce_in_flight.then(DashMap::new),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TableColumn;
    use crate::orchestration::ErrorCode;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct ScriptedEngine {
        calls: AtomicUsize,
        failures: Mutex<VecDeque<EngineError>>,
    }

    impl ScriptedEngine {
        fn failing_with(errors: Vec<EngineError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failures: Mutex::new(errors.into()),
            }
        }
    }

    #[async_trait]
    impl QueryEngine for ScriptedEngine {
        async fn execute(&self, _sql: &str) -> Result<ResultSet, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = self.failures.lock().pop_front() {
                return Err(error);
            }
            Ok(ResultSet::new(vec!["n".to_string()], Vec::new()))
        }

        async fn upload_csv(&self, file_name: &str, _contents: &str) -> Result<String, EngineError> {
            Ok(file_name.to_string())
        }

        async fn table_schema(&self, _table_name: &str) -> Result<Vec<TableColumn>, EngineError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_stats() {
        let engine = Arc::new(ScriptedEngine::default());
        let orchestrator = QueryOrchestrator::builder(engine.clone()).build();

        let result = orchestrator.run("   \n").await;

        assert_eq!(result, Err(OrchestrationError::EmptyQuery));
        assert_eq!(orchestrator.stats().total, 0);
        assert!(orchestrator.history().is_empty());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_classified_and_not_cached() {
        let engine = Arc::new(ScriptedEngine::failing_with(vec![EngineError::failed(
            "SQL syntax error near SELECT",
        )]));
        let orchestrator = QueryOrchestrator::builder(engine.clone()).build();

        let error = orchestrator.run("SELEC 1").await.unwrap_err();
        let context = error.context().unwrap();
        assert_eq!(context.code, ErrorCode::QueryError);
        assert!(context.recoverable);
        assert!(orchestrator.cache().is_empty());

        let stats = orchestrator.stats();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.avg_time_ms, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_transient_failure() {
        let engine = Arc::new(ScriptedEngine::failing_with(vec![EngineError::failed(
            "connection reset",
        )]));
        let orchestrator = QueryOrchestrator::builder(engine.clone())
            .retry(RetryPolicy::new(3, std::time::Duration::from_millis(10)))
            .build();

        let outcome = orchestrator.run("SELECT 1").await.unwrap();

        assert!(!outcome.cached);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
        assert_eq!(orchestrator.stats().successful, 1);
    }

    #[tokio::test]
    async fn test_clear_history_resets_stats() {
        let engine = Arc::new(ScriptedEngine::default());
        let orchestrator = QueryOrchestrator::builder(engine).build();
        orchestrator.run("SELECT 1").await.unwrap();
        orchestrator.run("SELECT 1").await.unwrap();

        assert_eq!(orchestrator.history().len(), 2);
        assert_eq!(orchestrator.stats().cached, 1);

        orchestrator.clear_history();

        assert!(orchestrator.history().is_empty());
        assert_eq!(orchestrator.stats(), QueryStats::default());
        assert_eq!(orchestrator.cache().len(), 1);
    }
}
