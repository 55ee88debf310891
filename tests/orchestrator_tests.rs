mod common;

use common::{echo_result, MockEngine, TestHarness};
use dataguard_core::config::DataguardConfig;
use dataguard_core::engine::{EngineError, SqlSuggestion};
use dataguard_core::orchestration::{
    ErrorCode, OrchestrationError, QueryError, QueryOrchestrator,
};
use dataguard_core::resilience::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

#[tokio::test]
async fn test_cache_hit_skips_engine() {
    let harness = TestHarness::new();
    harness.cache.set("SELECT 1", echo_result("SELECT 1"), 12.0);

    let outcome = harness.orchestrator.run("SELECT 1").await.unwrap();

    assert!(outcome.cached);
    assert_eq!(outcome.time_ms, 0.0);
    assert_eq!(*outcome.result, echo_result("SELECT 1"));
    assert_eq!(harness.engine.call_count(), 0);

    let stats = harness.stats.snapshot();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.cached, 1);
    assert_eq!(stats.avg_time_ms, 0.0);
}

#[tokio::test]
async fn test_miss_then_hit_executes_once() {
    let harness = TestHarness::new();

    let first = harness.orchestrator.run("SELECT 2").await.unwrap();
    let second = harness.orchestrator.run("  select 2 ").await.unwrap();

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(harness.engine.call_count(), 1);
    assert_eq!(first.result, second.result);

    let stats = harness.stats.snapshot();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.cached, 1);
    assert_eq!(stats.successful, 2);
    assert_eq!(stats.executed, 1);
}

#[tokio::test]
async fn test_population_uses_submitted_text() {
    let harness = TestHarness::new();
    assert_ok!(harness.orchestrator.run("SELECT * FROM Sales").await);

    let entry = harness.cache.get("select * from sales").unwrap();
    assert_eq!(entry.query, "SELECT * FROM Sales");
    assert_eq!(harness.cache.get_stats().queries, vec!["SELECT * FROM Sales"]);
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let harness = TestHarness::new();

    let result = harness.orchestrator.run("").await;

    assert_eq!(result, Err(OrchestrationError::EmptyQuery));
    assert_eq!(harness.stats.snapshot().total, 0);
    assert_eq!(harness.engine.call_count(), 0);
}

#[tokio::test]
async fn test_parse_failure_is_recoverable() {
    let harness = TestHarness::new();
    harness
        .engine
        .fail_next(EngineError::failed("Unable to parse CSV header"));

    let error = harness
        .orchestrator
        .run("SELECT * FROM upload")
        .await
        .unwrap_err();

    let context = error.context().unwrap();
    assert_eq!(context.code, ErrorCode::ParseError);
    assert_eq!(context.context.as_deref(), Some("file_upload"));
    assert!(error.is_recoverable());

    let stats = harness.stats.snapshot();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.successful, 0);
    assert!(harness.cache.is_empty());
}

#[tokio::test]
async fn test_failed_query_runs_again() {
    let harness = TestHarness::new();
    harness.engine.fail_next(EngineError::failed("disk full"));

    let error = harness.orchestrator.run("SELECT 3").await.unwrap_err();
    let context = error.context().unwrap();
    assert_eq!(context.code, ErrorCode::Error);
    assert_eq!(context.message, "disk full");
    assert!(!context.recoverable);

    let outcome = harness.orchestrator.run("SELECT 3").await.unwrap();
    assert!(!outcome.cached);
    assert_eq!(harness.engine.call_count(), 2);
}

#[tokio::test]
async fn test_pre_classified_error_passes_through() {
    let harness = TestHarness::new();
    harness.engine.fail_next(EngineError::from(
        QueryError::new("Upload quota exceeded")
            .with_code("QUOTA_EXCEEDED")
            .with_context("file_upload")
            .recoverable(true),
    ));

    let error = harness.orchestrator.run("SELECT 4").await.unwrap_err();
    let context = error.context().unwrap();

    assert_eq!(context.code.as_str(), "QUOTA_EXCEEDED");
    assert_eq!(context.message, "Upload quota exceeded");
    assert!(context.recoverable);
}

#[tokio::test]
async fn test_non_error_failure_is_unknown() {
    let harness = TestHarness::new();
    harness
        .engine
        .fail_next(EngineError::opaque(serde_json::json!({ "status": 500 })));

    let error = harness.orchestrator.run("SELECT 5").await.unwrap_err();
    let context = error.context().unwrap();

    assert_eq!(context.code, ErrorCode::Unknown);
    assert_eq!(context.message, "An unexpected error occurred");
}

#[tokio::test]
async fn test_run_suggestion_feeds_query() {
    let harness = TestHarness::new();
    let suggestion = SqlSuggestion {
        query: "SELECT COUNT(*) FROM sales".to_string(),
        explanation: "Counts the rows in the sales table".to_string(),
        table_used: Some("sales".to_string()),
    };

    let outcome = harness.orchestrator.run_suggestion(&suggestion).await.unwrap();

    assert!(!outcome.cached);
    assert_eq!(harness.engine.executed(), vec!["SELECT COUNT(*) FROM sales"]);
    assert_eq!(harness.orchestrator.history()[0].query, "SELECT COUNT(*) FROM sales");
}

#[tokio::test(start_paused = true)]
async fn test_elapsed_time_is_recorded() {
    let harness = TestHarness::with_engine(MockEngine::with_delay(Duration::from_millis(40)));

    let outcome = harness.orchestrator.run("SELECT 6").await.unwrap();

    assert!(outcome.time_ms >= 40.0);
    let entry = harness.cache.get("SELECT 6").unwrap();
    assert_eq!(entry.execution_time_ms, outcome.time_ms);
    assert_eq!(harness.stats.snapshot().avg_time_ms, outcome.time_ms);
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_surfaces_last_failure() {
    let engine = Arc::new(MockEngine::new());
    engine.fail_times(3, "SQL engine unavailable");
    let orchestrator = QueryOrchestrator::builder(engine.clone())
        .retry(RetryPolicy::new(3, Duration::from_millis(1)))
        .build();

    let error = orchestrator.run("SELECT 7").await.unwrap_err();

    assert_eq!(engine.call_count(), 3);
    assert_eq!(error.context().unwrap().code, ErrorCode::QueryError);
    let stats = orchestrator.stats();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.failed, 1);
}

#[tokio::test]
async fn test_retry_disabled_by_default_config() {
    let engine = Arc::new(MockEngine::new());
    engine.fail_times(1, "transient");
    let orchestrator = QueryOrchestrator::from_config(engine.clone(), &DataguardConfig::for_test());

    assert!(orchestrator.run("SELECT 8").await.is_err());
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_misses_both_execute() {
    let harness = TestHarness::with_engine(MockEngine::with_delay(Duration::from_millis(10)));

    let (first, second) = tokio::join!(
        harness.orchestrator.run("SELECT 9"),
        harness.orchestrator.run("SELECT 9")
    );

    assert!(!first.unwrap().cached);
    assert!(!second.unwrap().cached);
    assert_eq!(harness.engine.call_count(), 2);
    assert_eq!(harness.cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_coalesced_misses_share_one_execution() {
    let engine = Arc::new(MockEngine::with_delay(Duration::from_millis(10)));
    let orchestrator = QueryOrchestrator::builder(engine.clone())
        .coalesce_in_flight(true)
        .build();

    let (first, second) = tokio::join!(orchestrator.run("SELECT 10"), orchestrator.run("select 10"));

    let first = first.unwrap();
    let second = second.unwrap();
    assert_eq!(engine.call_count(), 1);
    assert_eq!(first.result, second.result);
    assert!(!first.cached && !second.cached);

    let stats = orchestrator.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.successful, 2);

    let third = orchestrator.run("SELECT 10").await.unwrap();
    assert!(third.cached);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_run_records_nothing() {
    let harness = TestHarness::with_engine(MockEngine::with_delay(Duration::from_secs(5)));

    let timed_out =
        tokio::time::timeout(Duration::from_millis(10), harness.orchestrator.run("SELECT 11")).await;

    assert!(timed_out.is_err());
    assert_eq!(harness.engine.call_count(), 1);
    assert!(harness.cache.is_empty());
    assert_eq!(harness.stats.snapshot().total, 0);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_coalesced_run_is_not_resumed() {
    let engine = Arc::new(MockEngine::with_delay(Duration::from_secs(5)));
    let orchestrator = QueryOrchestrator::builder(engine.clone())
        .coalesce_in_flight(true)
        .build();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(10), orchestrator.run("SELECT 12")).await;
    assert!(timed_out.is_err());
    assert_eq!(engine.call_count(), 1);

    let outcome = orchestrator.run("SELECT 12").await.unwrap();
    assert!(!outcome.cached);
    assert_eq!(engine.call_count(), 2);
    assert_eq!(orchestrator.stats().total, 1);
}
