#![allow(dead_code)]

pub mod mock_engine;
pub mod strategies;

pub use mock_engine::*;
pub use strategies::*;

use dataguard_core::cache::ResultCache;
use dataguard_core::metrics::StatsAggregator;
use dataguard_core::orchestration::QueryOrchestrator;
use std::sync::Arc;
use std::time::Duration;

/// Orchestrator over a fresh mock engine, with handles to its parts
pub struct TestHarness {
    pub engine: Arc<MockEngine>,
    pub cache: Arc<ResultCache>,
    pub stats: Arc<StatsAggregator>,
    pub orchestrator: QueryOrchestrator,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_engine(MockEngine::new())
    }

    pub fn with_engine(engine: MockEngine) -> Self {
        let engine = Arc::new(engine);
        let cache = Arc::new(ResultCache::with_limits(50, Duration::from_secs(300)));
        let stats = Arc::new(StatsAggregator::new());
        let orchestrator = QueryOrchestrator::new(engine.clone(), cache.clone(), stats.clone());

        Self {
            engine,
            cache,
            stats,
            orchestrator,
        }
    }
}
