//! Running aggregate of query attempt outcomes.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Aggregate counters for every orchestrated query attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStats {
    /// Every attempt, cached or not, successful or not
    pub total: u64,

    /// Attempts served from the result cache
    pub cached: u64,

    pub successful: u64,

    pub failed: u64,

    /// Mean latency over all attempts.
    ///
    /// Cache hits are recorded as 0 ms, so this tracks perceived response time
    /// and falls as the hit ratio rises. Use `avg_execution_time_ms` for the
    /// cost of actually running queries.
    pub avg_time_ms: f64,

    /// Successful attempts that reached the engine
    pub executed: u64,

    /// Mean latency over `executed` attempts only
    pub avg_execution_time_ms: f64,
}

impl QueryStats {
    /// Share of attempts served from cache, as a percentage
    pub fn cache_hit_rate(&self) -> f64 {
        percentage(self.cached, self.total)
    }

    /// Share of attempts that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        percentage(self.successful, self.total)
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Thread-safe online aggregator for [`QueryStats`]
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: Mutex<QueryStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt. All counters move together under one lock.
    pub fn record(&self, cached: bool, time_ms: f64, success: bool) {
        let mut stats = self.stats.lock();

        let previous_total = stats.total;
        stats.total += 1;
        if cached {
            stats.cached += 1;
        }
        if success {
            stats.successful += 1;
        } else {
            stats.failed += 1;
        }
        stats.avg_time_ms =
            (stats.avg_time_ms * previous_total as f64 + time_ms) / stats.total as f64;

        if success && !cached {
            let previous_executed = stats.executed;
            stats.executed += 1;
            stats.avg_execution_time_ms = (stats.avg_execution_time_ms
                * previous_executed as f64
                + time_ms)
                / stats.executed as f64;
        }

        debug!(
            cached,
            success,
            time_ms,
            total = stats.total,
            avg_time_ms = stats.avg_time_ms,
            "Recorded query attempt"
        );
    }

    /// Read-only copy of the current aggregate
    pub fn snapshot(&self) -> QueryStats {
        *self.stats.lock()
    }

    /// Zero every counter
    pub fn reset(&self) {
        *self.stats.lock() = QueryStats::default();
    }
}
