//! # Query Metrics
//!
//! Session-scoped statistics over orchestrated query attempts. The aggregate is
//! in-memory only and is suitable for direct rendering, e.g. as cache hit and
//! success percentages.

pub mod query_stats;

pub use query_stats::{QueryStats, StatsAggregator};
