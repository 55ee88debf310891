use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataguard_core::cache::{encode, ResultCache};
use dataguard_core::engine::{ResultSet, Row};
use dataguard_core::metrics::StatsAggregator;
use serde_json::json;
use std::time::Duration;

fn sample_results(rows: usize) -> ResultSet {
    let rows = (0..rows)
        .map(|i| {
            let mut row = Row::new();
            row.insert("id".to_string(), json!(i));
            row.insert("region".to_string(), json!("North"));
            row
        })
        .collect();
    ResultSet::new(vec!["id".to_string(), "region".to_string()], rows)
}

fn benchmark_key_encoding(c: &mut Criterion) {
    let query = "  SELECT region, SUM(total) FROM sales WHERE year = 2024 GROUP BY region  ";
    c.bench_function("key_encoding", |b| b.iter(|| encode(black_box(query))));
}

fn benchmark_cache_hit(c: &mut Criterion) {
    let cache = ResultCache::with_limits(50, Duration::from_secs(300));
    cache.set("SELECT * FROM sales", sample_results(1_000), 10.0);

    c.bench_function("cache_hit", |b| {
        b.iter(|| cache.get(black_box("select * from sales")))
    });
}

fn benchmark_cache_churn(c: &mut Criterion) {
    let cache = ResultCache::with_limits(50, Duration::from_secs(300));
    let results = std::sync::Arc::new(sample_results(10));
    let mut i = 0u64;

    c.bench_function("cache_set_with_eviction", |b| {
        b.iter(|| {
            i += 1;
            cache.set(&format!("SELECT {i}"), results.clone(), 1.0);
        })
    });
}

fn benchmark_stats_record(c: &mut Criterion) {
    let aggregator = StatsAggregator::new();
    c.bench_function("stats_record", |b| {
        b.iter(|| aggregator.record(black_box(false), black_box(12.5), black_box(true)))
    });
}

criterion_group!(
    benches,
    benchmark_key_encoding,
    benchmark_cache_hit,
    benchmark_cache_churn,
    benchmark_stats_record
);
criterion_main!(benches);
