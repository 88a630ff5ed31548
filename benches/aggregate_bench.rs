//! Criterion benchmarks for series aggregation and metrics

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use salesboard::services::{Aggregator, BusinessMetrics};
use salesboard::types::{Granularity, TimeSeriesPoint};

/// Daily series of `days` points starting 2015-01-01
fn make_series(days: usize) -> Vec<TimeSeriesPoint> {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default();
    (0..days)
        .map(|i| {
            let value = ((i * 37) % 101) as f64 / 4.0;
            TimeSeriesPoint::new(start + Duration::days(i as i64), value)
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for days in [365usize, 3_650] {
        let series = make_series(days);
        group.throughput(Throughput::Elements(days as u64));

        for granularity in Granularity::ALL {
            group.bench_with_input(
                BenchmarkId::new(granularity.as_str(), format!("{} points", days)),
                &series,
                |b, series| {
                    b.iter(|| Aggregator::aggregate(black_box(series), granularity));
                },
            );
        }
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let series = make_series(3_650);

    let mut group = c.benchmark_group("metrics");
    group.throughput(Throughput::Elements(series.len() as u64));

    group.bench_function("total_volume", |b| {
        b.iter(|| BusinessMetrics::total_volume(black_box(&series)));
    });
    group.bench_function("growth_rate", |b| {
        b.iter(|| BusinessMetrics::growth_rate(black_box(&series)));
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_metrics);
criterion_main!(benches);
