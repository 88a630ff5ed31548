//! Business summary metrics over a time series

use crate::types::{Bucket, TimeSeriesPoint};

/// Volume and trend summaries
pub struct BusinessMetrics;

impl BusinessMetrics {
    /// Sum of all values (0 for an empty series)
    pub fn total_volume(series: &[TimeSeriesPoint]) -> f64 {
        series.iter().fold(0.0, |acc, p| acc + p.value)
    }

    /// Percentage change from the first to the last point, rounded to one decimal.
    ///
    /// Returns 0 when there are fewer than two points or when the first value is 0.
    pub fn growth_rate(series: &[TimeSeriesPoint]) -> f64 {
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            return 0.0;
        };
        if series.len() < 2 || first.value == 0.0 {
            return 0.0;
        }

        let rate = (last.value - first.value) / first.value * 100.0;
        if !rate.is_finite() {
            return 0.0;
        }
        round_one_decimal(rate)
    }

    /// Mean bucket total, used as the baseline of an aggregated chart (0 when empty)
    pub fn baseline(buckets: &[Bucket]) -> f64 {
        if buckets.is_empty() {
            return 0.0;
        }
        buckets.iter().fold(0.0, |acc, b| acc + b.total) / buckets.len() as f64
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
