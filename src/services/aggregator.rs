//! Calendar resampling of time series

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::{Bucket, Granularity, Result, TimeSeriesPoint};

/// Groups dated observations into calendar buckets
pub struct Aggregator;

impl Aggregator {
    /// Resample `series` at `granularity`.
    ///
    /// Weekly is the identity transform: one bucket per point, input order kept.
    /// Monthly and yearly sum values per calendar period and return buckets
    /// sorted by key ascending.
    pub fn aggregate(series: &[TimeSeriesPoint], granularity: Granularity) -> Vec<Bucket> {
        let key_fn = bucket_key_fn(granularity);

        if granularity == Granularity::Weekly {
            return series
                .iter()
                .map(|p| Bucket::new(key_fn(p.date), p.value, 1))
                .collect();
        }

        let mut grouped: BTreeMap<String, Bucket> = BTreeMap::new();
        for point in series {
            let key = key_fn(point.date);
            let bucket = grouped
                .entry(key)
                .or_insert_with_key(|k| Bucket::new(k.clone(), 0.0, 0));
            bucket.total += point.value;
            bucket.count += 1;
        }

        grouped.into_values().collect()
    }

    /// Resample using a textual granularity tag (`weekly`, `monthly`, `yearly`).
    ///
    /// Unknown tags fail with `InvalidArgument`.
    pub fn aggregate_tag(series: &[TimeSeriesPoint], tag: &str) -> Result<Vec<Bucket>> {
        let granularity = tag.parse::<Granularity>()?;
        Ok(Self::aggregate(series, granularity))
    }
}

/// Key derivation per granularity
fn bucket_key_fn(granularity: Granularity) -> fn(NaiveDate) -> String {
    match granularity {
        Granularity::Weekly => day_key,
        Granularity::Monthly => month_key,
        Granularity::Yearly => year_key,
    }
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn year_key(date: NaiveDate) -> String {
    date.format("%Y").to_string()
}
