//! Multi-entity forecast comparison
//!
//! Fetches every entity's forecast, reduces it to a potential total and
//! ranks the survivors. Per-entity failures are recorded and skipped.

use futures::stream::{self, StreamExt};

use super::BusinessMetrics;
use crate::sources::ForecastSource;
use crate::types::{
    ComparisonReport, EntityFailure, EntityForecastSummary, FetchError, ForecastPoint,
    LeaderboardEntry, Result, TimeSeriesPoint,
};

const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Builds leaderboards from a forecast source
#[derive(Debug, Clone)]
pub struct ComparisonService {
    max_concurrent_fetches: usize,
}

impl Default for ComparisonService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl ComparisonService {
    /// `max_concurrent_fetches` is clamped to at least 1
    pub fn new(max_concurrent_fetches: usize) -> Self {
        Self {
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Rank `entity_ids` by forecast potential total, highest first.
    ///
    /// Fetches run concurrently (bounded) but results are collected in input
    /// order, so ties keep the order of `entity_ids`. Entities whose fetch
    /// fails are left out of the leaderboard and listed in `failures`.
    /// Blank identifiers are never fetched and are reported the same way.
    pub async fn compare<S>(&self, entity_ids: &[String], source: &S) -> Result<ComparisonReport>
    where
        S: ForecastSource + ?Sized,
    {
        let outcomes: Vec<(&String, std::result::Result<f64, FetchError>)> =
            stream::iter(entity_ids)
                .map(|entity_id| async move {
                    if entity_id.trim().is_empty() {
                        return (entity_id, Err(FetchError::BlankId));
                    }
                    let outcome = source
                        .fetch_forecast(entity_id)
                        .await
                        .map(|series| potential_total(&series));
                    (entity_id, outcome)
                })
                .buffered(self.max_concurrent_fetches)
                .collect()
                .await;

        let mut summaries = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (entity_id, outcome) in outcomes {
            match outcome {
                Ok(potential_total) => {
                    tracing::debug!(entity_id = %entity_id, potential_total, "forecast reduced");
                    summaries.push(EntityForecastSummary {
                        entity_id: entity_id.clone(),
                        potential_total,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        entity_id = %entity_id,
                        status = ?error.status(),
                        error = %error,
                        "forecast fetch failed, excluding entity"
                    );
                    failures.push(EntityFailure {
                        entity_id: entity_id.clone(),
                        status: error.status(),
                        message: error.to_string(),
                    });
                }
            }
        }

        Ok(ComparisonReport {
            leaderboard: rank(summaries),
            failures,
        })
    }
}

/// Sum of an entity's forecast values
pub fn potential_total(series: &[ForecastPoint]) -> f64 {
    let points: Vec<TimeSeriesPoint> = series.iter().copied().map(Into::into).collect();
    BusinessMetrics::total_volume(&points)
}

/// Order by potential total descending and assign contiguous 1-based ranks.
///
/// The sort is stable: numerically equal totals (including `0.0` and `-0.0`)
/// keep their relative input order.
pub fn rank(mut summaries: Vec<EntityForecastSummary>) -> Vec<LeaderboardEntry> {
    summaries.sort_by(|a, b| {
        b.potential_total
            .partial_cmp(&a.potential_total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
        .into_iter()
        .enumerate()
        .map(|(i, s)| LeaderboardEntry {
            rank: i + 1,
            entity_id: s.entity_id,
            potential_total: s.potential_total,
        })
        .collect()
}
