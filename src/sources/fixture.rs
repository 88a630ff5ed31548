//! Built-in demo dataset
//!
//! Serves a fixed dataset for product `P12` so the dashboard can be used
//! without a running prediction backend. Unknown products behave like the
//! backend does and fail with HTTP 404.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use super::{ForecastSource, HistorySource, MetricsSource, SalesBackend};
use crate::types::{FetchError, ForecastPoint, ModelMetrics, TimeSeriesPoint};

const FIXTURE_PRODUCT: &str = "P12";

const HISTORY: [((i32, u32, u32), f64); 5] = [
    ((2025, 1, 7), 3.0),
    ((2025, 1, 14), 4.0),
    ((2025, 1, 21), 1.0),
    ((2025, 1, 28), 6.0),
    ((2025, 2, 4), 4.0),
];

const FORECAST: [((i32, u32, u32), f64); 5] = [
    ((2026, 1, 4), 2.52),
    ((2026, 1, 11), 1.01),
    ((2026, 1, 18), 0.79),
    ((2026, 1, 25), 0.96),
    ((2026, 2, 1), 1.73),
];

const MODEL_VERSION: &str = "Hybrid-Prophet-LGBM-v1";
const MODEL_ACCURACY: f64 = 84.89;
const MODEL_WMAPE: f64 = 15.11;
const MODEL_LAST_TRAINED: &str = "2025-12-16T17:08:22";

/// In-memory source backed by the demo dataset
#[derive(Debug, Clone, Default)]
pub struct FixtureSource;

impl FixtureSource {
    pub fn new() -> Self {
        Self
    }

    fn check_entity(entity_id: &str) -> Result<(), FetchError> {
        if entity_id == FIXTURE_PRODUCT {
            Ok(())
        } else {
            Err(FetchError::NotFound { status: 404 })
        }
    }
}

fn fixture_date((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, FetchError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| FetchError::Payload(format!("invalid fixture date {year}-{month}-{day}")))
}

#[async_trait]
impl HistorySource for FixtureSource {
    async fn fetch_history(&self, entity_id: &str) -> Result<Vec<TimeSeriesPoint>, FetchError> {
        Self::check_entity(entity_id)?;
        HISTORY
            .iter()
            .map(|&(ymd, value)| fixture_date(ymd).map(|date| TimeSeriesPoint::new(date, value)))
            .collect()
    }
}

#[async_trait]
impl ForecastSource for FixtureSource {
    async fn fetch_forecast(&self, entity_id: &str) -> Result<Vec<ForecastPoint>, FetchError> {
        Self::check_entity(entity_id)?;
        FORECAST
            .iter()
            .map(|&(ymd, forecast_value)| {
                fixture_date(ymd).map(|date| ForecastPoint {
                    date,
                    forecast_value,
                })
            })
            .collect()
    }
}

#[async_trait]
impl MetricsSource for FixtureSource {
    async fn fetch_model_metrics(&self) -> Result<ModelMetrics, FetchError> {
        let last_trained = NaiveDateTime::parse_from_str(MODEL_LAST_TRAINED, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| FetchError::Payload(format!("invalid fixture timestamp: {e}")))?;
        Ok(ModelMetrics {
            model_version: MODEL_VERSION.to_string(),
            wmape: Some(MODEL_WMAPE),
            accuracy: Some(MODEL_ACCURACY),
            last_trained,
        })
    }
}

impl SalesBackend for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }
}
