//! Data sources for sales history, forecasts and model metrics

mod fixture;
mod http;

pub use fixture::FixtureSource;
pub use http::HttpSource;

use async_trait::async_trait;

use crate::config::{Config, DataSourceMode};
use crate::types::{FetchError, ForecastPoint, ModelMetrics, Result, TimeSeriesPoint};

/// Supplies an entity's forecast series
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Forecast points in ascending date order
    async fn fetch_forecast(&self, entity_id: &str) -> std::result::Result<Vec<ForecastPoint>, FetchError>;
}

/// Supplies an entity's raw sales history
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// History points in ascending date order
    async fn fetch_history(&self, entity_id: &str) -> std::result::Result<Vec<TimeSeriesPoint>, FetchError>;
}

/// Supplies the latest model health figures
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_model_metrics(&self) -> std::result::Result<ModelMetrics, FetchError>;
}

/// A complete backend: history, forecast and metrics
pub trait SalesBackend: ForecastSource + HistorySource + MetricsSource {
    /// Source identifier (e.g., "live", "fixture")
    fn name(&self) -> &str;
}

/// Build the backend selected by `config.data_source`
pub fn open_backend(config: &Config) -> Result<Box<dyn SalesBackend>> {
    match config.data_source {
        DataSourceMode::Fixture => Ok(Box::new(FixtureSource::new())),
        DataSourceMode::Live => Ok(Box::new(HttpSource::new(
            &config.backend_url,
            config.request_timeout,
        )?)),
    }
}
