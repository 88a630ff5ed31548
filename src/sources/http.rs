//! Prediction backend HTTP client

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{ForecastSource, HistorySource, MetricsSource, SalesBackend};
use crate::types::{
    FetchError, ForecastPoint, ModelMetrics, Result, SalesboardError, TimeSeriesPoint,
};

/// Backend history row
#[derive(Deserialize)]
struct HistoryRecord {
    ds: String,
    y: f64,
}

/// Backend forecast row
#[derive(Deserialize)]
struct ForecastRecord {
    forecast_date: String,
    predicted_sales: f64,
}

#[derive(Deserialize)]
struct MetricsRecord {
    model_version: String,
    wmape: Option<f64>,
    accuracy: Option<f64>,
    last_trained: String,
}

/// Live source talking to the prediction backend
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a client for `base_url` (e.g., `http://localhost:8000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| {
            SalesboardError::Config(format!("invalid backend URL '{}': {}", base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(SalesboardError::Config(format!(
                "backend URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SalesboardError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport("backend URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, FetchError> {
        tracing::debug!(%url, "requesting");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let mut body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .to_vec();

        simd_json::serde::from_slice(&mut body).map_err(|e| FetchError::Payload(e.to_string()))
    }
}

/// Calendar date of a backend date or datetime string
fn parse_calendar_date(raw: &str) -> std::result::Result<NaiveDate, FetchError> {
    let date_part = raw.trim().split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| FetchError::Payload(format!("invalid date '{}': {}", raw, e)))
}

/// Backend timestamps come with or without offset and fractional seconds
fn parse_timestamp(raw: &str) -> std::result::Result<NaiveDateTime, FetchError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    parse_calendar_date(raw).map(|d| d.and_time(chrono::NaiveTime::MIN))
}

#[async_trait]
impl HistorySource for HttpSource {
    async fn fetch_history(&self, entity_id: &str) -> std::result::Result<Vec<TimeSeriesPoint>, FetchError> {
        let url = self.endpoint(&["sales", "history", entity_id])?;
        let records: Vec<HistoryRecord> = self.get_json(url).await?;

        let mut points = records
            .into_iter()
            .map(|r| parse_calendar_date(&r.ds).map(|date| TimeSeriesPoint::new(date, r.y)))
            .collect::<std::result::Result<Vec<_>, FetchError>>()?;
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

#[async_trait]
impl ForecastSource for HttpSource {
    async fn fetch_forecast(&self, entity_id: &str) -> std::result::Result<Vec<ForecastPoint>, FetchError> {
        let url = self.endpoint(&["sales", "forecast", entity_id])?;
        let records: Vec<ForecastRecord> = self.get_json(url).await?;

        let mut points = records
            .into_iter()
            .map(|r| {
                parse_calendar_date(&r.forecast_date).map(|date| ForecastPoint {
                    date,
                    forecast_value: r.predicted_sales,
                })
            })
            .collect::<std::result::Result<Vec<_>, FetchError>>()?;
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

#[async_trait]
impl MetricsSource for HttpSource {
    async fn fetch_model_metrics(&self) -> std::result::Result<ModelMetrics, FetchError> {
        let url = self.endpoint(&["metrics", "model"])?;
        let record: MetricsRecord = self.get_json(url).await?;

        Ok(ModelMetrics {
            model_version: record.model_version,
            wmape: record.wmape,
            accuracy: record.accuracy,
            last_trained: parse_timestamp(&record.last_trained)?,
        })
    }
}

impl SalesBackend for HttpSource {
    fn name(&self) -> &str {
        "live"
    }
}
