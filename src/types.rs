//! Core data types and errors shared across the engine

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single dated observation (history or forecast)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A single forecast observation as delivered by a forecast source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast_value: f64,
}

impl From<ForecastPoint> for TimeSeriesPoint {
    fn from(point: ForecastPoint) -> Self {
        Self {
            date: point.date,
            value: point.forecast_value,
        }
    }
}

/// Calendar bucket size used for resampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Identity: one bucket per input point, keyed by the point's date
    /// rendered as `YYYY-MM-DD` (backend time-of-day suffixes are dropped)
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = SalesboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(SalesboardError::InvalidArgument(format!(
                "unknown granularity '{}' (expected weekly, monthly or yearly)",
                other
            ))),
        }
    }
}

/// Aggregated calendar period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// `YYYY-MM-DD` (weekly), `YYYY-MM` (monthly) or `YYYY` (yearly)
    pub key: String,
    pub total: f64,
    /// Number of points that contributed to `total`
    #[serde(skip_serializing)]
    #[serde(default)]
    pub count: usize,
}

impl Bucket {
    pub fn new(key: impl Into<String>, total: f64, count: usize) -> Self {
        Self {
            key: key.into(),
            total,
            count,
        }
    }

    /// Mean value per contributing point, 0 for an empty bucket
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// One entity's aggregated forecast total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityForecastSummary {
    pub entity_id: String,
    pub potential_total: f64,
}

/// Ranked comparison row (rank is 1-based)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub entity_id: String,
    pub potential_total: f64,
}

/// Diagnostic for an entity excluded from a comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFailure {
    pub entity_id: String,
    /// HTTP status code, when the failure carried one
    pub status: Option<u16>,
    pub message: String,
}

/// Leaderboard plus the identifiers that could not be fetched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub failures: Vec<EntityFailure>,
}

impl ComparisonReport {
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.entity_id.as_str()).collect()
    }
}

/// Latest model health as reported by the prediction backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub model_version: String,
    pub wmape: Option<f64>,
    pub accuracy: Option<f64>,
    pub last_trained: NaiveDateTime,
}

/// Retrieval failure reported by a data source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("not found (HTTP {status})")]
    NotFound { status: u16 },

    #[error("request failed with HTTP {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed payload: {0}")]
    Payload(String),

    #[error("blank entity identifier")]
    BlankId,
}

impl FetchError {
    /// HTTP status code, if the failure came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { status } | Self::Status { status } => Some(*status),
            Self::Transport(_) | Self::Payload(_) | Self::BlankId => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Error types for salesboard
#[derive(Error, Debug)]
pub enum SalesboardError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch '{entity_id}': {source}")]
    Fetch {
        entity_id: String,
        #[source]
        source: FetchError,
    },
}

pub type Result<T> = std::result::Result<T, SalesboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
        assert_eq!(" Monthly ".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!("YEARLY".parse::<Granularity>().unwrap(), Granularity::Yearly);
    }

    #[test]
    fn test_granularity_rejects_unknown_tag() {
        let err = "daily".parse::<Granularity>().unwrap_err();
        assert!(matches!(err, SalesboardError::InvalidArgument(_)));
        assert!(err.to_string().contains("daily"));
    }

    #[test]
    fn test_granularity_display_roundtrip() {
        for g in Granularity::ALL {
            assert_eq!(g.to_string().parse::<Granularity>().unwrap(), g);
        }
    }

    #[test]
    fn test_bucket_mean() {
        assert_eq!(Bucket::new("2025-01", 7.0, 2).mean(), 3.5);
        assert_eq!(Bucket::new("2025-01", 0.0, 0).mean(), 0.0);
    }

    #[test]
    fn test_bucket_serializes_without_count() {
        let json = serde_json::to_string(&Bucket::new("2025", 4.0, 3)).unwrap();
        assert_eq!(json, r#"{"key":"2025","total":4.0}"#);
    }

    #[test]
    fn test_forecast_point_into_series_point() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        let point: TimeSeriesPoint = ForecastPoint {
            date,
            forecast_value: 2.52,
        }
        .into();
        assert_eq!(point, TimeSeriesPoint::new(date, 2.52));
    }

    #[test]
    fn test_fetch_error_status() {
        assert_eq!(FetchError::NotFound { status: 404 }.status(), Some(404));
        assert_eq!(FetchError::Status { status: 503 }.status(), Some(503));
        assert_eq!(FetchError::Transport("timeout".into()).status(), None);
        assert_eq!(FetchError::BlankId.status(), None);
        assert!(FetchError::NotFound { status: 404 }.is_not_found());
        assert!(!FetchError::Status { status: 500 }.is_not_found());
    }

    #[test]
    fn test_report_failed_ids() {
        let report = ComparisonReport {
            leaderboard: vec![],
            failures: vec![EntityFailure {
                entity_id: "P2".into(),
                status: Some(404),
                message: "not found (HTTP 404)".into(),
            }],
        };
        assert_eq!(report.failed_ids(), vec!["P2"]);
    }
}
