//! CLI command handling

mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DataSourceMode};
use crate::services::normalizer::parse_entity_ids;
use crate::services::{Aggregator, BusinessMetrics, ComparisonService};
use crate::sources::{open_backend, ForecastSource, HistorySource, MetricsSource, SalesBackend};
use crate::types::{Granularity, Result, SalesboardError, TimeSeriesPoint};

pub use output::SeriesView;

/// Sales history and forecast dashboard
#[derive(Parser)]
#[command(name = "salesboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Data source: fixture (built-in demo data) or live (prediction backend)
    #[arg(long, global = true)]
    source: Option<DataSourceMode>,

    /// Prediction backend base URL
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Read configuration from this .env file
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a product's sales history
    History {
        /// Product ID (e.g., P12)
        entity_id: String,

        /// Bucket size: weekly, monthly or yearly
        #[arg(short, long, default_value = "weekly")]
        granularity: Granularity,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a product's demand forecast
    Forecast {
        /// Product ID (e.g., P12)
        entity_id: String,

        /// Bucket size: weekly, monthly or yearly
        #[arg(short, long, default_value = "weekly")]
        granularity: Granularity,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank products by forecast potential
    Compare {
        /// Comma-separated product IDs (e.g., "P1, P12, P15")
        ids: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show model health metrics
    Metrics {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        init_logging(self.verbose);

        let config = self.resolve_config()?;
        let backend = open_backend(&config)?;
        tracing::debug!(source = backend.name(), backend_url = %config.backend_url, "backend ready");

        match self.command {
            Commands::History {
                entity_id,
                granularity,
                json,
            } => {
                let view = history_view(backend.as_ref(), &entity_id, granularity).await?;
                print_series("Sales History", &view, json)
            }
            Commands::Forecast {
                entity_id,
                granularity,
                json,
            } => {
                let view = forecast_view(backend.as_ref(), &entity_id, granularity).await?;
                print_series("Future Demand Forecast", &view, json)
            }
            Commands::Compare { ids, json } => run_compare(backend.as_ref(), &config, &ids, json).await,
            Commands::Metrics { json } => run_metrics(backend.as_ref(), json).await,
        }
    }

    /// Config from env file/environment, then CLI flags on top
    fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.env_file.as_deref())?;
        if let Some(mode) = self.source {
            config.data_source = mode;
        }
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Fetch, aggregate and summarize a product's history
pub async fn history_view<S>(source: &S, entity_id: &str, granularity: Granularity) -> Result<SeriesView>
where
    S: HistorySource + ?Sized,
{
    let series = source
        .fetch_history(entity_id)
        .await
        .map_err(|source| SalesboardError::Fetch {
            entity_id: entity_id.to_string(),
            source,
        })?;

    Ok(SeriesView {
        entity_id: entity_id.to_string(),
        granularity,
        buckets: Aggregator::aggregate(&series, granularity),
        total_volume: BusinessMetrics::total_volume(&series),
        growth_rate: Some(BusinessMetrics::growth_rate(&series)),
        baseline: None,
    })
}

/// Fetch, aggregate and summarize a product's forecast
pub async fn forecast_view<S>(source: &S, entity_id: &str, granularity: Granularity) -> Result<SeriesView>
where
    S: ForecastSource + ?Sized,
{
    let forecast = source
        .fetch_forecast(entity_id)
        .await
        .map_err(|source| SalesboardError::Fetch {
            entity_id: entity_id.to_string(),
            source,
        })?;
    let series: Vec<TimeSeriesPoint> = forecast.into_iter().map(Into::into).collect();
    let buckets = Aggregator::aggregate(&series, granularity);

    Ok(SeriesView {
        entity_id: entity_id.to_string(),
        granularity,
        total_volume: BusinessMetrics::total_volume(&series),
        growth_rate: None,
        baseline: Some(BusinessMetrics::baseline(&buckets)),
        buckets,
    })
}

fn print_series(title: &str, view: &SeriesView, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", output::render_series(title, view));
    }
    Ok(())
}

async fn run_compare(
    backend: &dyn SalesBackend,
    config: &Config,
    ids: &str,
    json: bool,
) -> anyhow::Result<()> {
    let entity_ids = parse_entity_ids(ids);
    let report = ComparisonService::new(config.max_concurrent_fetches)
        .compare(&entity_ids, backend)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", output::render_leaderboard(&report));
    }
    Ok(())
}

async fn run_metrics(backend: &dyn SalesBackend, json: bool) -> anyhow::Result<()> {
    let metrics = backend
        .fetch_model_metrics()
        .await
        .map_err(|source| SalesboardError::Fetch {
            entity_id: "model metrics".to_string(),
            source,
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print!("{}", output::render_metrics(&metrics));
    }
    Ok(())
}
