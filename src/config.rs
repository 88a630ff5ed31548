//! Runtime configuration
//!
//! Values are resolved from defaults, an optional `.env` file and the
//! process environment (later sources win). CLI flags are applied on top
//! by the caller.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Result, SalesboardError};

pub const ENV_BACKEND_URL: &str = "SALESBOARD_BACKEND_URL";
pub const ENV_DATA_SOURCE: &str = "SALESBOARD_DATA_SOURCE";
pub const ENV_TIMEOUT_SECS: &str = "SALESBOARD_TIMEOUT_SECS";
pub const ENV_MAX_CONCURRENCY: &str = "SALESBOARD_MAX_CONCURRENCY";

const ENV_PREFIX: &str = "SALESBOARD_";
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Where series data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceMode {
    /// Built-in demo dataset
    Fixture,
    /// Prediction backend over HTTP
    #[default]
    Live,
}

impl fmt::Display for DataSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixture => f.write_str("fixture"),
            Self::Live => f.write_str("live"),
        }
    }
}

impl FromStr for DataSourceMode {
    type Err = SalesboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixture" => Ok(Self::Fixture),
            "live" => Ok(Self::Live),
            other => Err(SalesboardError::InvalidArgument(format!(
                "unknown data source '{}' (expected fixture or live)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub data_source: DataSourceMode,
    pub request_timeout: Duration,
    /// Upper bound on in-flight forecast fetches during a comparison
    pub max_concurrent_fetches: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            data_source: DataSourceMode::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load from `env_file` (or `./.env` when present) and the process environment
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let process_vars = std::env::vars().filter(|(k, _)| k.starts_with(ENV_PREFIX));
        match env_file {
            Some(path) => Self::load_with(Some(path), process_vars),
            None => {
                let default_path = Path::new(".env");
                let file = default_path.is_file().then_some(default_path);
                Self::load_with(file, process_vars)
            }
        }
    }

    /// Load from an optional env file overlaid with the given variables
    pub fn load_with(
        env_file: Option<&Path>,
        overrides: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self> {
        let mut vars: HashMap<String, String> = HashMap::new();

        if let Some(path) = env_file {
            let iter = dotenvy::from_path_iter(path).map_err(|e| {
                SalesboardError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            for item in iter {
                let (key, value) = item.map_err(|e| {
                    SalesboardError::Config(format!("invalid entry in {}: {}", path.display(), e))
                })?;
                vars.insert(key, value);
            }
        }
        vars.extend(overrides);

        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build a config from a key lookup, falling back to defaults for missing keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            let url = url.trim();
            if url.is_empty() {
                return Err(SalesboardError::InvalidArgument(format!(
                    "{} must not be empty",
                    ENV_BACKEND_URL
                )));
            }
            config.backend_url = url.to_string();
        }

        if let Some(mode) = lookup(ENV_DATA_SOURCE) {
            config.data_source = mode.parse()?;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = parse_number(ENV_TIMEOUT_SECS, &secs)?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(limit) = lookup(ENV_MAX_CONCURRENCY) {
            config.max_concurrent_fetches = parse_number(ENV_MAX_CONCURRENCY, &limit)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_fetches == 0 {
            return Err(SalesboardError::InvalidArgument(
                "max concurrent fetches must be at least 1".into(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(SalesboardError::InvalidArgument(
                "request timeout must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        SalesboardError::InvalidArgument(format!("{} must be a positive integer, got '{}'", key, raw))
    })
}
