//! Sales history aggregation and forecast comparison engine.
//!
//! - `services`: calendar resampling, business metrics and the multi-product
//!   comparison leaderboard
//! - `sources`: history/forecast/metrics collaborators (HTTP backend or
//!   built-in fixture data)
//! - `config`: runtime configuration and data source selection
//! - `cli`: command surface used by the `salesboard` binary

pub mod cli;
pub mod config;
pub mod services;
pub mod sources;
pub mod types;
