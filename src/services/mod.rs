//! Services for series aggregation, metrics and comparison

pub mod aggregator;
pub mod comparison;
pub mod metrics;
pub mod normalizer;

pub use aggregator::Aggregator;
pub use comparison::ComparisonService;
pub use metrics::BusinessMetrics;
