//! Plain-text rendering of views

use std::fmt::Write;

use serde::Serialize;

use crate::types::{Bucket, ComparisonReport, Granularity, ModelMetrics};

/// An aggregated series ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesView {
    pub entity_id: String,
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
    pub total_volume: f64,
    /// First-to-last change in percent (history only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
    /// Mean bucket total (forecast only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
}

/// Whole-number display of a volume with thousand separators
/// (e.g., 1234.6 -> "1,235", -12.2 -> "-12")
pub fn format_volume(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let rounded = value.round();
    let units = (rounded.abs() as u64).to_string();

    let mut out = String::with_capacity(units.len() + units.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    let lead = units.len() % 3;
    out.push_str(&units[..lead]);
    for (i, group) in units.as_bytes()[lead..].chunks(3).enumerate() {
        if lead > 0 || i > 0 {
            out.push(',');
        }
        out.extend(group.iter().map(|&b| b as char));
    }
    out
}

/// Signed percentage with one decimal (e.g., "+33.3%")
pub fn format_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.1}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

pub fn render_series(title: &str, view: &SeriesView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {} ({})", title, view.entity_id, view.granularity);

    let key_width = view
        .buckets
        .iter()
        .map(|b| b.key.len())
        .max()
        .unwrap_or(0)
        .max("Period".len());

    let _ = writeln!(out, "{:<key_width$}  {:>12}", "Period", "Sales");
    for bucket in &view.buckets {
        let _ = writeln!(
            out,
            "{:<key_width$}  {:>12.2}",
            bucket.key, bucket.total
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total volume: {}", format_volume(view.total_volume));
    if let Some(growth) = view.growth_rate {
        let _ = writeln!(out, "Growth:       {}", format_percent(growth));
    }
    if let Some(baseline) = view.baseline {
        let _ = writeln!(out, "Baseline:     {:.2} per period", baseline);
    }
    out
}

pub fn render_leaderboard(report: &ComparisonReport) -> String {
    let mut out = String::new();

    if report.leaderboard.is_empty() {
        let _ = writeln!(out, "No forecasts available for comparison.");
    } else {
        let id_width = report
            .leaderboard
            .iter()
            .map(|e| e.entity_id.len())
            .max()
            .unwrap_or(0)
            .max("Product".len());

        let _ = writeln!(out, "Leaderboard");
        let _ = writeln!(out, "{:>4}  {:<id_width$}  {:>12}", "#", "Product", "Potential");
        for entry in &report.leaderboard {
            let _ = writeln!(
                out,
                "{:>4}  {:<id_width$}  {:>12}",
                entry.rank,
                entry.entity_id,
                format!("${}", format_volume(entry.potential_total))
            );
        }
    }

    if !report.failures.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Could not fetch: {}", report.failed_ids().join(", "));
    }
    out
}

pub fn render_metrics(metrics: &ModelMetrics) -> String {
    let fmt_pct = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.1}%", v));

    let mut out = String::new();
    let _ = writeln!(out, "Model Health & Performance");
    let _ = writeln!(out, "Forecast accuracy: {}", fmt_pct(metrics.accuracy));
    let _ = writeln!(out, "Error rate (WMAPE): {}", fmt_pct(metrics.wmape));
    let _ = writeln!(out, "Model version:     {}", metrics.model_version);
    let _ = writeln!(out, "Last trained:      {}", metrics.last_trained.date());
    out
}
