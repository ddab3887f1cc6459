//! `analyze` subcommand.

use crate::input::load_dataset;
use anyhow::Context;
use log::info;
use std::fmt::Write;
use swi_data::{
    analysis::{analyze, AxisIntervals, MeshAnalysis},
    area_risk::{prefecture_risk_timelines, AreaRiskTimeline},
};
use swi_mesh::{Dataset, RiskLevel, SpacingConfig};
use swi_utils::time::format_ft_label;

/// Split a `PREFECTURE/AREA` selector.
pub fn parse_area_selector(selector: &str) -> anyhow::Result<(&str, &str)> {
    match selector.split_once('/') {
        Some((prefecture, area)) if !prefecture.is_empty() && !area.is_empty() => {
            Ok((prefecture, area))
        }
        _ => anyhow::bail!("Area must be given as PREFECTURE/AREA, got '{}'", selector),
    }
}

pub async fn run_analyze(
    input: &str,
    forecast_hour: u32,
    json: bool,
    area: Option<&str>,
) -> anyhow::Result<()> {
    let config = SpacingConfig::default();
    let dataset = load_dataset(input, &config).await?;
    let report = analyze(&dataset, forecast_hour, &config);
    info!(
        "{} meshes, {} at risk at FT{}, {} missing entries",
        report.mesh_count,
        report.risk_counts.at_risk(),
        forecast_hour,
        report.missing_entries
    );

    let mut timelines = prefecture_risk_timelines(&dataset);
    if let Some(selector) = area {
        let (prefecture, area_name) = parse_area_selector(selector)?;
        dataset
            .find_area(prefecture, area_name)
            .with_context(|| format!("No area {} in {}", selector, input))?;
        timelines.retain(|t| t.prefecture_code == prefecture && t.area_name == area_name);
    }

    if json {
        let out = serde_json::json!({
            "analysis": report,
            "areas": timelines,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_report(&report, &dataset, &timelines));
    }
    Ok(())
}

fn format_axis(out: &mut String, name: &str, axis: &AxisIntervals) {
    let _ = writeln!(
        out,
        "  {:<9} {} distinct, {} intervals, mean {}, min {}, mode {} (~{} km)",
        name,
        axis.distinct_values,
        axis.interval_count,
        fmt_opt(axis.mean),
        fmt_opt(axis.min),
        fmt_opt(axis.mode),
        axis.mode_km.map_or("-".to_string(), |km| format!("{:.3}", km)),
    );
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or("-".to_string(), |v| format!("{:.6}", v))
}

fn hour_label(dataset: &Dataset, ft: u32) -> String {
    match dataset.initial_time() {
        Some(initial) => format_ft_label(initial, ft),
        None => format!("FT{}", ft),
    }
}

/// Plain text rendering of an analysis report and area timelines.
pub fn format_report(
    report: &MeshAnalysis,
    dataset: &Dataset,
    timelines: &[AreaRiskTimeline],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Meshes: {}", report.mesh_count);
    if let Some(extent) = &report.extent {
        let _ = writeln!(
            out,
            "Extent: lat {:.4}..{:.4}, lon {:.4}..{:.4}",
            extent.min_lat, extent.max_lat, extent.min_lon, extent.max_lon
        );
    }
    let _ = writeln!(out, "Intervals:");
    format_axis(&mut out, "latitude", &report.latitude);
    format_axis(&mut out, "longitude", &report.longitude);
    let _ = writeln!(
        out,
        "Spacing: {:.6} x {:.6} deg",
        report.spacing.lat_interval, report.spacing.lon_interval
    );

    let prefixes: Vec<String> = report
        .code_prefix_counts
        .iter()
        .map(|(prefix, count)| format!("{}={}", prefix, count))
        .collect();
    let _ = writeln!(out, "Code prefixes: {}", prefixes.join(", "));

    let _ = writeln!(out, "Risk at {}:", hour_label(dataset, report.forecast_hour));
    for level in RiskLevel::ALL {
        let _ = writeln!(out, "  {:<9} {}", level.label(), report.risk_counts.get(level));
    }
    let _ = writeln!(out, "Missing entries: {}", report.missing_entries);
    let hours: Vec<String> = report.forecast_hours.iter().map(|h| h.to_string()).collect();
    let _ = writeln!(out, "Forecast hours: {}", hours.join(", "));
    let _ = writeln!(
        out,
        "Anomalies: {} misordered thresholds, {} ragged timelines",
        report.misordered_thresholds, report.ragged_timelines
    );

    let _ = writeln!(out, "Samples:");
    for sample in &report.samples {
        let t = &sample.thresholds;
        let head: Vec<String> = sample
            .timeline_head
            .iter()
            .map(|p| format!("FT{}: {:.1}", p.ft, p.value))
            .collect();
        let _ = writeln!(
            out,
            "  {} bounds {}/{}/{}{} value {:.1} ({}), {} steps: {}",
            sample.code,
            t.advisory,
            t.warning,
            t.disaster,
            if sample.thresholds_ordered { "" } else { " MISORDERED" },
            sample.value,
            sample.level,
            sample.timeline_len,
            head.join(", ")
        );
    }

    for timeline in timelines {
        let _ = writeln!(
            out,
            "{} / {} (peak {})",
            timeline.prefecture_name,
            timeline.area_name,
            timeline.peak()
        );
        for point in &timeline.timeline {
            let _ = writeln!(out, "  {}  {}", hour_label(dataset, point.ft), point.level);
        }
    }
    out
}
