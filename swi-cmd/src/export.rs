//! `export` subcommand: per-mesh values and levels as CSV.

use crate::input::load_dataset;
use anyhow::Context;
use log::info;
use serde::Serialize;
use std::io::Write;
use swi_mesh::{Dataset, RiskLevel, SpacingConfig};

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    code: &'a str,
    lat: f64,
    lon: f64,
    ft: u32,
    swi: f64,
    level: RiskLevel,
}

/// Write `code,lat,lon,ft,swi,level` rows for every mesh at each of `hours`.
///
/// Rows are grouped by mesh, hours in the given order. Returns the row count.
pub fn write_export<W: Write>(
    dataset: &Dataset,
    hours: &[u32],
    writer: W,
) -> anyhow::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let index = dataset.time_index();
    let mut rows = 0usize;
    for mesh in dataset.meshes() {
        for &ft in hours {
            csv_writer.serialize(ExportRow {
                code: &mesh.code,
                lat: mesh.lat,
                lon: mesh.lon,
                ft,
                swi: mesh.value_at(index, ft),
                level: mesh.risk_at(index, ft),
            })?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    Ok(rows)
}

pub async fn run_export(
    input: &str,
    output: &str,
    forecast_hour: Option<u32>,
) -> anyhow::Result<()> {
    let dataset = load_dataset(input, &SpacingConfig::default()).await?;
    let hours: Vec<u32> = match forecast_hour {
        Some(ft) => vec![ft],
        None => dataset.time_index().hours().to_vec(),
    };
    let mut buffer = Vec::new();
    let rows = write_export(&dataset, &hours, &mut buffer)?;
    tokio::fs::write(output, buffer)
        .await
        .with_context(|| format!("Failed to write {}", output))?;
    info!("Exported {} rows ({} hours) to {}", rows, hours.len(), output);
    Ok(())
}
