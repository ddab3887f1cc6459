//! `render` subcommand: write PNG tiles covering the dataset.

use crate::input::load_dataset;
use anyhow::Context;
use image::{ImageBuffer, Rgba, RgbaImage};
use log::{info, warn};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use swi_mesh::{Dataset, SpacingConfig};
use swi_render::{
    output::write_tile_png,
    projection::{tile_count_covering, tiles_covering},
    GeoBounds, RedrawOutcome, TileCoord, TileRenderer, WebMercator,
};

/// Geographic area covered by all mesh cells, `None` for an empty dataset.
pub fn dataset_bounds(dataset: &Dataset) -> Option<GeoBounds> {
    let extent = dataset.geo_extent()?;
    let spacing = dataset.spacing();
    Some(GeoBounds::new(
        extent.min_lat - spacing.half_lat(),
        extent.min_lon - spacing.half_lon(),
        extent.max_lat + spacing.half_lat(),
        extent.max_lon + spacing.half_lon(),
    ))
}

/// Deepest zoom accepted by `render`.
pub const MAX_ZOOM: u8 = 22;

/// Upper bound on tiles written by a single `render` run.
pub const MAX_TILES: u64 = 16_384;

/// Tiles rendered concurrently per batch.
const RENDER_BATCH: usize = 64;

/// Tiles covering `bounds` at `zoom`, refusing runs that would be too large.
pub fn plan_tiles(
    projection: &WebMercator,
    bounds: &GeoBounds,
    zoom: u8,
) -> anyhow::Result<Vec<TileCoord>> {
    if zoom > MAX_ZOOM {
        anyhow::bail!("Zoom {} is above the maximum of {}", zoom, MAX_ZOOM);
    }
    let count = tile_count_covering(projection, bounds, zoom);
    if count > MAX_TILES {
        anyhow::bail!(
            "Zoom {} needs {} tiles, more than the limit of {}; use a lower zoom",
            zoom,
            count,
            MAX_TILES
        );
    }
    Ok(tiles_covering(projection, bounds, zoom))
}

/// Render one tile and write it if anything was painted.
pub fn render_tile(
    dataset: Arc<Dataset>,
    forecast_hour: u32,
    tile: TileCoord,
    tile_size: u32,
    output_dir: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    let surface: RgbaImage = ImageBuffer::from_pixel(tile_size, tile_size, Rgba([0, 0, 0, 0]));
    let mut renderer = TileRenderer::new(WebMercator { tile_size }).attach(surface);
    renderer.update_data(dataset, forecast_hour);
    renderer.set_viewport(tile);
    let painted = match renderer.redraw() {
        RedrawOutcome::Painted(stats) => stats.painted,
        RedrawOutcome::Unchanged => 0,
    };
    if painted == 0 {
        return Ok(None);
    }
    let (_, image) = renderer.detach();
    let path = write_tile_png(output_dir, tile, &image)
        .with_context(|| format!("Failed to write tile {:?}", tile))?;
    Ok(Some(path))
}

pub async fn run_render(
    input: &str,
    forecast_hour: u32,
    zoom: u8,
    output_dir: &str,
    tile_size: u32,
) -> anyhow::Result<()> {
    if tile_size == 0 {
        anyhow::bail!("Tile size must be positive");
    }
    let dataset = load_dataset(input, &SpacingConfig::default()).await?;
    if dataset.time_index().lookup(forecast_hour).is_none() {
        warn!(
            "FT{} is not in the forecast ({:?}); every mesh will read as 0",
            forecast_hour,
            dataset.time_index().hours()
        );
    }
    let bounds = match dataset_bounds(&dataset) {
        Some(bounds) => bounds,
        None => {
            warn!("{} has no meshes, nothing to render", input);
            return Ok(());
        }
    };
    let projection = WebMercator { tile_size };
    let tiles = plan_tiles(&projection, &bounds, zoom)?;
    info!(
        "Rendering {} tiles at zoom {} for FT{} into {}",
        tiles.len(),
        zoom,
        forecast_hour,
        output_dir
    );

    // meshes are read-only, every tile shares the same snapshot
    let mut written = 0usize;
    let mut empty = 0usize;
    for batch in tiles.chunks(RENDER_BATCH) {
        let mut handles = Vec::with_capacity(batch.len());
        for &tile in batch {
            let dataset = Arc::clone(&dataset);
            let output_dir = PathBuf::from(output_dir);
            handles.push(tokio::task::spawn_blocking(move || {
                render_tile(dataset, forecast_hour, tile, tile_size, &output_dir)
            }));
        }
        for handle in handles {
            match handle.await?? {
                Some(_) => written += 1,
                None => empty += 1,
            }
        }
    }
    info!("Wrote {} tiles, skipped {} empty tiles", written, empty);
    Ok(())
}
