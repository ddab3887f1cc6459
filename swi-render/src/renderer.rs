//! Tile renderer lifecycle.
//!
//! A [`TileRenderer`] holds no surface and can do nothing but
//! [`TileRenderer::attach`]. Attaching yields an [`AttachedRenderer`] which
//! tracks its inputs (dataset, forecast hour, tile) and repaints only when
//! one of them actually changed. [`AttachedRenderer::detach`] hands the
//! surface back and returns to the unattached state.

use crate::{
    projection::{tile_bounds, Projection, TileCoord},
    select::{cell_bounds, select_visible},
    style::RenderStyle,
    surface::{PixelRect, RenderSurface},
};
use log::{debug, warn};
use std::sync::Arc;
use swi_mesh::{Dataset, RiskLevel};

/// Counters from one repaint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Cells intersecting the tile
    pub visible: usize,
    /// Cells drawn
    pub painted: usize,
    pub skipped_normal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedrawOutcome {
    /// Inputs unchanged since the last repaint; the surface was not touched.
    Unchanged,
    Painted(PaintStats),
}

/// Renderer inputs, kept across attach and detach.
#[derive(Debug, Clone)]
struct Inputs {
    dataset: Option<Arc<Dataset>>,
    forecast_hour: u32,
    tile: Option<TileCoord>,
}

/// A renderer with no surface.
#[derive(Debug, Clone)]
pub struct TileRenderer<P> {
    projection: P,
    style: RenderStyle,
    inputs: Inputs,
}

impl<P: Projection> TileRenderer<P> {
    pub fn new(projection: P) -> TileRenderer<P> {
        TileRenderer {
            projection,
            style: RenderStyle::default(),
            inputs: Inputs {
                dataset: None,
                forecast_hour: 0,
                tile: None,
            },
        }
    }

    pub fn with_style(mut self, style: RenderStyle) -> TileRenderer<P> {
        self.style = style;
        self
    }

    /// Take ownership of `surface`. The renderer starts dirty, so the first
    /// [`AttachedRenderer::redraw`] always paints.
    pub fn attach<S: RenderSurface>(self, surface: S) -> AttachedRenderer<P, S> {
        AttachedRenderer {
            projection: self.projection,
            style: self.style,
            inputs: self.inputs,
            surface,
            dirty: true,
        }
    }
}

/// A renderer bound to a surface.
#[derive(Debug)]
pub struct AttachedRenderer<P, S> {
    projection: P,
    style: RenderStyle,
    inputs: Inputs,
    surface: S,
    dirty: bool,
}

impl<P: Projection, S: RenderSurface> AttachedRenderer<P, S> {
    /// Swap in a dataset and forecast hour.
    ///
    /// The previous dataset is released here; a later redraw only ever sees
    /// the latest one. Passing the same `Arc` and hour again is a no-op.
    pub fn update_data(&mut self, dataset: Arc<Dataset>, forecast_hour: u32) {
        let same_dataset = self
            .inputs
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));
        if same_dataset && self.inputs.forecast_hour == forecast_hour {
            return;
        }
        self.inputs.dataset = Some(dataset);
        self.inputs.forecast_hour = forecast_hour;
        self.dirty = true;
    }

    pub fn set_forecast_hour(&mut self, forecast_hour: u32) {
        if self.inputs.forecast_hour != forecast_hour {
            self.inputs.forecast_hour = forecast_hour;
            self.dirty = true;
        }
    }

    pub fn set_viewport(&mut self, tile: TileCoord) {
        if self.inputs.tile != Some(tile) {
            self.inputs.tile = Some(tile);
            self.dirty = true;
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn forecast_hour(&self) -> u32 {
        self.inputs.forecast_hour
    }

    pub fn viewport(&self) -> Option<TileCoord> {
        self.inputs.tile
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Repaint the surface if any input changed since the last repaint.
    ///
    /// Without a dataset or a tile the surface is cleared and nothing is
    /// drawn.
    pub fn redraw(&mut self) -> RedrawOutcome {
        if !self.dirty {
            return RedrawOutcome::Unchanged;
        }
        self.surface.clear();
        let stats = match (self.inputs.dataset.as_deref(), self.inputs.tile) {
            (Some(dataset), Some(tile)) => paint(
                &self.projection,
                &self.style,
                &mut self.surface,
                dataset,
                self.inputs.forecast_hour,
                tile,
            ),
            _ => PaintStats::default(),
        };
        self.dirty = false;
        debug!(
            "Redraw {:?} FT{}: {} visible, {} painted, {} normal",
            self.inputs.tile,
            self.inputs.forecast_hour,
            stats.visible,
            stats.painted,
            stats.skipped_normal
        );
        RedrawOutcome::Painted(stats)
    }

    /// Release the surface. Dataset, hour and tile are kept for the next
    /// attach.
    pub fn detach(self) -> (TileRenderer<P>, S) {
        (
            TileRenderer {
                projection: self.projection,
                style: self.style,
                inputs: self.inputs,
            },
            self.surface,
        )
    }
}

fn paint<P: Projection, S: RenderSurface>(
    projection: &P,
    style: &RenderStyle,
    surface: &mut S,
    dataset: &Dataset,
    forecast_hour: u32,
    tile: TileCoord,
) -> PaintStats {
    let mut stats = PaintStats::default();
    let tile_size = projection.tile_size();
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        warn!("Surface is {}x{}, nothing to paint on", width, height);
        return stats;
    }
    if (width, height) != (tile_size, tile_size) {
        debug!("Scaling {}px tile onto {}x{} surface", tile_size, width, height);
    }
    // world pixels to surface pixels
    let scale_x = width as f64 / tile_size as f64;
    let scale_y = height as f64 / tile_size as f64;
    let origin_x = tile.x as i64 * width as i64;
    let origin_y = tile.y as i64 * height as i64;

    let viewport = tile_bounds(projection, tile);
    let index = dataset.time_index();
    for mesh in select_visible(dataset.meshes(), dataset.spacing(), &viewport) {
        stats.visible += 1;
        let level = mesh.risk_at(index, forecast_hour);
        if level == RiskLevel::Normal {
            stats.skipped_normal += 1;
            continue;
        }
        let cell = cell_bounds(mesh, dataset.spacing());
        // round in world pixels so neighbouring tiles agree on every edge
        let nw = projection.project(cell.north, cell.west, tile.z);
        let se = projection.project(cell.south, cell.east, tile.z);
        let rect = PixelRect::from_edges(
            (nw.x * scale_x).round() as i64 - origin_x,
            (nw.y * scale_y).round() as i64 - origin_y,
            (se.x * scale_x).round() as i64 - origin_x,
            (se.y * scale_y).round() as i64 - origin_y,
        );
        surface.fill_rect(rect, style.color_for(level));
        surface.stroke_rect(rect, style.border);
        stats.painted += 1;
    }
    stats
}
