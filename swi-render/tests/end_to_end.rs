use image::{ImageBuffer, Rgba, RgbaImage};
use std::sync::Arc;
use swi_mesh::{classify, Dataset, Mesh, RiskLevel, SpacingConfig, TimeSeriesPoint};
use swi_render::{
    projection::{tile_containing, tiles_covering},
    select_visible, GeoBounds, PaintStats, Projection, RedrawOutcome, RenderStyle, TileCoord,
    TileRenderer, WebMercator,
};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

fn mesh(code: &str, lat: f64, lon: f64, value: f64) -> Mesh {
    Mesh {
        code: code.to_string(),
        lat,
        lon,
        advisory_bound: 10.0,
        warning_bound: 20.0,
        disaster_bound: 30.0,
        swi_timeline: vec![TimeSeriesPoint::new(0, value), TimeSeriesPoint::new(3, 0.0)],
        rain_timeline: Vec::new(),
    }
}

fn grid() -> Dataset {
    Dataset::new(
        vec![
            mesh("m1", 34.70, 135.50, 5.0),
            mesh("m2", 34.70, 135.51, 15.0),
            mesh("m3", 34.71, 135.50, 25.0),
            mesh("m4", 34.71, 135.51, 35.0),
        ],
        &SpacingConfig::default(),
    )
}

fn blank() -> RgbaImage {
    ImageBuffer::from_pixel(256, 256, TRANSPARENT)
}

/// Pixel inside the tile at the mesh center.
fn center_pixel(tile: TileCoord, mesh: &Mesh) -> (u32, u32) {
    let projection = WebMercator::default();
    let p = projection.project(mesh.lat, mesh.lon, tile.z);
    let size = projection.tile_size() as f64;
    (
        (p.x - tile.x as f64 * size).floor() as u32,
        (p.y - tile.y as f64 * size).floor() as u32,
    )
}

#[test]
fn test_two_by_two_grid() {
    let dataset = Arc::new(grid());

    // spacing and classification
    assert_eq!(dataset.spacing().lat_interval, 0.01);
    assert_eq!(dataset.spacing().lon_interval, 0.01);
    let levels: Vec<RiskLevel> = dataset
        .meshes()
        .iter()
        .map(|m| classify(m.value_at(dataset.time_index(), 0), &m.thresholds()))
        .collect();
    assert_eq!(
        levels,
        vec![RiskLevel::Normal, RiskLevel::Caution, RiskLevel::Warning, RiskLevel::Disaster]
    );

    // southwest quadrant only
    let southwest = GeoBounds::new(34.696, 135.496, 34.704, 135.504);
    let selected: Vec<&str> = select_visible(dataset.meshes(), dataset.spacing(), &southwest)
        .map(|m| m.code.as_str())
        .collect();
    assert_eq!(selected, vec!["m1"]);

    // three rectangles painted, the normal cell left transparent
    let tile = tile_containing(&WebMercator::default(), 34.705, 135.505, 12);
    let mut renderer = TileRenderer::new(WebMercator::default()).attach(blank());
    renderer.update_data(Arc::clone(&dataset), 0);
    renderer.set_viewport(tile);
    assert_eq!(
        renderer.redraw(),
        RedrawOutcome::Painted(PaintStats {
            visible: 4,
            painted: 3,
            skipped_normal: 1
        })
    );

    let style = RenderStyle::default();
    let image = renderer.surface();
    let expected = [
        TRANSPARENT,
        style.color_for(RiskLevel::Caution),
        style.color_for(RiskLevel::Warning),
        style.color_for(RiskLevel::Disaster),
    ];
    for (m, color) in dataset.meshes().iter().zip(expected.iter()) {
        let (x, y) = center_pixel(tile, m);
        assert_eq!(image.get_pixel(x, y), color, "mesh {}", m.code);
    }
}

#[test]
fn test_redraw_is_idempotent() {
    let dataset = Arc::new(grid());
    let tile = tile_containing(&WebMercator::default(), 34.705, 135.505, 12);
    let mut renderer = TileRenderer::new(WebMercator::default()).attach(blank());
    renderer.update_data(Arc::clone(&dataset), 0);
    renderer.set_viewport(tile);
    renderer.redraw();
    let first = renderer.surface().clone();

    assert_eq!(renderer.redraw(), RedrawOutcome::Unchanged);
    assert_eq!(renderer.surface(), &first);

    // away and back forces two full repaints
    renderer.set_viewport(TileCoord::new(tile.x + 1, tile.y, tile.z));
    renderer.redraw();
    assert_ne!(renderer.surface(), &first);
    renderer.set_viewport(tile);
    renderer.redraw();
    assert_eq!(renderer.surface(), &first);

    // another hour, then back to FT0
    renderer.update_data(Arc::clone(&dataset), 3);
    renderer.redraw();
    assert!(renderer.surface().pixels().all(|p| *p == TRANSPARENT));
    renderer.update_data(Arc::clone(&dataset), 0);
    renderer.redraw();
    assert_eq!(renderer.surface(), &first);
}

#[test]
fn test_new_dataset_replaces_old() {
    let tile = tile_containing(&WebMercator::default(), 34.705, 135.505, 12);
    let old = Arc::new(grid());
    let mut renderer = TileRenderer::new(WebMercator::default()).attach(blank());
    renderer.update_data(Arc::clone(&old), 0);
    renderer.set_viewport(tile);
    renderer.redraw();

    let calm = Arc::new(Dataset::new(
        vec![mesh("m1", 34.70, 135.50, 1.0), mesh("m4", 34.71, 135.51, 1.0)],
        &SpacingConfig::default(),
    ));
    renderer.update_data(calm, 0);
    assert_eq!(Arc::strong_count(&old), 1);
    match renderer.redraw() {
        RedrawOutcome::Painted(stats) => assert_eq!(stats.painted, 0),
        RedrawOutcome::Unchanged => panic!("new dataset must repaint"),
    }
    assert!(renderer.surface().pixels().all(|p| *p == TRANSPARENT));
}

#[test]
fn test_cell_across_tile_edge_matches_on_both_sides() {
    let projection = WebMercator::default();
    let zoom = 12;
    // a cell centered on a tile boundary
    let boundary = projection.unproject(
        swi_render::PixelPoint {
            x: 3590.0 * 256.0,
            y: 1626.5 * 256.0,
        },
        zoom,
    );
    let dataset = Arc::new(Dataset::new(
        vec![
            mesh("edge", boundary.0, boundary.1, 35.0),
            mesh("other", boundary.0 + 0.01, boundary.1, 35.0),
        ],
        &SpacingConfig::default(),
    ));
    let extent = GeoBounds::new(
        boundary.0 - 0.005,
        boundary.1 - 0.005,
        boundary.0 + 0.015,
        boundary.1 + 0.005,
    );
    let tiles = tiles_covering(&projection, &extent, zoom);
    assert!(tiles.contains(&TileCoord::new(3589, 1626, zoom)));
    assert!(tiles.contains(&TileCoord::new(3590, 1626, zoom)));

    let mut painted = Vec::new();
    let mut renderer = TileRenderer::new(projection).attach(blank());
    renderer.update_data(dataset, 0);
    for tile in [TileCoord::new(3589, 1626, zoom), TileCoord::new(3590, 1626, zoom)] {
        renderer.set_viewport(tile);
        match renderer.redraw() {
            RedrawOutcome::Painted(stats) => painted.push(stats.painted),
            RedrawOutcome::Unchanged => panic!("viewport change must repaint"),
        }
    }
    assert_eq!(painted, vec![2, 2]);
}

#[test]
fn test_smaller_surface_is_scaled() {
    let dataset = Arc::new(grid());
    let tile = tile_containing(&WebMercator::default(), 34.705, 135.505, 12);
    let mut renderer = TileRenderer::new(WebMercator::default())
        .attach(ImageBuffer::from_pixel(128, 128, TRANSPARENT));
    renderer.update_data(Arc::clone(&dataset), 0);
    renderer.set_viewport(tile);
    renderer.redraw();

    let style = RenderStyle::default();
    let image: &RgbaImage = renderer.surface();
    assert_eq!(image.dimensions(), (128, 128));
    let expected = [
        TRANSPARENT,
        style.color_for(RiskLevel::Caution),
        style.color_for(RiskLevel::Warning),
        style.color_for(RiskLevel::Disaster),
    ];
    for (m, color) in dataset.meshes().iter().zip(expected.iter()) {
        let (x, y) = center_pixel(tile, m);
        assert_eq!(image.get_pixel(x / 2, y / 2), color, "mesh {}", m.code);
    }
}
