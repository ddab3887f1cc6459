use crate::bounds::GeoBounds;
use std::f64::consts::PI;

/// Latitude limit of the square Web Mercator world.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.05112878;

/// Position in world pixels at some zoom level (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

/// Slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> TileCoord {
        TileCoord { x, y, z }
    }
}

/// Geographic to world-pixel mapping supplied by the map host.
pub trait Projection {
    /// Edge length of a square tile in pixels.
    fn tile_size(&self) -> u32;

    fn project(&self, lat: f64, lon: f64, zoom: u8) -> PixelPoint;

    /// Inverse of [`Projection::project`], returns `(lat, lon)`.
    fn unproject(&self, point: PixelPoint, zoom: u8) -> (f64, f64);

    /// World edge length in pixels at `zoom`.
    fn world_size(&self, zoom: u8) -> f64 {
        self.tile_size() as f64 * 2f64.powi(zoom as i32)
    }
}

/// Spherical Web Mercator (EPSG:3857), as used by slippy-map tile servers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    pub tile_size: u32,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self { tile_size: 256 }
    }
}

impl Projection for WebMercator {
    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn project(&self, lat: f64, lon: f64, zoom: u8) -> PixelPoint {
        let world = self.world_size(zoom);
        let lat = lat.clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG).to_radians();
        let merc = (PI / 4.0 + lat / 2.0).tan().ln();
        PixelPoint {
            x: (lon + 180.0) / 360.0 * world,
            y: (0.5 - merc / (2.0 * PI)) * world,
        }
    }

    fn unproject(&self, point: PixelPoint, zoom: u8) -> (f64, f64) {
        let world = self.world_size(zoom);
        let lon = point.x / world * 360.0 - 180.0;
        let merc = PI * (1.0 - 2.0 * point.y / world);
        let lat = (2.0 * merc.exp().atan() - PI / 2.0).to_degrees();
        (lat, lon)
    }
}

fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom.min(31)
}

/// Geographic rectangle covered by `tile`.
pub fn tile_bounds<P: Projection + ?Sized>(projection: &P, tile: TileCoord) -> GeoBounds {
    let size = projection.tile_size() as f64;
    let nw = PixelPoint {
        x: tile.x as f64 * size,
        y: tile.y as f64 * size,
    };
    let se = PixelPoint {
        x: nw.x + size,
        y: nw.y + size,
    };
    let (north, west) = projection.unproject(nw, tile.z);
    let (south, east) = projection.unproject(se, tile.z);
    GeoBounds::new(south, west, north, east)
}

fn tile_index(pixel: f64, size: f64, zoom: u8) -> u32 {
    let max = tiles_per_axis(zoom) - 1;
    let index = (pixel / size).floor();
    if index <= 0.0 {
        0
    } else {
        (index as u32).min(max)
    }
}

/// Tile holding the point, clamped to the world.
pub fn tile_containing<P: Projection + ?Sized>(
    projection: &P,
    lat: f64,
    lon: f64,
    zoom: u8,
) -> TileCoord {
    let size = projection.tile_size() as f64;
    let p = projection.project(lat, lon, zoom);
    TileCoord {
        x: tile_index(p.x, size, zoom),
        y: tile_index(p.y, size, zoom),
        z: zoom,
    }
}

/// Every tile at `zoom` that overlaps `bounds`, row by row from the north-west.
/// Number of tiles [`tiles_covering`] would return, without listing them.
pub fn tile_count_covering<P: Projection + ?Sized>(
    projection: &P,
    bounds: &GeoBounds,
    zoom: u8,
) -> u64 {
    let nw = tile_containing(projection, bounds.north, bounds.west, zoom);
    let se = tile_containing(projection, bounds.south, bounds.east, zoom);
    (se.x as u64 - nw.x as u64 + 1) * (se.y as u64 - nw.y as u64 + 1)
}

pub fn tiles_covering<P: Projection + ?Sized>(
    projection: &P,
    bounds: &GeoBounds,
    zoom: u8,
) -> Vec<TileCoord> {
    let nw = tile_containing(projection, bounds.north, bounds.west, zoom);
    let se = tile_containing(projection, bounds.south, bounds.east, zoom);
    let mut tiles = Vec::new();
    for y in nw.y..=se.y {
        for x in nw.x..=se.x {
            tiles.push(TileCoord { x, y, z: zoom });
        }
    }
    tiles
}
