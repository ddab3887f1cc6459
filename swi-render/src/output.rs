use crate::{error::Result, projection::TileCoord};
use image::{ImageFormat, RgbaImage};
use log::debug;
use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

/// `<root>/<z>/<x>/<y>.png`, the layout slippy-map clients request.
pub fn tile_path(root: &Path, tile: TileCoord) -> PathBuf {
    root.join(tile.z.to_string())
        .join(tile.x.to_string())
        .join(format!("{}.png", tile.y))
}

/// PNG bytes of a rendered tile.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Write `image` under `root` at the tile's path, creating directories.
pub fn write_tile_png(root: &Path, tile: TileCoord, image: &RgbaImage) -> Result<PathBuf> {
    let path = tile_path(root, tile);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, encode_png(image)?)?;
    debug!("Wrote {}", path.display());
    Ok(path)
}
