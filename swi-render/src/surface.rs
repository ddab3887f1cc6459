use image::{Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut},
    rect::Rect,
};

/// Rectangle in surface pixels. May extend past the surface; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Rectangle between two edges, at least one pixel in each direction.
    pub fn from_edges(left: i64, top: i64, right: i64, bottom: i64) -> PixelRect {
        PixelRect {
            x: left as i32,
            y: top as i32,
            width: (right - left).max(1) as u32,
            height: (bottom - top).max(1) as u32,
        }
    }
}

impl From<PixelRect> for Rect {
    fn from(r: PixelRect) -> Rect {
        Rect::at(r.x, r.y).of_size(r.width.max(1), r.height.max(1))
    }
}

/// Something the renderer can paint a tile on.
pub trait RenderSurface {
    fn dimensions(&self) -> (u32, u32);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>);

    /// One pixel outline.
    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>);
}

impl RenderSurface for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn clear(&mut self) {
        for pixel in self.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        draw_filled_rect_mut(self, rect.into(), color);
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba<u8>) {
        draw_hollow_rect_mut(self, rect.into(), color);
    }
}
