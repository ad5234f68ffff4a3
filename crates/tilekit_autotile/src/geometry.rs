//! Quadrant rectangles and normalized UV rectangles

use crate::types::TileQuadrant;
use tilekit_core::{Int2, PixelRect};

/// Pixel rect of a quadrant inside a tile whose top-left is at (0, 0).
///
/// Quadrants are `tile_size / 2` (floor); callers reject odd sizes beforehand.
pub fn quadrant_rect(quadrant: TileQuadrant, tile_size: Int2) -> PixelRect {
    let half = tile_size.half();
    match quadrant {
        TileQuadrant::Q1 => PixelRect::new(0, 0, half.x, half.y),
        TileQuadrant::Q2 => PixelRect::new(half.x, 0, half.x, half.y),
        TileQuadrant::Q3 => PixelRect::new(0, half.y, half.x, half.y),
        TileQuadrant::Q4 => PixelRect::new(half.x, half.y, half.x, half.y),
        TileQuadrant::All => PixelRect::new(0, 0, tile_size.x, tile_size.y),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Normalized texture rectangle with a bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
    pub uv00: Vec2,
    pub uv10: Vec2,
    pub uv01: Vec2,
    pub uv11: Vec2,
}

impl UvRect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            uv00: Vec2::new(min.x, min.y),
            uv10: Vec2::new(max.x, min.y),
            uv01: Vec2::new(min.x, max.y),
            uv11: Vec2::new(max.x, max.y),
        }
    }

    /// The same rectangle expressed with a top-left origin
    pub fn flipped_y(&self) -> Self {
        Self::from_min_max(
            Vec2::new(self.min.x, 1.0 - self.max.y),
            Vec2::new(self.max.x, 1.0 - self.min.y),
        )
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Convert a top-left pixel rect to bottom-left-origin UVs (`y' = 1 - (y + h) / tex_h`)
pub fn uv_rect_from_pixels(top_left: Int2, size: Int2, tex_w: u32, tex_h: u32) -> UvRect {
    let tex_w = tex_w as f32;
    let tex_h = tex_h as f32;
    let min = Vec2::new(
        top_left.x as f32 / tex_w,
        1.0 - (top_left.y + size.y) as f32 / tex_h,
    );
    let max = Vec2::new(
        (top_left.x + size.x) as f32 / tex_w,
        1.0 - top_left.y as f32 / tex_h,
    );
    UvRect::from_min_max(min, max)
}

/// UVs of the cell at `tile_xy` in a grid of `tile_size` cells
pub fn uv_rect_from_tile_index(tile_xy: Int2, tile_size: Int2, tex_w: u32, tex_h: u32) -> UvRect {
    uv_rect_from_pixels(tile_xy.scale(tile_size), tile_size, tex_w, tex_h)
}
