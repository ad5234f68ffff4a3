//! Error type for atlas generation and settings loading

use tilekit_core::{Int2, PixelRect};
use thiserror::Error;

/// Errors raised by the autotile engine.
///
/// Everything except `Io`/`Settings` means the tileset configuration does not
/// fit the source image; generation of that atlas is abandoned as a whole.
#[derive(Debug, Error)]
pub enum AutotileError {
    #[error("Tile size must be divisible by 2, got {0}")]
    OddTileSize(Int2),

    #[error("Tile size must be positive, got {0}")]
    EmptyTileSize(Int2),

    #[error("Tile position {pos} is out of pixel range for {tile_size} tiles")]
    TileOutOfRange { pos: Int2, tile_size: Int2 },

    #[error("Atlas of {tiles} tiles in {columns} columns exceeds image size limits")]
    AtlasTooLarge { tiles: usize, columns: usize },

    #[error("Crop out of bounds: {rect} in {width}x{height} image")]
    CropOutOfBounds {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    #[error("Blit out of bounds: {src_w}x{src_h} at {pos} into {dst_w}x{dst_h} image")]
    BlitOutOfBounds {
        pos: Int2,
        src_w: u32,
        src_h: u32,
        dst_w: u32,
        dst_h: u32,
    },

    #[error("Rect block must be at least 3x2 tiles, got {0}")]
    InvalidRectSize(Int2),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Settings(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AutotileError>;
