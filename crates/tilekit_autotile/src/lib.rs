//! 47-tile blob autotile engine
//!
//! This crate turns a hand-drawn tileset into a complete blob atlas and keeps
//! autotiled grids consistent while they are edited.
//!
//! # Features
//! - Quadrant compositing of all 47 blob tile types, with every fragment combination as a variant
//! - Gated 8-neighbor masks, updated incrementally or recomputed in full
//! - Side (depth) tiles below ground and wall tops, with category priorities
//! - A lazily filled atlas cache keyed by tileset and category
//!
//! # Example
//!
//! ```rust,ignore
//! use tilekit_autotile::{AtlasCache, AutotilePainter, AutotileSettings};
//! use tilekit_core::{GridPos, TileGrid, TopCategory};
//!
//! let settings = AutotileSettings::default();
//! let painter = AutotilePainter::for_tileset_image("grass", &meta, &image, settings.clone());
//! let mut grid = TileGrid::new();
//! painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::Ground, &mut rng);
//!
//! let mut cache = AtlasCache::from_settings(&settings);
//! if let Some(atlas) = cache.get_or_generate("grass", TopCategory::Ground, &image, &config, tile_size) {
//!     let mask = grid.get(GridPos::new(5, 5)).and_then(|cell| cell.mask()).unwrap();
//!     let rect = atlas.tile_rect(atlas.atlas_index_for(mask, GridPos::new(5, 5)));
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod features;
pub mod generator;
pub mod geometry;
pub mod mask;
pub mod paint;
pub mod pixels;
pub mod recipe;
pub mod settings;
pub mod sides;
pub mod types;

// Re-export main types at crate root
pub use cache::{hash_string_to_seed, AtlasCache, AtlasKey, CachePolicy, CachedAtlas};
pub use config::{autotile_source_to_tileset_config, side_level_for_row, TilesetConfig};
pub use error::{AutotileError, Result};
pub use features::FeatureLibrary;
pub use generator::{
    append_textures_in_grid, generate_tileset, GeneratedTileset, DEFAULT_ATLAS_COLUMNS,
};
pub use geometry::{quadrant_rect, uv_rect_from_pixels, uv_rect_from_tile_index, UvRect, Vec2};
pub use mask::{
    blob_mask_from_neighbors, calculate_mask, gate_mask, neighbor_presence, neighbors,
    quadrant_neighbors, recompute_all_masks, refresh_mask, refresh_masks_around,
};
pub use paint::{AutotilePainter, SideSource};
pub use recipe::{atlas_order_index, required_features, StraightBorder, BLOB_TILE_FEATURE_MAP};
pub use settings::AutotileSettings;
pub use sides::{
    can_override, can_place_side_tile, category_priority, get_side_column_index,
    refresh_all_valid_tiles, refresh_valid_tiles, side_depth, should_block_side_placement,
    validate_side_tiles,
};
pub use types::{BlobTileType, NeighborPresence, TileFeatures, TileQuadrant, TopTileType, YLevel};
