//! Feature library: source tiles sliced into per-feature quadrant fragments

use crate::config::TilesetConfig;
use crate::error::{AutotileError, Result};
use crate::pixels::{crop, slice_quadrant};
use crate::types::{TileFeatures, TopTileType, YLevel};
use image::RgbaImage;
use std::collections::{BTreeMap, HashMap};
use tilekit_core::{Int2, PixelRect};

/// Sliced source tiles and the fragments cut from them
#[derive(Debug, Clone, Default)]
pub struct FeatureLibrary {
    tile_size: Int2,
    sliced_top: BTreeMap<TopTileType, Vec<RgbaImage>>,
    sliced_side: BTreeMap<YLevel, Vec<RgbaImage>>,
    fragments: HashMap<TileFeatures, Vec<RgbaImage>>,
}

impl FeatureLibrary {
    /// Slice every configured role and level out of `source`.
    ///
    /// Roles are visited in [`TopTileType::ALL`] order and positions in config
    /// order, so fragment lists are reproducible.
    pub fn build(source: &RgbaImage, config: &TilesetConfig) -> Result<Self> {
        let tile_size = config.tile_size;
        if tile_size.x <= 0 || tile_size.y <= 0 {
            return Err(AutotileError::EmptyTileSize(tile_size));
        }
        if !tile_size.is_even() {
            return Err(AutotileError::OddTileSize(tile_size));
        }

        let mut library = FeatureLibrary {
            tile_size,
            ..Default::default()
        };

        for role in TopTileType::ALL {
            for &pos in config.top_positions(role) {
                let tile = crop_tile(source, pos, tile_size)?;
                for &feature in role.features() {
                    let fragment = slice_quadrant(&tile, feature.quadrant(), tile_size)?;
                    library.fragments.entry(feature).or_default().push(fragment);
                }
                library.sliced_top.entry(role).or_default().push(tile);
            }
        }

        for level in YLevel::ALL {
            for &pos in config.side_positions(level) {
                let tile = crop_tile(source, pos, tile_size)?;
                library.sliced_side.entry(level).or_default().push(tile);
            }
        }

        Ok(library)
    }

    pub fn tile_size(&self) -> Int2 {
        self.tile_size
    }

    /// Candidate fragments for a feature, empty when no role provides it
    pub fn fragments(&self, feature: TileFeatures) -> &[RgbaImage] {
        self.fragments.get(&feature).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sliced_top(&self, role: TopTileType) -> &[RgbaImage] {
        self.sliced_top.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sliced_side(&self, level: YLevel) -> &[RgbaImage] {
        self.sliced_side.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base fill for composited tiles: the first `Full` fragment
    pub fn full_base(&self) -> Option<&RgbaImage> {
        self.fragments(TileFeatures::Full).first()
    }
}

/// Tile-grid position to pixels; margin and spacing are not applied
fn crop_tile(source: &RgbaImage, pos: Int2, tile_size: Int2) -> Result<RgbaImage> {
    let origin = pos
        .checked_scale(tile_size)
        .ok_or(AutotileError::TileOutOfRange { pos, tile_size })?;
    crop(source, PixelRect::from_origin_size(origin, tile_size))
}
