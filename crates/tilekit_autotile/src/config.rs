//! Expanded tileset layout consumed by the generator
//!
//! [`TilesetConfig`] lists, for every source role, the tile-grid positions that
//! provide it. It is derived from the compact [`AutotileSourceConfig`] stored
//! in tileset metadata.

use crate::error::{AutotileError, Result};
use crate::types::{TopTileType, YLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilekit_core::{AutotileSourceConfig, Int2, SideCategory, SideSourceConfig};

/// Offsets of the bridge and inner-corner roles inside the 4x4 cross block
pub const CROSS_LAYOUT: [(TopTileType, Int2); 7] = [
    (TopTileType::VerticalBridgeTop, Int2::new(1, 0)),
    (TopTileType::HorizontalBridgeLeft, Int2::new(0, 1)),
    (TopTileType::InnerCorners, Int2::new(1, 1)),
    (TopTileType::HorizontalBridge, Int2::new(2, 1)),
    (TopTileType::HorizontalBridgeRight, Int2::new(3, 1)),
    (TopTileType::VerticalBridge, Int2::new(1, 2)),
    (TopTileType::VerticalBridgeBottom, Int2::new(1, 3)),
];

/// Source positions (in tiles) per role. Several positions give several variants.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetConfig {
    pub tile_size: Int2,
    #[serde(default)]
    pub top_textures: BTreeMap<TopTileType, Vec<Int2>>,
    #[serde(default)]
    pub side_textures: BTreeMap<YLevel, Vec<Int2>>,
}

impl TilesetConfig {
    pub fn new(tile_size: Int2) -> Self {
        Self {
            tile_size,
            top_textures: BTreeMap::new(),
            side_textures: BTreeMap::new(),
        }
    }

    pub fn top_positions(&self, role: TopTileType) -> &[Int2] {
        self.top_textures.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn side_positions(&self, level: YLevel) -> &[Int2] {
        self.side_textures.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push_top(&mut self, role: TopTileType, pos: Int2) {
        self.top_textures.entry(role).or_default().push(pos);
    }

    pub fn push_side(&mut self, level: YLevel, pos: Int2) {
        self.side_textures.entry(level).or_default().push(pos);
    }

    /// Add the valid tiles of a side strip, one depth level per row
    pub fn add_side_strip(
        &mut self,
        category: SideCategory,
        side: &SideSourceConfig,
    ) -> Result<()> {
        if !side.enabled {
            return Ok(());
        }
        for (row, cols) in side.valid_tiles.iter().enumerate() {
            let Some(level) = side_level_for_row(category, row) else {
                continue;
            };
            for (col, valid) in cols.iter().enumerate() {
                if *valid {
                    let pos =
                        offset_position(side.rect_origin, col as i32, row as i32, self.tile_size)?;
                    self.push_side(level, pos);
                }
            }
        }
        Ok(())
    }
}

/// `origin + (col, row)`, rejecting layouts that leave the i32 range
fn offset_position(origin: Int2, col: i32, row: i32, tile_size: Int2) -> Result<Int2> {
    origin
        .checked_add(Int2::new(col, row))
        .ok_or(AutotileError::TileOutOfRange {
            pos: origin,
            tile_size,
        })
}

/// Depth level a side strip row is packed under
pub fn side_level_for_row(category: SideCategory, row: usize) -> Option<YLevel> {
    match (category, row) {
        (SideCategory::WallSide, 0) => Some(YLevel::TopWallLayer),
        (SideCategory::WallSide, 1) => Some(YLevel::BottomWallLayer),
        (SideCategory::GroundSide, 0) => Some(YLevel::GroundLayer),
        (SideCategory::GroundSide, 1) => Some(YLevel::UndergroundLayer1),
        (SideCategory::GroundSide, 2) => Some(YLevel::UndergroundLayer2),
        (SideCategory::GroundSide, 3) => Some(YLevel::UndergroundLayer3),
        _ => None,
    }
}

/// Expand a rect + cross layout into per-role positions.
///
/// Corners sit at the rect's corners, `Top`/`Bottom` fill the first/last row
/// between them, `Left`/`Right` the first/last column of each interior row and
/// `Full` every interior cell. Side textures are left empty.
pub fn autotile_source_to_tileset_config(
    source: &AutotileSourceConfig,
    tile_size: Int2,
) -> Result<TilesetConfig> {
    if !source.has_valid_rect_size() {
        return Err(AutotileError::InvalidRectSize(source.rect_size));
    }

    let origin = source.rect_origin;
    let last_col = source.rect_size.x - 1;
    let last_row = source.rect_size.y - 1;
    let at = |col: i32, row: i32| offset_position(origin, col, row, tile_size);

    let mut config = TilesetConfig::new(tile_size);

    config.push_top(TopTileType::TopLeftCorner, at(0, 0)?);
    config.push_top(TopTileType::TopRightCorner, at(last_col, 0)?);
    config.push_top(TopTileType::BottomLeftCorner, at(0, last_row)?);
    config.push_top(TopTileType::BottomRightCorner, at(last_col, last_row)?);

    for col in 1..last_col {
        config.push_top(TopTileType::Top, at(col, 0)?);
        config.push_top(TopTileType::Bottom, at(col, last_row)?);
    }

    for row in 1..last_row {
        config.push_top(TopTileType::Left, at(0, row)?);
        config.push_top(TopTileType::Right, at(last_col, row)?);
        for col in 1..last_col {
            config.push_top(TopTileType::Full, at(col, row)?);
        }
    }

    for (role, offset) in CROSS_LAYOUT {
        let pos = offset_position(source.cross_origin, offset.x, offset.y, tile_size)?;
        config.push_top(role, pos);
    }

    if let Some(single) = source.single_tile {
        config.push_top(TopTileType::SingleTile, single);
    }

    Ok(config)
}
