//! Compact, user-editable autotile layout stored in tileset metadata
//!
//! A top category is described by a rect block (corners, edges, full tiles) and
//! a 4x4 cross block (bridges and inner corners). Side categories are a plain
//! 5-column strip with one row per depth level.

use crate::geometry::Int2;
use crate::layer::{SideCategory, TopCategory};
use serde::{Deserialize, Serialize};

/// Columns in every side strip
pub const SIDE_COLUMNS: usize = 5;
/// Rows in the wall-side strip
pub const WALL_SIDE_ROWS: usize = 2;
/// Rows in the ground-side strip
pub const GROUND_SIDE_ROWS: usize = 4;

/// Smallest rect block that still has corners and an edge row
pub const MIN_RECT_SIZE: Int2 = Int2::new(3, 2);

/// Rect + cross layout for one top category (`ground` or `wallTop`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutotileSourceConfig {
    pub enabled: bool,
    /// Top-left tile of the rect block
    pub rect_origin: Int2,
    /// Rect block size in tiles (cols x rows)
    pub rect_size: Int2,
    /// Top-left tile of the 4x4 cross block
    pub cross_origin: Int2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_tile: Option<Int2>,
}

impl AutotileSourceConfig {
    pub fn default_ground() -> Self {
        Self {
            enabled: true,
            rect_origin: Int2::new(0, 5),
            rect_size: Int2::new(5, 4),
            cross_origin: Int2::new(6, 5),
            single_tile: Some(Int2::new(11, 4)),
        }
    }

    pub fn default_wall_top() -> Self {
        Self {
            enabled: true,
            rect_origin: Int2::new(0, 0),
            rect_size: Int2::new(5, 3),
            cross_origin: Int2::new(6, 0),
            single_tile: Some(Int2::new(11, 2)),
        }
    }

    pub fn default_for(category: TopCategory) -> Self {
        match category {
            TopCategory::Ground => Self::default_ground(),
            TopCategory::WallTop => Self::default_wall_top(),
        }
    }

    /// Whether the rect block is at least 3x2 tiles
    pub fn has_valid_rect_size(&self) -> bool {
        self.rect_size.x >= MIN_RECT_SIZE.x && self.rect_size.y >= MIN_RECT_SIZE.y
    }
}

/// A 5-column strip of side tiles, one row per depth level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideSourceConfig {
    pub enabled: bool,
    pub rect_origin: Int2,
    /// `valid_tiles[row][col]`: whether the source tile has any visible pixel
    #[serde(default)]
    pub valid_tiles: Vec<Vec<bool>>,
}

/// Wall faces: 5 columns x 2 rows
pub type WallSideConfig = SideSourceConfig;
/// Ground cliffs / underground: 5 columns x 4 rows
pub type GroundSideConfig = SideSourceConfig;

impl SideSourceConfig {
    /// A strip with every tile marked valid until it is scanned
    pub fn new(rect_origin: Int2, rows: usize) -> Self {
        Self {
            enabled: true,
            rect_origin,
            valid_tiles: vec![vec![true; SIDE_COLUMNS]; rows],
        }
    }

    pub fn default_wall_side() -> Self {
        Self::new(Int2::new(0, 3), WALL_SIDE_ROWS)
    }

    pub fn default_ground_side() -> Self {
        Self::new(Int2::new(14, 0), GROUND_SIDE_ROWS)
    }

    pub fn default_for(category: SideCategory) -> Self {
        match category {
            SideCategory::GroundSide => Self::default_ground_side(),
            SideCategory::WallSide => Self::default_wall_side(),
        }
    }

    /// Rows a strip of this category spans
    pub fn rows_for(category: SideCategory) -> usize {
        match category {
            SideCategory::GroundSide => GROUND_SIDE_ROWS,
            SideCategory::WallSide => WALL_SIDE_ROWS,
        }
    }

    /// Out-of-range lookups are treated as invalid
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.valid_tiles
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// The validity row for a level, if it was recorded
    pub fn row(&self, level: usize) -> Option<&[bool]> {
        self.valid_tiles.get(level).map(Vec::as_slice)
    }

    /// Columns of `row` holding a visible tile
    pub fn valid_columns(&self, row: usize) -> Vec<usize> {
        (0..SIDE_COLUMNS).filter(|&c| self.is_valid(row, c)).collect()
    }
}

/// Full autotile setup of one tileset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetAutotileConfig {
    #[serde(default = "AutotileSourceConfig::default_ground")]
    pub ground: AutotileSourceConfig,
    #[serde(default = "AutotileSourceConfig::default_wall_top")]
    pub wall_top: AutotileSourceConfig,
    #[serde(default = "SideSourceConfig::default_wall_side")]
    pub wall_side: WallSideConfig,
    #[serde(default = "SideSourceConfig::default_ground_side")]
    pub ground_side: GroundSideConfig,
}

impl Default for TilesetAutotileConfig {
    fn default() -> Self {
        Self {
            ground: AutotileSourceConfig::default_ground(),
            wall_top: AutotileSourceConfig::default_wall_top(),
            wall_side: SideSourceConfig::default_wall_side(),
            ground_side: SideSourceConfig::default_ground_side(),
        }
    }
}

impl TilesetAutotileConfig {
    pub fn source(&self, category: TopCategory) -> &AutotileSourceConfig {
        match category {
            TopCategory::Ground => &self.ground,
            TopCategory::WallTop => &self.wall_top,
        }
    }

    pub fn source_mut(&mut self, category: TopCategory) -> &mut AutotileSourceConfig {
        match category {
            TopCategory::Ground => &mut self.ground,
            TopCategory::WallTop => &mut self.wall_top,
        }
    }

    pub fn side(&self, category: SideCategory) -> &SideSourceConfig {
        match category {
            SideCategory::GroundSide => &self.ground_side,
            SideCategory::WallSide => &self.wall_side,
        }
    }

    pub fn side_mut(&mut self, category: SideCategory) -> &mut SideSourceConfig {
        match category {
            SideCategory::GroundSide => &mut self.ground_side,
            SideCategory::WallSide => &mut self.wall_side,
        }
    }
}
