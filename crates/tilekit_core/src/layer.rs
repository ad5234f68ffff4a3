//! Tile grid, cells and layers

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Autotile role of a grid cell.
///
/// A cell without a category was placed by hand and is never touched by autotiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutotileCategory {
    Ground,
    WallTop,
    GroundSide,
    WallSide,
}

impl AutotileCategory {
    pub const ALL: [AutotileCategory; 4] = [
        AutotileCategory::Ground,
        AutotileCategory::WallTop,
        AutotileCategory::GroundSide,
        AutotileCategory::WallSide,
    ];

    /// Name as it appears in scene JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            AutotileCategory::Ground => "ground",
            AutotileCategory::WallTop => "wallTop",
            AutotileCategory::GroundSide => "groundSide",
            AutotileCategory::WallSide => "wallSide",
        }
    }

    pub fn as_top(&self) -> Option<TopCategory> {
        match self {
            AutotileCategory::Ground => Some(TopCategory::Ground),
            AutotileCategory::WallTop => Some(TopCategory::WallTop),
            _ => None,
        }
    }

    pub fn as_side(&self) -> Option<SideCategory> {
        match self {
            AutotileCategory::GroundSide => Some(SideCategory::GroundSide),
            AutotileCategory::WallSide => Some(SideCategory::WallSide),
            _ => None,
        }
    }
}

impl fmt::Display for AutotileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Blob-autotiled surface categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TopCategory {
    Ground,
    WallTop,
}

impl TopCategory {
    pub const ALL: [TopCategory; 2] = [TopCategory::Ground, TopCategory::WallTop];

    /// The side category stacked beneath this top category
    pub fn side(&self) -> SideCategory {
        match self {
            TopCategory::Ground => SideCategory::GroundSide,
            TopCategory::WallTop => SideCategory::WallSide,
        }
    }

    pub fn as_str(&self) -> &'static str {
        AutotileCategory::from(*self).as_str()
    }
}

impl fmt::Display for TopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Depth/facing categories placed beneath a top tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SideCategory {
    GroundSide,
    WallSide,
}

impl SideCategory {
    pub const ALL: [SideCategory; 2] = [SideCategory::GroundSide, SideCategory::WallSide];

    /// The top category that owns this side category
    pub fn top(&self) -> TopCategory {
        match self {
            SideCategory::GroundSide => TopCategory::Ground,
            SideCategory::WallSide => TopCategory::WallTop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        AutotileCategory::from(*self).as_str()
    }
}

impl fmt::Display for SideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TopCategory> for AutotileCategory {
    fn from(value: TopCategory) -> Self {
        match value {
            TopCategory::Ground => AutotileCategory::Ground,
            TopCategory::WallTop => AutotileCategory::WallTop,
        }
    }
}

impl From<SideCategory> for AutotileCategory {
    fn from(value: SideCategory) -> Self {
        match value {
            SideCategory::GroundSide => AutotileCategory::GroundSide,
            SideCategory::WallSide => AutotileCategory::WallSide,
        }
    }
}

/// A single placed tile.
///
/// For top cells `index` is the 8-bit neighbor mask, resolved to an atlas tile
/// at draw time. For side cells and manual cells it is a literal tileset index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileCell {
    pub tileset_id: String,
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autotile_category: Option<AutotileCategory>,
    /// Side cells only: y of the top tile that placed this cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_top_y: Option<i32>,
    /// Side cells only: 0-based depth below the top tile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_level: Option<u32>,
}

impl TileCell {
    /// A manually placed tile
    pub fn manual(tileset_id: impl Into<String>, index: u32) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            index,
            autotile_category: None,
            side_top_y: None,
            side_level: None,
        }
    }

    /// An autotiled top cell holding its neighbor mask
    pub fn top(tileset_id: impl Into<String>, category: TopCategory, mask: u8) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            index: mask as u32,
            autotile_category: Some(category.into()),
            side_top_y: None,
            side_level: None,
        }
    }

    /// A side cell owned by the top tile at row `top_y`
    pub fn side(
        tileset_id: impl Into<String>,
        category: SideCategory,
        tile_index: u32,
        top_y: i32,
        level: u32,
    ) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            index: tile_index,
            autotile_category: Some(category.into()),
            side_top_y: Some(top_y),
            side_level: Some(level),
        }
    }

    pub fn is_manual(&self) -> bool {
        self.autotile_category.is_none()
    }

    pub fn top_category(&self) -> Option<TopCategory> {
        self.autotile_category.and_then(|c| c.as_top())
    }

    pub fn side_category(&self) -> Option<SideCategory> {
        self.autotile_category.and_then(|c| c.as_side())
    }

    /// The neighbor mask of a top cell.
    ///
    /// `None` for other cells and for indices that are not one of the 47 blob
    /// masks, e.g. a hand-edited scene file.
    pub fn mask(&self) -> Option<u8> {
        self.top_category()?;
        u8::try_from(self.index).ok().filter(|&mask| is_blob_mask(mask))
    }
}

/// Blob masks set a diagonal bit only together with both edge bits beside it.
/// Bits run clockwise from north, so diagonals sit at odd positions.
fn is_blob_mask(mask: u8) -> bool {
    (0..4).all(|corner| {
        let diagonal = 1u8 << (corner * 2 + 1);
        let edges = (1u8 << (corner * 2)) | (1u8 << ((corner * 2 + 2) % 8));
        mask & diagonal == 0 || mask & edges == edges
    })
}

/// Integer grid coordinate, serialized as `"x,y"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for GridPos {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("invalid grid key '{s}': expected \"x,y\""))?;
        let x = x
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid grid key '{s}': {e}"))?;
        let y = y
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("invalid grid key '{s}': {e}"))?;
        Ok(Self::new(x, y))
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl Serialize for GridPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(de::Error::custom)
    }
}

/// Sparse tile storage with O(1) point lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileGrid {
    cells: HashMap<GridPos, TileCell>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: GridPos) -> Option<&TileCell> {
        self.cells.get(&pos)
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut TileCell> {
        self.cells.get_mut(&pos)
    }

    /// Insert a cell, returning the previous occupant
    pub fn insert(&mut self, pos: GridPos, cell: TileCell) -> Option<TileCell> {
        self.cells.insert(pos, cell)
    }

    pub fn remove(&mut self, pos: GridPos) -> Option<TileCell> {
        self.cells.remove(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn iter(&self) -> hash_map::Iter<'_, GridPos, TileCell> {
        self.cells.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells.keys().copied()
    }

    /// Category of the cell at `pos`, `None` for empty or manual cells
    pub fn category_at(&self, pos: GridPos) -> Option<AutotileCategory> {
        self.cells.get(&pos).and_then(|c| c.autotile_category)
    }

    /// Positions of every cell with the given category, sorted by row then column
    pub fn positions_with_category(&self, category: AutotileCategory) -> Vec<GridPos> {
        let mut positions: Vec<GridPos> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.autotile_category == Some(category))
            .map(|(pos, _)| *pos)
            .collect();
        positions.sort_by_key(|p| (p.y, p.x));
        positions
    }
}

impl FromIterator<(GridPos, TileCell)> for TileGrid {
    fn from_iter<T: IntoIterator<Item = (GridPos, TileCell)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TileGrid {
    type Item = (&'a GridPos, &'a TileCell);
    type IntoIter = hash_map::Iter<'a, GridPos, TileCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// A layer (tiles or objects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayer", into = "RawLayer")]
pub struct Layer {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub data: LayerData,
}

impl Layer {
    /// Create a new, empty tile layer
    pub fn new_tile_layer(name: String, tileset_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            visible: true,
            locked: false,
            data: LayerData::Tiles {
                tileset_id,
                grid: TileGrid::new(),
            },
        }
    }

    /// Create a new object layer
    pub fn new_object_layer(name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            visible: true,
            locked: false,
            data: LayerData::Objects {
                objects: Vec::new(),
            },
        }
    }

    /// Get the type of this layer
    pub fn layer_type(&self) -> LayerType {
        match &self.data {
            LayerData::Tiles { .. } => LayerType::Tile,
            LayerData::Objects { .. } => LayerType::Object,
        }
    }

    /// Get the tileset ID if this is a tile layer with one assigned
    pub fn tileset_id(&self) -> Option<&str> {
        match &self.data {
            LayerData::Tiles { tileset_id, .. } => tileset_id.as_deref(),
            LayerData::Objects { .. } => None,
        }
    }

    pub fn grid(&self) -> Option<&TileGrid> {
        match &self.data {
            LayerData::Tiles { grid, .. } => Some(grid),
            LayerData::Objects { .. } => None,
        }
    }

    pub fn grid_mut(&mut self) -> Option<&mut TileGrid> {
        match &mut self.data {
            LayerData::Tiles { grid, .. } => Some(grid),
            LayerData::Objects { .. } => None,
        }
    }
}

/// The type of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Tile,
    Object,
}

/// The data contained in a layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    Tiles {
        tileset_id: Option<String>,
        grid: TileGrid,
    },
    /// Placed objects are opaque to the autotile engine and kept verbatim
    Objects { objects: Vec<serde_json::Value> },
}

/// Wire shape of a layer: `{id, name, type, visible, locked, data}`
#[derive(Serialize, Deserialize)]
struct RawLayer {
    id: String,
    name: String,
    #[serde(rename = "type")]
    layer_type: LayerType,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    locked: bool,
    #[serde(default)]
    data: serde_json::Value,
}

fn default_visible() -> bool {
    true
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawTileData {
    #[serde(default)]
    tileset_id: Option<String>,
    #[serde(default)]
    grid: TileGrid,
}

#[derive(Serialize, Deserialize, Default)]
struct RawObjectData {
    #[serde(default)]
    objects: Vec<serde_json::Value>,
}

impl TryFrom<RawLayer> for Layer {
    type Error = String;

    fn try_from(raw: RawLayer) -> Result<Self, Self::Error> {
        let data = match raw.layer_type {
            LayerType::Tile => {
                let tiles: RawTileData = if raw.data.is_null() {
                    RawTileData::default()
                } else {
                    serde_json::from_value(raw.data)
                        .map_err(|e| format!("layer '{}': {e}", raw.id))?
                };
                LayerData::Tiles {
                    tileset_id: tiles.tileset_id,
                    grid: tiles.grid,
                }
            }
            LayerType::Object => {
                let objects: RawObjectData = if raw.data.is_null() {
                    RawObjectData::default()
                } else {
                    serde_json::from_value(raw.data)
                        .map_err(|e| format!("layer '{}': {e}", raw.id))?
                };
                LayerData::Objects {
                    objects: objects.objects,
                }
            }
        };

        Ok(Layer {
            id: raw.id,
            name: raw.name,
            visible: raw.visible,
            locked: raw.locked,
            data,
        })
    }
}

impl From<Layer> for RawLayer {
    fn from(layer: Layer) -> Self {
        let layer_type = layer.layer_type();
        let data = match layer.data {
            LayerData::Tiles { tileset_id, grid } => {
                serde_json::to_value(RawTileData { tileset_id, grid })
            }
            LayerData::Objects { objects } => serde_json::to_value(RawObjectData { objects }),
        }
        .unwrap_or(serde_json::Value::Null);

        RawLayer {
            id: layer.id,
            name: layer.name,
            layer_type,
            visible: layer.visible,
            locked: layer.locked,
            data,
        }
    }
}
