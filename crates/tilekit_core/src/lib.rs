//! Core data structures for tilekit
//!
//! This crate provides the plain-data types shared by the autotile engine and
//! whatever editor or renderer drives it:
//! - `Int2` / `PixelRect` - Integer coordinates and pixel rectangles
//! - `TileGrid` / `TileCell` - The sparse placement grid and its cells
//! - `Layer` - A tile or object layer
//! - `Asset` / `TilesetMetadata` - Imported images and their slicing metadata
//! - `AutotileSourceConfig` and friends - The compact, user-editable autotile layout
//! - `Scene` - The JSON scene format the grid round-trips through
//!
//! Nothing here touches pixels; see `tilekit_autotile` for the engine.

mod autotile_config;
mod geometry;
mod layer;
mod scene;
mod tileset;

pub use autotile_config::{
    AutotileSourceConfig, GroundSideConfig, SideSourceConfig, TilesetAutotileConfig,
    WallSideConfig, GROUND_SIDE_ROWS, MIN_RECT_SIZE, SIDE_COLUMNS, WALL_SIDE_ROWS,
};
pub use geometry::{Int2, PixelRect};
pub use layer::{
    AutotileCategory, GridPos, Layer, LayerData, LayerType, SideCategory, TileCell, TileGrid,
    TopCategory,
};
pub use scene::{GameResolution, Scene, SceneAsset, SceneError, SCENE_VERSION};
pub use tileset::{Asset, AssetMeta, AssetType, SpriteMetadata, TilesetMetadata};
