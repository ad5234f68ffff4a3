//! Blob autotiling for 2D tilemaps
//!
//! Re-exports the data model (`tilekit_core`) and the engine
//! (`tilekit_autotile`). Most users only need the [`prelude`].

pub use tilekit_autotile;
pub use tilekit_core;

pub mod prelude {
    pub use tilekit_autotile::{
        generate_tileset, AtlasCache, AutotileError, AutotilePainter, AutotileSettings,
        BlobTileType, CachePolicy, CachedAtlas, GeneratedTileset, TilesetConfig, YLevel,
    };
    pub use tilekit_core::{
        Asset, AutotileCategory, AutotileSourceConfig, GridPos, Int2, Layer, Scene, SceneAsset,
        SceneError, SideCategory, SideSourceConfig, TileCell, TileGrid, TilesetAutotileConfig,
        TilesetMetadata, TopCategory,
    };
}
