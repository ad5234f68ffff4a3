//! Imported image assets and their slicing metadata

use crate::autotile_config::TilesetAutotileConfig;
use crate::geometry::Int2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of an imported image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Sprite,
    Tileset,
}

/// Animation slicing of a sprite sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteMetadata {
    pub frame_w: u32,
    pub frame_h: u32,
    pub cols: u32,
    pub rows: u32,
    /// Milliseconds per frame
    #[serde(default = "default_frame_dur")]
    pub frame_dur: u32,
    #[serde(default = "default_loop")]
    pub r#loop: bool,
}

fn default_frame_dur() -> u32 {
    100
}

fn default_loop() -> bool {
    true
}

impl SpriteMetadata {
    pub fn frame_count(&self) -> u32 {
        self.cols * self.rows
    }
}

/// Grid slicing of a tileset image, plus its autotile layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetMetadata {
    pub tile_w: u32,
    pub tile_h: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
    /// Cached column count, when the importer computed one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autotile_config: Option<TilesetAutotileConfig>,
}

impl TilesetMetadata {
    pub fn new(tile_w: u32, tile_h: u32) -> Self {
        Self {
            tile_w,
            tile_h,
            margin: 0,
            spacing: 0,
            cols: None,
            autotile_config: None,
        }
    }

    pub fn with_margin_spacing(mut self, margin: u32, spacing: u32) -> Self {
        self.margin = margin;
        self.spacing = spacing;
        self
    }

    pub fn with_autotile(mut self, config: TilesetAutotileConfig) -> Self {
        self.autotile_config = Some(config);
        self
    }

    /// Tile size in pixels
    pub fn tile_size(&self) -> Int2 {
        Int2::new(self.tile_w as i32, self.tile_h as i32)
    }
}

/// Per-kind metadata of an asset
#[derive(Debug, Clone, PartialEq)]
pub enum AssetMeta {
    Sprite(SpriteMetadata),
    Tileset(TilesetMetadata),
}

/// An imported image.
///
/// Pixel data travels as a data URL; decoding it is left to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAsset", into = "RawAsset")]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub data_url: String,
    pub meta: AssetMeta,
}

impl Asset {
    pub fn new_tileset(name: String, data_url: String, meta: TilesetMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            data_url,
            meta: AssetMeta::Tileset(meta),
        }
    }

    pub fn new_sprite(name: String, data_url: String, meta: SpriteMetadata) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            data_url,
            meta: AssetMeta::Sprite(meta),
        }
    }

    pub fn asset_type(&self) -> AssetType {
        match self.meta {
            AssetMeta::Sprite(_) => AssetType::Sprite,
            AssetMeta::Tileset(_) => AssetType::Tileset,
        }
    }

    pub fn tileset_meta(&self) -> Option<&TilesetMetadata> {
        match &self.meta {
            AssetMeta::Tileset(meta) => Some(meta),
            AssetMeta::Sprite(_) => None,
        }
    }

    pub fn tileset_meta_mut(&mut self) -> Option<&mut TilesetMetadata> {
        match &mut self.meta {
            AssetMeta::Tileset(meta) => Some(meta),
            AssetMeta::Sprite(_) => None,
        }
    }
}

/// Wire shape of an asset: `{id, name, type, dataURL, meta}`
#[derive(Serialize, Deserialize)]
struct RawAsset {
    id: String,
    name: String,
    #[serde(rename = "type")]
    asset_type: AssetType,
    #[serde(rename = "dataURL", default)]
    data_url: String,
    meta: serde_json::Value,
}

impl TryFrom<RawAsset> for Asset {
    type Error = String;

    fn try_from(raw: RawAsset) -> Result<Self, Self::Error> {
        let meta = match raw.asset_type {
            AssetType::Sprite => AssetMeta::Sprite(
                serde_json::from_value(raw.meta).map_err(|e| format!("asset '{}': {e}", raw.id))?,
            ),
            AssetType::Tileset => AssetMeta::Tileset(
                serde_json::from_value(raw.meta).map_err(|e| format!("asset '{}': {e}", raw.id))?,
            ),
        };
        Ok(Asset {
            id: raw.id,
            name: raw.name,
            data_url: raw.data_url,
            meta,
        })
    }
}

impl From<Asset> for RawAsset {
    fn from(asset: Asset) -> Self {
        let asset_type = asset.asset_type();
        let meta = match &asset.meta {
            AssetMeta::Sprite(meta) => serde_json::to_value(meta),
            AssetMeta::Tileset(meta) => serde_json::to_value(meta),
        }
        .unwrap_or(serde_json::Value::Null);
        RawAsset {
            id: asset.id,
            name: asset.name,
            asset_type,
            data_url: asset.data_url,
            meta,
        }
    }
}
