//! Scene JSON format
//!
//! `{version, ppu, gameResolution, layers, assets}`. Assets may be full records
//! or bare id strings; exported scenes only list the ids they reference.

use crate::layer::{Layer, LayerData};
use crate::tileset::Asset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// Format version written by [`Scene::to_json_string`]
pub const SCENE_VERSION: &str = "1.0.0";

/// Errors that can occur when loading or saving a scene
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid scene format: {0}")]
    InvalidFormat(String),
}

/// Target render resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResolution {
    pub width: u32,
    pub height: u32,
}

impl Default for GameResolution {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
        }
    }
}

/// An entry of the scene's asset list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneAsset {
    Id(String),
    Full(Asset),
}

impl SceneAsset {
    pub fn id(&self) -> &str {
        match self {
            SceneAsset::Id(id) => id,
            SceneAsset::Full(asset) => &asset.id,
        }
    }

    pub fn asset(&self) -> Option<&Asset> {
        match self {
            SceneAsset::Id(_) => None,
            SceneAsset::Full(asset) => Some(asset),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub version: String,
    /// Pixels per world unit
    #[serde(default = "default_ppu")]
    pub ppu: u32,
    #[serde(default)]
    pub game_resolution: GameResolution,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub assets: Vec<SceneAsset>,
}

fn default_ppu() -> u32 {
    16
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION.to_string(),
            ppu: default_ppu(),
            game_resolution: GameResolution::default(),
            layers: Vec::new(),
            assets: Vec::new(),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }

    /// Look up a fully described asset by id
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .filter_map(SceneAsset::asset)
            .find(|a| a.id == id)
    }

    /// Ids of every tileset and sprite the layers refer to, sorted
    pub fn referenced_asset_ids(&self) -> BTreeSet<String> {
        let mut ids = BTreeSet::new();
        for layer in &self.layers {
            match &layer.data {
                LayerData::Tiles { tileset_id, grid } => {
                    ids.extend(tileset_id.iter().cloned());
                    ids.extend(grid.iter().map(|(_, cell)| cell.tileset_id.clone()));
                }
                LayerData::Objects { objects } => {
                    ids.extend(
                        objects
                            .iter()
                            .filter_map(|o| o.get("assetId"))
                            .filter_map(|v| v.as_str())
                            .map(str::to_string),
                    );
                }
            }
        }
        ids.retain(|id| !id.is_empty());
        ids
    }

    /// Parse a scene, rejecting unknown major versions
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(json)?;
        let major = scene.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(SceneError::InvalidFormat(format!(
                "unsupported scene version '{}'",
                scene.version
            )));
        }
        Ok(scene)
    }

    pub fn to_json_string(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), SceneError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
