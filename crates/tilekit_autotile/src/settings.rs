//! Engine settings, loaded from TOML. Every field is optional.
//!
//! ```toml
//! atlas_columns = 16
//! ground_side_depth = 4
//! wall_side_depth = 2
//!
//! [cache]
//! type = "max_entries"
//! max = 8
//! ```

use crate::cache::CachePolicy;
use crate::error::Result;
use crate::generator::DEFAULT_ATLAS_COLUMNS;
use crate::sides::{GROUND_SIDE_DEPTH, WALL_SIDE_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tilekit_core::TopCategory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutotileSettings {
    /// Tiles per row in generated atlases
    pub atlas_columns: usize,
    pub ground_side_depth: usize,
    pub wall_side_depth: usize,
    pub cache: CachePolicy,
}

impl Default for AutotileSettings {
    fn default() -> Self {
        Self {
            atlas_columns: DEFAULT_ATLAS_COLUMNS,
            ground_side_depth: GROUND_SIDE_DEPTH,
            wall_side_depth: WALL_SIDE_DEPTH,
            cache: CachePolicy::default(),
        }
    }
}

impl AutotileSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Side rows placed below a top tile of `category`
    pub fn side_depth(&self, category: TopCategory) -> usize {
        match category {
            TopCategory::Ground => self.ground_side_depth,
            TopCategory::WallTop => self.wall_side_depth,
        }
    }

    /// Deepest side run of any category
    pub fn max_side_depth(&self) -> usize {
        self.ground_side_depth.max(self.wall_side_depth)
    }
}
