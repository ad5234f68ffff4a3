//! Generated atlases, one per (tileset, top category)
//!
//! Entries are built lazily on first access and live until invalidated. Any
//! edit to a category's source layout must invalidate that category before the
//! next read; [`AtlasCache::update_source_config`] does both.

use crate::config::autotile_source_to_tileset_config;
use crate::error::Result;
use crate::generator::{generate_tileset, GeneratedTileset};
use crate::settings::AutotileSettings;
use crate::sides::refresh_valid_tiles;
use crate::types::{BlobTileType, YLevel};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use tilekit_core::{
    AutotileSourceConfig, GridPos, Int2, PixelRect, SideSourceConfig, TilesetAutotileConfig,
    TilesetMetadata, TopCategory,
};
use tracing::{debug, error};

/// How many atlases the cache may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CachePolicy {
    #[default]
    Unbounded,
    /// Evict the oldest inserted entry beyond `max` (at least one entry is kept)
    MaxEntries { max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtlasKey {
    pub tileset_id: String,
    pub category: TopCategory,
}

impl AtlasKey {
    pub fn new(tileset_id: impl Into<String>, category: TopCategory) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            category,
        }
    }
}

impl fmt::Display for AtlasKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.tileset_id, self.category)
    }
}

/// A packed atlas and the lookups a renderer needs
#[derive(Debug, Clone)]
pub struct CachedAtlas {
    pub atlas: RgbaImage,
    pub tile_size: Int2,
    pub columns: usize,
    /// Atlas indices per blob type; types without tiles are absent
    pub blob_indices: BTreeMap<BlobTileType, Vec<usize>>,
    pub side_indices: BTreeMap<YLevel, Vec<usize>>,
    /// Derived from the cache key, so variant picks differ between atlases
    pub variant_seed: i32,
}

impl CachedAtlas {
    pub fn from_generated(key: &AtlasKey, generated: GeneratedTileset) -> Self {
        Self {
            blob_indices: generated
                .top_indices
                .into_iter()
                .filter(|(_, indices)| !indices.is_empty())
                .collect(),
            side_indices: generated
                .side_indices
                .into_iter()
                .filter(|(_, indices)| !indices.is_empty())
                .collect(),
            atlas: generated.atlas,
            tile_size: generated.tile_size,
            columns: generated.columns,
            variant_seed: hash_string_to_seed(&key.to_string()),
        }
    }

    pub fn indices_for(&self, blob: BlobTileType) -> &[usize] {
        self.blob_indices.get(&blob).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Atlas tile to draw for a top cell holding `mask` at `pos`.
    ///
    /// The variant is a pure function of position and seed. Unknown or missing
    /// blob types fall back to `Full`, then to index 0.
    pub fn atlas_index_for(&self, mask: u8, pos: GridPos) -> usize {
        let indices = BlobTileType::from_mask(mask)
            .map(|blob| self.indices_for(blob))
            .filter(|indices| !indices.is_empty())
            .unwrap_or_else(|| self.indices_for(BlobTileType::Full));
        if indices.is_empty() {
            return 0;
        }
        let pick = variant_hash(pos, self.variant_seed) as usize % indices.len();
        indices[pick]
    }

    /// Pixel rect of an atlas tile (top-left origin)
    pub fn tile_rect(&self, index: usize) -> PixelRect {
        let columns = self.columns.max(1);
        let cell = Int2::new((index % columns) as i32, (index / columns) as i32);
        PixelRect::from_origin_size(cell.scale(self.tile_size), self.tile_size)
    }
}

/// 32-bit string hash: `hash = hash * 31 + unit` over UTF-16 code units
pub fn hash_string_to_seed(value: &str) -> i32 {
    value.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32)
    })
}

fn variant_hash(pos: GridPos, seed: i32) -> u32 {
    let mut h = (pos.x as u32).wrapping_mul(0x9E37_79B1)
        ^ (pos.y as u32).wrapping_mul(0x85EB_CA77)
        ^ seed as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h
}

/// Owner of all generated atlases.
///
/// Lookup-or-generate takes `&mut self`, so concurrent hosts must wrap the
/// cache in a lock to avoid generating the same entry twice.
#[derive(Debug, Default)]
pub struct AtlasCache {
    entries: HashMap<AtlasKey, CachedAtlas>,
    insertion_order: VecDeque<AtlasKey>,
    policy: CachePolicy,
    columns: usize,
}

impl AtlasCache {
    pub fn new(policy: CachePolicy, columns: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            policy,
            columns,
        }
    }

    pub fn from_settings(settings: &AutotileSettings) -> Self {
        Self::new(settings.cache, settings.atlas_columns)
    }

    /// Return the cached atlas, generating it on a miss.
    ///
    /// Generation failures are logged and yield `None`; the category is then
    /// simply not drawn. Disabled categories also yield `None`.
    pub fn get_or_generate(
        &mut self,
        tileset_id: &str,
        category: TopCategory,
        source: &RgbaImage,
        config: &TilesetAutotileConfig,
        tile_size: Int2,
    ) -> Option<&CachedAtlas> {
        let key = AtlasKey::new(tileset_id, category);
        if self.entries.contains_key(&key) {
            return self.entries.get(&key);
        }

        if !config.source(category).enabled {
            debug!("Autotile category {key} is disabled");
            return None;
        }

        match self.build(&key, source, config, tile_size) {
            Ok(atlas) => {
                debug!("Cached autotile atlas {key}");
                self.insert(key.clone(), atlas);
                self.entries.get(&key)
            }
            Err(e) => {
                error!("Failed to generate autotile atlas for {key}: {e}");
                None
            }
        }
    }

    fn build(
        &self,
        key: &AtlasKey,
        source: &RgbaImage,
        config: &TilesetAutotileConfig,
        tile_size: Int2,
    ) -> Result<CachedAtlas> {
        let mut tileset_config =
            autotile_source_to_tileset_config(config.source(key.category), tile_size)?;
        let side = key.category.side();
        tileset_config.add_side_strip(side, config.side(side))?;

        let generated = generate_tileset(source, &tileset_config, self.columns)?;
        Ok(CachedAtlas::from_generated(key, generated))
    }

    fn insert(&mut self, key: AtlasKey, atlas: CachedAtlas) {
        if let CachePolicy::MaxEntries { max } = self.policy {
            while self.entries.len() >= max.max(1) {
                let Some(oldest) = self.insertion_order.pop_front() else {
                    break;
                };
                debug!("Evicting autotile atlas {oldest}");
                self.entries.remove(&oldest);
            }
        }
        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, atlas);
    }

    pub fn get(&self, tileset_id: &str, category: TopCategory) -> Option<&CachedAtlas> {
        self.entries.get(&AtlasKey::new(tileset_id, category))
    }

    pub fn contains(&self, tileset_id: &str, category: TopCategory) -> bool {
        self.entries.contains_key(&AtlasKey::new(tileset_id, category))
    }

    /// Drop one category of a tileset, or all of its categories when `None`.
    /// Returns how many entries were removed.
    pub fn invalidate(&mut self, tileset_id: &str, category: Option<TopCategory>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| {
            key.tileset_id != tileset_id || category.is_some_and(|c| c != key.category)
        });
        let entries = &self.entries;
        self.insertion_order.retain(|key| entries.contains_key(key));

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Invalidated {removed} autotile atlas(es) for tileset {tileset_id}");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace a category's source layout and drop its stale atlas
    pub fn update_source_config(
        &mut self,
        config: &mut TilesetAutotileConfig,
        tileset_id: &str,
        category: TopCategory,
        source: AutotileSourceConfig,
    ) {
        *config.source_mut(category) = source;
        self.invalidate(tileset_id, Some(category));
    }

    /// Replace the side strip packed with `category`'s atlas and drop that atlas.
    ///
    /// The strip's valid tiles are rescanned from `image`, so moving a strip
    /// never carries over flags from its old position.
    pub fn update_side_config(
        &mut self,
        config: &mut TilesetAutotileConfig,
        tileset_id: &str,
        category: TopCategory,
        mut side: SideSourceConfig,
        image: &RgbaImage,
        meta: &TilesetMetadata,
    ) {
        let side_category = category.side();
        refresh_valid_tiles(&mut side, side_category, image, meta);
        *config.side_mut(side_category) = side;
        self.invalidate(tileset_id, Some(category));
    }
}
