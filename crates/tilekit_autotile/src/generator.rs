//! Blob tile compositor and atlas packer
//!
//! Every blob type is composited from quadrant fragments over a `Full` base,
//! once per combination of candidate fragments, then everything (side tiles
//! last) is packed into a single atlas.

use crate::config::TilesetConfig;
use crate::error::{AutotileError, Result};
use crate::features::FeatureLibrary;
use crate::geometry::{quadrant_rect, uv_rect_from_tile_index, UvRect};
use crate::pixels::{blit, slice_quadrant};
use crate::recipe::{StraightBorder, BLOB_TILE_FEATURE_MAP};
use crate::types::{BlobTileType, TileFeatures, YLevel};
use image::{ImageFormat, RgbaImage};
use std::collections::BTreeMap;
use std::path::Path;
use tilekit_core::Int2;
use tracing::{debug, warn};

/// Atlas width in tiles unless configured otherwise
pub const DEFAULT_ATLAS_COLUMNS: usize = 20;

/// Output of [`generate_tileset`]
#[derive(Debug, Clone)]
pub struct GeneratedTileset {
    pub tile_size: Int2,
    pub columns: usize,
    pub atlas: RgbaImage,
    pub top_tiles: BTreeMap<BlobTileType, Vec<RgbaImage>>,
    pub side_tiles: BTreeMap<YLevel, Vec<RgbaImage>>,
    /// Atlas cell indices per blob type, in variant order
    pub top_indices: BTreeMap<BlobTileType, Vec<usize>>,
    pub side_indices: BTreeMap<YLevel, Vec<usize>>,
    pub top_texture_positions: BTreeMap<BlobTileType, Vec<UvRect>>,
    pub side_texture_positions: BTreeMap<YLevel, Vec<UvRect>>,
    /// Blob types with no complete set of fragments, drawn with a best-effort composite
    pub fallback_types: Vec<BlobTileType>,
}

impl GeneratedTileset {
    pub fn indices_for(&self, blob: BlobTileType) -> &[usize] {
        self.top_indices.get(&blob).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn side_indices_for(&self, level: YLevel) -> &[usize] {
        self.side_indices.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of packed tiles
    pub fn tile_count(&self) -> usize {
        self.top_indices.values().map(Vec::len).sum::<usize>()
            + self.side_indices.values().map(Vec::len).sum::<usize>()
    }

    /// Column/row of an atlas cell
    pub fn tile_xy(&self, index: usize) -> Int2 {
        atlas_cell(index, self.columns)
    }

    pub fn save_atlas_png(&self, path: &Path) -> Result<()> {
        self.atlas.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Build the full blob atlas for one source image and layout.
///
/// `columns == 0` is treated as 1. Fails on odd tile sizes or positions outside
/// the source; there is no partial result.
pub fn generate_tileset(
    source: &RgbaImage,
    config: &TilesetConfig,
    columns: usize,
) -> Result<GeneratedTileset> {
    let columns = columns.max(1);
    let tile_size = config.tile_size;
    if !tile_size.is_even() {
        return Err(AutotileError::OddTileSize(tile_size));
    }

    let library = FeatureLibrary::build(source, config)?;

    let mut textures: Vec<RgbaImage> = Vec::new();
    let mut top_tiles: BTreeMap<BlobTileType, Vec<RgbaImage>> = BTreeMap::new();
    let mut top_indices: BTreeMap<BlobTileType, Vec<usize>> = BTreeMap::new();
    let mut side_tiles: BTreeMap<YLevel, Vec<RgbaImage>> = BTreeMap::new();
    let mut side_indices: BTreeMap<YLevel, Vec<usize>> = BTreeMap::new();
    let mut fallback_types = Vec::new();

    for (blob, required) in BLOB_TILE_FEATURE_MAP {
        let mut variants = generate_tile_variants(&library, required)?;
        if variants.is_empty() {
            warn!("No complete fragment set for {blob}, using fallback composite");
            variants.push(generate_tile(&library, required)?);
            fallback_types.push(blob);
        }
        for tile in variants {
            top_indices.entry(blob).or_default().push(textures.len());
            top_tiles.entry(blob).or_default().push(tile.clone());
            textures.push(tile);
        }
    }

    for level in YLevel::ALL {
        for tile in library.sliced_side(level) {
            side_indices.entry(level).or_default().push(textures.len());
            side_tiles.entry(level).or_default().push(tile.clone());
            textures.push(tile.clone());
        }
    }

    let atlas = append_textures_in_grid(&textures, columns)?;
    let (tex_w, tex_h) = atlas.dimensions();
    let uv_of = |i: usize| uv_rect_from_tile_index(atlas_cell(i, columns), tile_size, tex_w, tex_h);

    let top_texture_positions = top_indices
        .iter()
        .map(|(blob, indices)| (*blob, indices.iter().map(|&i| uv_of(i)).collect()))
        .collect();
    let side_texture_positions = side_indices
        .iter()
        .map(|(level, indices)| (*level, indices.iter().map(|&i| uv_of(i)).collect()))
        .collect();

    debug!(
        "Generated blob atlas: {} tiles, {}x{} px, {} fallback types",
        textures.len(),
        tex_w,
        tex_h,
        fallback_types.len()
    );

    Ok(GeneratedTileset {
        tile_size,
        columns,
        atlas,
        top_tiles,
        side_tiles,
        top_indices,
        side_indices,
        top_texture_positions,
        side_texture_positions,
        fallback_types,
    })
}

/// Pack tiles left to right, top to bottom, `columns` per row (0 treated as 1).
///
/// Cells are sized to the largest tile.
pub fn append_textures_in_grid(textures: &[RgbaImage], columns: usize) -> Result<RgbaImage> {
    let columns = columns.max(1);
    let rows = textures.len().div_ceil(columns);
    let max_w = textures.iter().map(RgbaImage::width).max().unwrap_or(0);
    let max_h = textures.iter().map(RgbaImage::height).max().unwrap_or(0);

    let too_large = || AutotileError::AtlasTooLarge {
        tiles: textures.len(),
        columns,
    };
    let width = scaled_extent(max_w, columns).ok_or_else(too_large)?;
    let height = scaled_extent(max_h, rows).ok_or_else(too_large)?;

    let mut out = RgbaImage::new(width, height);
    for (i, tile) in textures.iter().enumerate() {
        let cell = atlas_cell(i, columns);
        blit(
            &mut out,
            tile,
            Int2::new(cell.x * max_w as i32, cell.y * max_h as i32),
        )?;
    }
    Ok(out)
}

/// `cell * count` pixels, kept within the i32 range used for blit positions
fn scaled_extent(cell: u32, count: usize) -> Option<u32> {
    let extent = cell.checked_mul(u32::try_from(count).ok()?)?;
    i32::try_from(extent).is_ok().then_some(extent)
}

fn atlas_cell(index: usize, columns: usize) -> Int2 {
    let columns = columns.max(1);
    Int2::new((index % columns) as i32, (index / columns) as i32)
}

/// All composites for one recipe; empty when some feature has no fragment
fn generate_tile_variants(
    library: &FeatureLibrary,
    required: &[TileFeatures],
) -> Result<Vec<RgbaImage>> {
    if let Some(border) = StraightBorder::classify(required) {
        let [edge, bridge] = border.source_roles();
        let sources = library
            .sliced_top(edge)
            .iter()
            .chain(library.sliced_top(bridge));

        let mut lists: Vec<Vec<RgbaImage>> = vec![Vec::new(); required.len()];
        for src in sources {
            for (list, feature) in lists.iter_mut().zip(required) {
                list.push(slice_quadrant(src, feature.quadrant(), library.tile_size())?);
            }
        }
        return generate_variants_from_lists(library, required, &lists);
    }

    let lists: Vec<&[RgbaImage]> = required.iter().map(|&f| library.fragments(f)).collect();
    generate_variants_from_lists(library, required, &lists)
}

/// Cartesian product over the per-feature lists; the last list varies fastest
fn generate_variants_from_lists<L: AsRef<[RgbaImage]>>(
    library: &FeatureLibrary,
    required: &[TileFeatures],
    lists: &[L],
) -> Result<Vec<RgbaImage>> {
    if lists.is_empty() || lists.iter().any(|l| l.as_ref().is_empty()) {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    let mut cursor = vec![0usize; lists.len()];
    loop {
        let chosen: Vec<&RgbaImage> = cursor
            .iter()
            .zip(lists)
            .map(|(&i, list)| &list.as_ref()[i])
            .collect();
        results.push(composite(library, required, &chosen)?);

        let mut pos = lists.len();
        loop {
            if pos == 0 {
                return Ok(results);
            }
            pos -= 1;
            cursor[pos] += 1;
            if cursor[pos] < lists[pos].as_ref().len() {
                break;
            }
            cursor[pos] = 0;
        }
    }
}

/// Best-effort composite from the first fragment of each feature that has one
fn generate_tile(library: &FeatureLibrary, required: &[TileFeatures]) -> Result<RgbaImage> {
    let (features, chosen): (Vec<TileFeatures>, Vec<&RgbaImage>) = required
        .iter()
        .filter_map(|&f| library.fragments(f).first().map(|frag| (f, frag)))
        .unzip();
    composite(library, &features, &chosen)
}

/// Base fill, then each fragment into its quadrant in list order (later wins)
fn composite(
    library: &FeatureLibrary,
    features: &[TileFeatures],
    fragments: &[&RgbaImage],
) -> Result<RgbaImage> {
    let size = library.tile_size();
    let mut out = match library.full_base() {
        Some(base) => base.clone(),
        None => RgbaImage::new(size.x as u32, size.y as u32),
    };
    for (feature, fragment) in features.iter().zip(fragments) {
        let rect = quadrant_rect(feature.quadrant(), size);
        blit(&mut out, fragment, rect.origin())?;
    }
    Ok(out)
}
