//! Side (depth) tiles below top tiles: priorities, column choice, indices
//!
//! Side tiles are not blob-autotiled. Each depth level is one row of a
//! 5-column strip: column 0 is the left end, 4 the right end and 1..=3 are
//! interchangeable middle pieces.

use crate::pixels::has_opaque_pixel;
use image::RgbaImage;
use rand::Rng;
use tilekit_core::{
    AutotileCategory, GridPos, Int2, PixelRect, SideCategory, SideSourceConfig, TileCell,
    TileGrid, TilesetAutotileConfig, TilesetMetadata, TopCategory, SIDE_COLUMNS,
};
use tracing::debug;

pub const GROUND_SIDE_DEPTH: usize = 4;
pub const WALL_SIDE_DEPTH: usize = 2;

const MIDDLE_COLUMNS: [usize; 3] = [1, 2, 3];
const RIGHT_END_COLUMN: [usize; 1] = [4];
const LEFT_END_COLUMN: [usize; 1] = [0];

/// Default number of side rows below a top tile
pub fn side_depth(top: TopCategory) -> usize {
    match top {
        TopCategory::Ground => GROUND_SIDE_DEPTH,
        TopCategory::WallTop => WALL_SIDE_DEPTH,
    }
}

/// Override rank: wallTop > wallSide > ground > groundSide
pub fn category_priority(category: AutotileCategory) -> u8 {
    match category {
        AutotileCategory::WallTop => 4,
        AutotileCategory::WallSide => 3,
        AutotileCategory::Ground => 2,
        AutotileCategory::GroundSide => 1,
    }
}

/// An empty cell (`None`) can always be overridden, otherwise rank must be strictly higher
pub fn can_override(existing: Option<AutotileCategory>, placing: AutotileCategory) -> bool {
    match existing {
        None => true,
        Some(existing) => category_priority(placing) > category_priority(existing),
    }
}

/// Whether a side tile owned by the top tile at row `placing_top_y` may go into
/// a cell holding `existing`.
///
/// Manual cells always win. A cell of the same side category is taken over
/// only from a top tile at the same or a lower row than its current owner.
pub fn can_place_side_tile(
    existing: Option<&TileCell>,
    side: SideCategory,
    placing_top_y: i32,
    placing_tileset: Option<&str>,
) -> bool {
    let Some(cell) = existing else {
        return true;
    };
    let Some(category) = cell.autotile_category else {
        return false;
    };
    if can_override(Some(category), side.into()) {
        return true;
    }
    if category != AutotileCategory::from(side) {
        return false;
    }
    if placing_tileset.is_some_and(|id| cell.tileset_id != id) {
        return false;
    }
    match cell.side_top_y {
        None => true,
        Some(owner_y) => owner_y <= placing_top_y,
    }
}

/// Whether `existing` stops the downward run of side tiles
pub fn should_block_side_placement(existing: Option<&TileCell>, side: SideCategory) -> bool {
    match existing {
        None => false,
        Some(cell) => match cell.autotile_category {
            None => true,
            Some(category) => !can_override(Some(category), side.into()),
        },
    }
}

/// Strip columns that fit a top tile's horizontal neighbors
pub fn side_column_candidates(has_left: bool, has_right: bool) -> &'static [usize] {
    match (has_left, has_right) {
        (true, false) => &RIGHT_END_COLUMN,
        (false, true) => &LEFT_END_COLUMN,
        _ => &MIDDLE_COLUMNS,
    }
}

/// Columns a depth level may draw from.
///
/// Candidates are filtered by `valid_row` when given; if none survive, any
/// valid column of the row is used.
pub fn side_column_options(
    has_left: bool,
    has_right: bool,
    valid_row: Option<&[bool]>,
) -> Vec<usize> {
    let mut candidates: Vec<usize> = side_column_candidates(has_left, has_right).to_vec();

    if let Some(row) = valid_row {
        let is_valid = |col: usize| row.get(col).copied().unwrap_or(false);
        candidates.retain(|&col| is_valid(col));
        if candidates.is_empty() {
            candidates = (0..row.len()).filter(|&col| is_valid(col)).collect();
        }
    }
    candidates
}

/// Pick a strip column for one depth level. `None` means no tile can be drawn here.
pub fn get_side_column_index(
    has_left: bool,
    has_right: bool,
    valid_row: Option<&[bool]>,
    rng: &mut impl Rng,
) -> Option<usize> {
    let candidates = side_column_options(has_left, has_right, valid_row);
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.gen_range(0..candidates.len())])
}

/// Strip column of a tileset index, if it lies in the strip row for `level`
pub fn side_column_of_index(
    index: u32,
    level: usize,
    origin: Int2,
    tileset_cols: u32,
) -> Option<usize> {
    if tileset_cols == 0 {
        return None;
    }
    let x = (index % tileset_cols) as i32 - origin.x;
    let y = (index / tileset_cols) as i32 - origin.y;
    (y == level as i32 && (0..SIDE_COLUMNS as i32).contains(&x)).then_some(x as usize)
}

/// Tileset index of strip cell (`column`, `level`).
///
/// `None` when the cell lies left of, above or right of the tileset.
pub fn side_tile_index(
    column: usize,
    level: usize,
    origin: Int2,
    tileset_cols: u32,
) -> Option<u32> {
    let x = u32::try_from(i64::from(origin.x) + column as i64).ok()?;
    let y = u32::try_from(i64::from(origin.y) + level as i64).ok()?;
    if x >= tileset_cols {
        return None;
    }
    y.checked_mul(tileset_cols)?.checked_add(x)
}

/// Tiles per row of a tileset image, honoring margin and spacing
pub fn tileset_columns(meta: &TilesetMetadata, image_width: u32) -> u32 {
    let usable = image_width as i64 - 2 * meta.margin as i64 + meta.spacing as i64;
    let stride = meta.tile_w as i64 + meta.spacing as i64;
    if stride <= 0 || usable <= 0 {
        return 0;
    }
    (usable / stride) as u32
}

/// Whether `pos` holds a top tile of `top` (from `tileset_id`, when given)
pub fn is_top_tile_at(
    grid: &TileGrid,
    pos: GridPos,
    top: TopCategory,
    tileset_id: Option<&str>,
) -> bool {
    grid.get(pos).is_some_and(|cell| {
        cell.top_category() == Some(top) && tileset_id.map_or(true, |id| cell.tileset_id == id)
    })
}

/// Scan a side strip in the source image and mark the tiles that have any
/// visible pixel. Returns `rows` rows of [`SIDE_COLUMNS`] flags.
pub fn validate_side_tiles(
    image: &RgbaImage,
    config: &SideSourceConfig,
    rows: usize,
    tile_size: Int2,
    margin: u32,
    spacing: u32,
) -> Vec<Vec<bool>> {
    (0..rows)
        .map(|row| {
            (0..SIDE_COLUMNS)
                .map(|col| {
                    config
                        .rect_origin
                        .checked_add(Int2::new(col as i32, row as i32))
                        .and_then(|tile| strip_tile_rect(tile, tile_size, margin, spacing))
                        .is_some_and(|rect| has_opaque_pixel(image, rect))
                })
                .collect()
        })
        .collect()
}

/// Pixel rect of a tileset tile; `None` outside the i32 pixel range
fn strip_tile_rect(tile: Int2, tile_size: Int2, margin: u32, spacing: u32) -> Option<PixelRect> {
    let pixel = |cell: i32, size: i32| {
        let offset = i64::from(margin) + i64::from(cell) * (i64::from(size) + i64::from(spacing));
        i32::try_from(offset).ok()
    };
    Some(PixelRect::new(
        pixel(tile.x, tile_size.x)?,
        pixel(tile.y, tile_size.y)?,
        tile_size.x,
        tile_size.y,
    ))
}

/// Rescan `side` against the tileset image, one row per depth level of `category`
pub fn refresh_valid_tiles(
    side: &mut SideSourceConfig,
    category: SideCategory,
    image: &RgbaImage,
    meta: &TilesetMetadata,
) {
    side.valid_tiles = validate_side_tiles(
        image,
        side,
        SideSourceConfig::rows_for(category),
        meta.tile_size(),
        meta.margin,
        meta.spacing,
    );
    debug!(
        "Scanned {} strip at {}: {:?} valid columns per row",
        category.as_str(),
        side.rect_origin,
        (0..side.valid_tiles.len())
            .map(|row| side.valid_columns(row).len())
            .collect::<Vec<_>>()
    );
}

/// Rescan both side strips of a tileset's autotile config
pub fn refresh_all_valid_tiles(
    config: &mut TilesetAutotileConfig,
    image: &RgbaImage,
    meta: &TilesetMetadata,
) {
    for category in SideCategory::ALL {
        refresh_valid_tiles(config.side_mut(category), category, image, meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn seeded_rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    fn side_cell(category: SideCategory, top_y: i32) -> TileCell {
        TileCell::side("ts", category, 0, top_y, 0)
    }

    #[test]
    fn priority_order() {
        use AutotileCategory::*;
        assert!(can_override(None, GroundSide));
        assert!(can_override(Some(GroundSide), WallTop));
        assert!(can_override(Some(Ground), WallSide));
        assert!(!can_override(Some(WallSide), GroundSide));
        assert!(!can_override(Some(WallTop), GroundSide));
        assert!(!can_override(Some(Ground), Ground));
    }

    #[test]
    fn ground_side_never_overrides_wall_cells() {
        let wall_side = side_cell(SideCategory::WallSide, 0);
        assert!(!can_place_side_tile(Some(&wall_side), SideCategory::GroundSide, 5, None));
        let wall_top = TileCell::top("ts", TopCategory::WallTop, 0);
        assert!(!can_place_side_tile(Some(&wall_top), SideCategory::GroundSide, 5, None));
    }

    #[test]
    fn wall_side_overrides_ground_cells() {
        let ground_side = side_cell(SideCategory::GroundSide, 0);
        assert!(can_place_side_tile(Some(&ground_side), SideCategory::WallSide, 0, None));
        let ground = TileCell::top("ts", TopCategory::Ground, 0);
        assert!(can_place_side_tile(Some(&ground), SideCategory::WallSide, 0, None));
    }

    #[test]
    fn manual_cells_always_block() {
        let manual = TileCell::manual("ts", 1);
        assert!(!can_place_side_tile(Some(&manual), SideCategory::WallSide, 0, None));
        assert!(should_block_side_placement(Some(&manual), SideCategory::WallSide));
        assert!(!should_block_side_placement(None, SideCategory::GroundSide));
    }

    #[test]
    fn same_category_lower_owner_wins() {
        let owned = side_cell(SideCategory::GroundSide, 3);
        assert!(can_place_side_tile(Some(&owned), SideCategory::GroundSide, 3, Some("ts")));
        assert!(can_place_side_tile(Some(&owned), SideCategory::GroundSide, 4, Some("ts")));
        assert!(!can_place_side_tile(Some(&owned), SideCategory::GroundSide, 2, Some("ts")));
        assert!(!can_place_side_tile(Some(&owned), SideCategory::GroundSide, 4, Some("other")));

        let mut unowned = owned.clone();
        unowned.side_top_y = None;
        assert!(can_place_side_tile(Some(&unowned), SideCategory::GroundSide, -10, None));
    }

    #[test]
    fn column_choice_by_neighbors() {
        let mut rng = seeded_rng();
        for _ in 0..32 {
            let middle = get_side_column_index(false, false, None, &mut rng);
            assert!(matches!(middle, Some(1..=3)));
            let both = get_side_column_index(true, true, None, &mut rng);
            assert!(matches!(both, Some(1..=3)));
        }
        assert_eq!(get_side_column_index(true, false, None, &mut rng), Some(4));
        assert_eq!(get_side_column_index(false, true, None, &mut rng), Some(0));
    }

    #[test]
    fn column_choice_filters_and_falls_back() {
        let mut rng = seeded_rng();
        let row = [true, false, true, false, false];
        for _ in 0..16 {
            assert_eq!(get_side_column_index(false, false, Some(&row), &mut rng), Some(2));
        }
        // Right end missing: fall back to any valid column
        let picked = get_side_column_index(true, false, Some(&row), &mut rng);
        assert!(matches!(picked, Some(0) | Some(2)));

        let empty = [false; 5];
        assert_eq!(get_side_column_index(false, true, Some(&empty), &mut rng), None);
    }

    #[test]
    fn tile_index_and_columns() {
        assert_eq!(side_tile_index(2, 1, Int2::new(14, 0), 20), Some(20 + 16));
        assert_eq!(side_tile_index(0, 0, Int2::new(0, 3), 12), Some(36));

        let meta = TilesetMetadata::new(16, 16);
        assert_eq!(tileset_columns(&meta, 320), 20);
        let spaced = TilesetMetadata::new(16, 16).with_margin_spacing(1, 2);
        // (322 - 2 + 2) / 18
        assert_eq!(tileset_columns(&spaced, 322), 17);
        assert_eq!(tileset_columns(&meta, 0), 0);
    }

    #[test]
    fn tile_index_outside_tileset() {
        // Above or left of the image
        assert_eq!(side_tile_index(0, 0, Int2::new(0, -1), 20), None);
        assert_eq!(side_tile_index(0, 1, Int2::new(0, -1), 20), Some(0));
        assert_eq!(side_tile_index(1, 0, Int2::new(-2, 0), 20), None);
        assert_eq!(side_tile_index(2, 0, Int2::new(-2, 0), 20), Some(0));
        // Right of the last column
        assert_eq!(side_tile_index(4, 0, Int2::new(16, 0), 20), None);
        assert_eq!(side_tile_index(0, 0, Int2::new(0, 0), 0), None);
        // Index past u32
        assert_eq!(side_tile_index(0, 0, Int2::new(0, i32::MAX), 20), None);
    }

    #[test]
    fn column_recovered_from_index() {
        let origin = Int2::new(14, 0);
        for level in 0..4 {
            for column in 0..SIDE_COLUMNS {
                let index = side_tile_index(column, level, origin, 20).unwrap();
                assert_eq!(side_column_of_index(index, level, origin, 20), Some(column));
            }
        }
        let other_row = side_tile_index(1, 2, origin, 20).unwrap();
        assert_eq!(side_column_of_index(other_row, 1, origin, 20), None);
        assert_eq!(side_column_of_index(5, 0, origin, 20), None);
        assert_eq!(side_column_of_index(5, 0, origin, 0), None);
    }

    #[test]
    fn column_options_list() {
        assert_eq!(side_column_options(false, false, None), vec![1, 2, 3]);
        let row = [true, true, false, false, false];
        assert_eq!(side_column_options(false, false, Some(&row)), vec![1]);
        assert_eq!(side_column_options(true, false, Some(&row)), vec![0, 1]);
    }

    #[test]
    fn top_tile_lookup() {
        let mut grid = TileGrid::new();
        grid.insert(GridPos::new(1, 1), TileCell::top("ts", TopCategory::Ground, 0));
        assert!(is_top_tile_at(&grid, GridPos::new(1, 1), TopCategory::Ground, None));
        assert!(is_top_tile_at(&grid, GridPos::new(1, 1), TopCategory::Ground, Some("ts")));
        assert!(!is_top_tile_at(&grid, GridPos::new(1, 1), TopCategory::Ground, Some("x")));
        assert!(!is_top_tile_at(&grid, GridPos::new(1, 1), TopCategory::WallTop, None));
        assert!(!is_top_tile_at(&grid, GridPos::new(0, 1), TopCategory::Ground, None));
    }

    #[test]
    fn validate_strip_with_margin_and_spacing() {
        // 4px tiles, margin 1, spacing 1: tile (c, r) starts at 1 + 5c, 1 + 5r
        let mut image = RgbaImage::new(1 + 5 * 5, 1 + 5 * 2);
        image.put_pixel(1 + 5 * 3 + 2, 1 + 5 + 3, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 1, Rgba([0, 0, 0, 10]));

        let config = SideSourceConfig::new(Int2::new(0, 0), 2);
        let valid = validate_side_tiles(&image, &config, 2, Int2::new(4, 4), 1, 1);

        assert_eq!(valid.len(), 2);
        assert_eq!(valid[0], vec![true, false, false, false, false]);
        assert_eq!(valid[1], vec![false, false, false, true, false]);
    }

    #[test]
    fn validate_strip_far_outside_pixel_range() {
        let image = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        let config = SideSourceConfig::new(Int2::new(i32::MAX / 4, 0), 2);
        let valid = validate_side_tiles(&image, &config, 2, Int2::new(16, 16), 0, 0);
        assert_eq!(valid, vec![vec![false; SIDE_COLUMNS]; 2]);

        let edge = SideSourceConfig::new(Int2::new(i32::MAX - 2, 0), 1);
        let valid = validate_side_tiles(&image, &edge, 1, Int2::new(16, 16), 0, 0);
        assert_eq!(valid, vec![vec![false; SIDE_COLUMNS]]);
    }

    #[test]
    fn rescan_marks_transparent_columns() {
        // 4px tiles; ground strip at (14, 0) with its middle column left empty
        let image = RgbaImage::from_fn(19 * 4, 9 * 4, |x, _| {
            Rgba([0, 0, 0, if x / 4 == 16 { 0 } else { 255 }])
        });
        let meta = TilesetMetadata::new(4, 4);
        let mut config = TilesetAutotileConfig::default();
        config.wall_side.valid_tiles.clear();

        refresh_all_valid_tiles(&mut config, &image, &meta);

        assert_eq!(config.ground_side.valid_tiles.len(), 4);
        for row in 0..4 {
            assert_eq!(config.ground_side.valid_columns(row), vec![0, 1, 3, 4]);
        }
        assert_eq!(config.wall_side.valid_tiles, vec![vec![true; SIDE_COLUMNS]; 2]);
    }
}
