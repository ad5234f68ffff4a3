//! Painting and erasing autotiled cells
//!
//! [`AutotilePainter`] keeps a tile grid consistent after every edit: masks
//! around the edit are refreshed and the side runs below nearby top tiles are
//! re-placed. A side cell whose column still fits is kept, so edits elsewhere
//! never reshuffle existing sides.

use crate::mask::{recompute_all_masks, refresh_mask, refresh_masks_around};
use crate::settings::AutotileSettings;
use crate::sides::{
    can_override, can_place_side_tile, is_top_tile_at, refresh_all_valid_tiles,
    side_column_of_index, side_column_options, side_tile_index, tileset_columns,
};
use image::RgbaImage;
use rand::Rng;
use tilekit_core::{
    AutotileCategory, GridPos, SideCategory, SideSourceConfig, TileCell, TileGrid,
    TilesetAutotileConfig, TilesetMetadata, TopCategory,
};
use tracing::{debug, trace, warn};

/// A side strip and the tileset width its indices are computed against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideSource {
    pub config: SideSourceConfig,
    pub tileset_columns: u32,
}

impl SideSource {
    /// Columns for a level, limited to strip cells that exist in the tileset
    fn options(&self, level: usize, has_left: bool, has_right: bool) -> Vec<usize> {
        let Some(row) = self.config.row(level) else {
            return Vec::new();
        };
        let mut options = side_column_options(has_left, has_right, Some(row));
        options.retain(|&column| self.tile_index(column, level).is_some());
        options
    }

    fn tile_index(&self, column: usize, level: usize) -> Option<u32> {
        side_tile_index(column, level, self.config.rect_origin, self.tileset_columns)
    }

    fn column_of(&self, index: u32, level: usize) -> Option<usize> {
        side_column_of_index(index, level, self.config.rect_origin, self.tileset_columns)
    }
}

/// Whether `cell` is a side tile placed by the `tileset_id` top tile at row `top_y`
fn owns(cell: &TileCell, tileset_id: &str, side: SideCategory, top_y: i32) -> bool {
    cell.tileset_id == tileset_id
        && cell.side_category() == Some(side)
        && cell.side_top_y == Some(top_y)
}

/// Edits one tileset's autotiled cells in a grid
#[derive(Debug, Clone)]
pub struct AutotilePainter {
    tileset_id: String,
    settings: AutotileSettings,
    ground_side: Option<SideSource>,
    wall_side: Option<SideSource>,
}

impl AutotilePainter {
    /// A painter without side strips; top tiles get no sides
    pub fn new(tileset_id: impl Into<String>, settings: AutotileSettings) -> Self {
        Self {
            tileset_id: tileset_id.into(),
            settings,
            ground_side: None,
            wall_side: None,
        }
    }

    /// Use `config` for side tiles of `category`. Disabled strips are ignored.
    pub fn with_side(
        mut self,
        category: SideCategory,
        config: SideSourceConfig,
        tileset_columns: u32,
    ) -> Self {
        if !config.enabled {
            return self;
        }
        if tileset_columns == 0 {
            warn!(
                "Ignoring {} strip for tileset {}: tileset has no columns",
                category.as_str(),
                self.tileset_id
            );
            return self;
        }
        let source = Some(SideSource {
            config,
            tileset_columns,
        });
        match category {
            SideCategory::GroundSide => self.ground_side = source,
            SideCategory::WallSide => self.wall_side = source,
        }
        self
    }

    /// Painter configured from tileset metadata; `image_width` is used when
    /// the metadata carries no column count
    pub fn for_tileset(
        tileset_id: impl Into<String>,
        meta: &TilesetMetadata,
        image_width: u32,
        settings: AutotileSettings,
    ) -> Self {
        let painter = Self::new(tileset_id, settings);
        match &meta.autotile_config {
            Some(config) => painter.with_sides_from(config, meta, image_width),
            None => painter,
        }
    }

    /// Like [`AutotilePainter::for_tileset`], but side strips are rescanned
    /// against `image` first so transparent strip tiles are never placed
    pub fn for_tileset_image(
        tileset_id: impl Into<String>,
        meta: &TilesetMetadata,
        image: &RgbaImage,
        settings: AutotileSettings,
    ) -> Self {
        let painter = Self::new(tileset_id, settings);
        let Some(config) = &meta.autotile_config else {
            return painter;
        };
        let mut config = config.clone();
        refresh_all_valid_tiles(&mut config, image, meta);
        painter.with_sides_from(&config, meta, image.width())
    }

    fn with_sides_from(
        mut self,
        config: &TilesetAutotileConfig,
        meta: &TilesetMetadata,
        image_width: u32,
    ) -> Self {
        let columns = meta
            .cols
            .unwrap_or_else(|| tileset_columns(meta, image_width));
        for side in SideCategory::ALL {
            self = self.with_side(side, config.side(side).clone(), columns);
        }
        self
    }

    pub fn tileset_id(&self) -> &str {
        &self.tileset_id
    }

    pub fn settings(&self) -> &AutotileSettings {
        &self.settings
    }

    pub fn side_source(&self, side: SideCategory) -> Option<&SideSource> {
        match side {
            SideCategory::GroundSide => self.ground_side.as_ref(),
            SideCategory::WallSide => self.wall_side.as_ref(),
        }
    }

    /// Paint a top tile at `pos`.
    ///
    /// Returns `false` when the cell holds a manual tile or a tile the category
    /// may not override (including the same category).
    pub fn paint_top(
        &self,
        grid: &mut TileGrid,
        pos: GridPos,
        category: TopCategory,
        rng: &mut impl Rng,
    ) -> bool {
        if !self.place_top(grid, pos, category) {
            return false;
        }
        refresh_masks_around(grid, pos);
        self.refresh_sides_near(grid, pos, rng);
        true
    }

    /// Paint a `width` x `height` block of top tiles starting at `origin`.
    /// Returns how many cells were painted.
    pub fn paint_rect(
        &self,
        grid: &mut TileGrid,
        origin: GridPos,
        width: u32,
        height: u32,
        category: TopCategory,
        rng: &mut impl Rng,
    ) -> usize {
        let mut painted = 0;
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                if self.place_top(grid, origin.offset(dx, dy), category) {
                    painted += 1;
                }
            }
        }
        if painted == 0 {
            return 0;
        }

        // Masks of the block and its one-cell border
        let last = origin.offset(width as i32 - 1, height as i32 - 1);
        for y in origin.y - 1..=last.y + 1 {
            for x in origin.x - 1..=last.x + 1 {
                refresh_mask(grid, GridPos::new(x, y));
            }
        }

        let reach = self.settings.max_side_depth() as i32;
        let tops = self.tops_in(grid, origin.offset(-1, -reach), last.offset(1, 0));
        self.place_sides_for_all(grid, tops, rng);
        painted
    }

    /// Remove the cell at `pos`, cleaning up after it. Returns the removed cell.
    ///
    /// Erasing a top tile removes its own side run. Erasing anything but a side
    /// cell lets nearby runs extend or change end pieces.
    pub fn erase(
        &self,
        grid: &mut TileGrid,
        pos: GridPos,
        rng: &mut impl Rng,
    ) -> Option<TileCell> {
        let removed = grid.remove(pos)?;

        if removed.top_category().is_some() {
            self.remove_owned_sides(grid, pos, &removed);
            refresh_masks_around(grid, pos);
        }
        if removed.side_category().is_none() {
            self.refresh_sides_near(grid, pos, rng);
        }
        Some(removed)
    }

    /// Recompute every mask and side run of this tileset from scratch.
    /// Returns how many masks changed.
    pub fn refresh_all(&self, grid: &mut TileGrid, rng: &mut impl Rng) -> usize {
        let changed = recompute_all_masks(grid);

        let mut tops: Vec<GridPos> = grid
            .iter()
            .filter(|(_, cell)| self.is_own_top(cell))
            .map(|(pos, _)| *pos)
            .collect();
        tops.sort_by_key(|p| (p.y, p.x));
        self.place_sides_for_all(grid, tops, rng);

        debug!(
            "Refreshed autotiles for tileset {}: {changed} masks changed",
            self.tileset_id
        );
        changed
    }

    /// Re-place the side runs of top tiles whose run or end pieces may depend on `pos`
    pub fn refresh_sides_near(&self, grid: &mut TileGrid, pos: GridPos, rng: &mut impl Rng) {
        let tops = self.tops_near(grid, pos);
        self.place_sides_for_all(grid, tops, rng);
    }

    fn is_own_top(&self, cell: &TileCell) -> bool {
        cell.tileset_id == self.tileset_id && cell.top_category().is_some()
    }

    /// Insert a top cell if allowed, clearing the runs of a top tile it replaces
    fn place_top(&self, grid: &mut TileGrid, pos: GridPos, category: TopCategory) -> bool {
        if let Some(existing) = grid.get(pos) {
            if existing.is_manual()
                || !can_override(existing.autotile_category, AutotileCategory::from(category))
            {
                return false;
            }
        }

        let cell = TileCell::top(self.tileset_id.as_str(), category, 0);
        if let Some(replaced) = grid.insert(pos, cell) {
            if replaced.top_category().is_some() {
                self.remove_owned_sides(grid, pos, &replaced);
            }
        }
        true
    }

    /// Top tiles of this tileset in the inclusive box, sorted by (y, x)
    fn tops_in(&self, grid: &TileGrid, min: GridPos, max: GridPos) -> Vec<GridPos> {
        (min.y..=max.y)
            .flat_map(|y| (min.x..=max.x).map(move |x| GridPos::new(x, y)))
            .filter(|&p| grid.get(p).is_some_and(|cell| self.is_own_top(cell)))
            .collect()
    }

    fn tops_near(&self, grid: &TileGrid, pos: GridPos) -> Vec<GridPos> {
        let reach = self.settings.max_side_depth() as i32;
        self.tops_in(grid, pos.offset(-1, -reach), pos.offset(1, 0))
    }

    fn place_sides_for_all(&self, grid: &mut TileGrid, tops: Vec<GridPos>, rng: &mut impl Rng) {
        let mut displaced = Vec::new();
        for top in tops {
            displaced.extend(self.place_sides_for(grid, top, rng));
        }
        // A displaced top tile changes its neighbors' end pieces
        while let Some(pos) = displaced.pop() {
            for top in self.tops_near(grid, pos) {
                displaced.extend(self.place_sides_for(grid, top, rng));
            }
        }
    }

    /// Bring the side run below the top tile at `pos` up to date.
    ///
    /// Returns positions where a side tile replaced a lower-priority top tile.
    fn place_sides_for(
        &self,
        grid: &mut TileGrid,
        pos: GridPos,
        rng: &mut impl Rng,
    ) -> Vec<GridPos> {
        let Some(top) = grid
            .get(pos)
            .filter(|cell| cell.tileset_id == self.tileset_id)
            .and_then(TileCell::top_category)
        else {
            return Vec::new();
        };
        let side = top.side();
        let source = self.side_source(side);
        let tileset = Some(self.tileset_id.as_str());
        let has_left = is_top_tile_at(grid, pos.offset(-1, 0), top, tileset);
        let has_right = is_top_tile_at(grid, pos.offset(1, 0), top, tileset);

        let mut displaced = Vec::new();
        let mut blocked = false;
        for level in 0..self.settings.side_depth(top) {
            let target = pos.offset(0, level as i32 + 1);
            let existing = grid.get(target);
            let owned = existing.is_some_and(|cell| owns(cell, &self.tileset_id, side, pos.y));

            if blocked {
                if owned {
                    grid.remove(target);
                }
                continue;
            }

            let options = source
                .map(|s| s.options(level, has_left, has_right))
                .unwrap_or_default();
            if owned {
                let current = existing
                    .zip(source)
                    .and_then(|(cell, s)| s.column_of(cell.index, level));
                if current.is_some_and(|column| options.contains(&column)) {
                    continue;
                }
                if options.is_empty() {
                    grid.remove(target);
                    continue;
                }
            } else if !can_place_side_tile(existing, side, pos.y, tileset) {
                trace!("{side} run below {pos} blocked at {target}");
                blocked = true;
                continue;
            }

            let Some(source) = source else {
                continue;
            };
            if options.is_empty() {
                continue;
            }
            let column = options[rng.gen_range(0..options.len())];
            let Some(index) = source.tile_index(column, level) else {
                continue;
            };
            trace!("{side} level {level} at {target}: column {column}");
            let cell = TileCell::side(self.tileset_id.as_str(), side, index, pos.y, level as u32);

            if let Some(previous) = grid.insert(target, cell) {
                if previous.top_category().is_some() {
                    debug!("Side tile at {target} replaced a top tile");
                    self.remove_owned_sides(grid, target, &previous);
                    refresh_masks_around(grid, target);
                    displaced.push(target);
                }
            }
        }
        displaced
    }

    /// Remove the side cells placed by `top` (which sat at `top_pos`)
    fn remove_owned_sides(&self, grid: &mut TileGrid, top_pos: GridPos, top: &TileCell) -> usize {
        let Some(side) = top.top_category().map(|c| c.side()) else {
            return 0;
        };
        let mut removed = 0;
        for level in 0..self.settings.max_side_depth() {
            let target = top_pos.offset(0, level as i32 + 1);
            if grid
                .get(target)
                .is_some_and(|cell| owns(cell, &top.tileset_id, side, top_pos.y))
            {
                grid.remove(target);
                removed += 1;
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::neighbors;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use image::Rgba;
    use tilekit_core::Int2;

    const COLS: u32 = 20;

    fn seeded_rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    fn painter() -> AutotilePainter {
        AutotilePainter::new("ts", AutotileSettings::default())
            .with_side(SideCategory::GroundSide, SideSourceConfig::default_ground_side(), COLS)
            .with_side(SideCategory::WallSide, SideSourceConfig::default_wall_side(), COLS)
    }

    fn cell(grid: &TileGrid, x: i32, y: i32) -> Option<&TileCell> {
        grid.get(GridPos::new(x, y))
    }

    /// Strip column of the side cell at (x, y)
    fn side_column(painter: &AutotilePainter, grid: &TileGrid, x: i32, y: i32) -> Option<usize> {
        let cell = cell(grid, x, y)?;
        let source = painter.side_source(cell.side_category()?)?;
        source.column_of(cell.index, cell.side_level? as usize)
    }

    #[test]
    fn test_single_top_gets_full_side_run() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        assert!(painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::Ground, &mut rng));
        assert_eq!(cell(&grid, 5, 5).unwrap().mask(), Some(0));

        for level in 0..4 {
            let side = cell(&grid, 5, 6 + level).unwrap();
            assert_eq!(side.side_category(), Some(SideCategory::GroundSide));
            assert_eq!(side.side_top_y, Some(5));
            assert_eq!(side.side_level, Some(level as u32));
            assert!(matches!(side_column(&painter, &grid, 5, 6 + level), Some(1..=3)));
        }
        assert!(cell(&grid, 5, 10).is_none());
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_neighbor_updates_masks_and_end_pieces() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::Ground, &mut rng);
        painter.paint_top(&mut grid, GridPos::new(6, 5), TopCategory::Ground, &mut rng);

        assert_eq!(cell(&grid, 5, 5).unwrap().mask(), Some(neighbors::E));
        assert_eq!(cell(&grid, 6, 5).unwrap().mask(), Some(neighbors::W));
        for y in 6..10 {
            assert_eq!(side_column(&painter, &grid, 5, y), Some(0));
            assert_eq!(side_column(&painter, &grid, 6, y), Some(4));
        }
        // Level 2, column 4 of the strip at (14, 0)
        assert_eq!(cell(&grid, 6, 8).unwrap().index, 2 * COLS + 18);
    }

    #[test]
    fn test_erase_removes_own_run_only() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();
        for x in 5..=7 {
            painter.paint_top(&mut grid, GridPos::new(x, 5), TopCategory::Ground, &mut rng);
        }

        let removed = painter.erase(&mut grid, GridPos::new(6, 5), &mut rng).unwrap();
        assert_eq!(removed.top_category(), Some(TopCategory::Ground));

        for y in 6..10 {
            assert!(cell(&grid, 6, y).is_none());
            assert!(matches!(side_column(&painter, &grid, 5, y), Some(1..=3)));
            assert!(matches!(side_column(&painter, &grid, 7, y), Some(1..=3)));
        }
        assert_eq!(cell(&grid, 5, 5).unwrap().mask(), Some(0));
        assert_eq!(cell(&grid, 7, 5).unwrap().mask(), Some(0));
        assert_eq!(grid.len(), 10);

        assert!(painter.erase(&mut grid, GridPos::new(6, 5), &mut rng).is_none());
    }

    #[test]
    fn test_unrelated_edits_keep_existing_sides() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();
        for x in 0..3 {
            painter.paint_top(&mut grid, GridPos::new(x, 0), TopCategory::Ground, &mut rng);
        }
        let before = grid.clone();

        painter.paint_top(&mut grid, GridPos::new(10, 10), TopCategory::Ground, &mut rng);
        for (pos, cell) in before.iter() {
            assert_eq!(grid.get(*pos), Some(cell));
        }

        // Extending the row only changes the old right end
        painter.paint_top(&mut grid, GridPos::new(3, 0), TopCategory::Ground, &mut rng);
        for y in 1..5 {
            assert_eq!(cell(&grid, 0, y), cell(&before, 0, y));
            assert_eq!(cell(&grid, 1, y), cell(&before, 1, y));
            assert!(matches!(side_column(&painter, &grid, 2, y), Some(1..=3)));
            assert_eq!(side_column(&painter, &grid, 3, y), Some(4));
        }
    }

    #[test]
    fn test_manual_cell_blocks_run() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();
        grid.insert(GridPos::new(5, 7), TileCell::manual("ts", 99));

        painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::Ground, &mut rng);
        assert!(cell(&grid, 5, 6).is_some());
        assert_eq!(cell(&grid, 5, 7).unwrap().index, 99);
        assert!(cell(&grid, 5, 8).is_none());

        // Manual tiles are never painted over
        assert!(!painter.paint_top(&mut grid, GridPos::new(5, 7), TopCategory::WallTop, &mut rng));

        painter.erase(&mut grid, GridPos::new(5, 7), &mut rng);
        for y in 6..10 {
            assert_eq!(cell(&grid, 5, y).unwrap().side_top_y, Some(5));
        }
    }

    #[test]
    fn test_same_category_not_repainted() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        assert!(painter.paint_top(&mut grid, GridPos::new(0, 0), TopCategory::WallTop, &mut rng));
        assert!(!painter.paint_top(&mut grid, GridPos::new(0, 0), TopCategory::WallTop, &mut rng));
        // Ground ranks below wall top
        assert!(!painter.paint_top(&mut grid, GridPos::new(0, 0), TopCategory::Ground, &mut rng));
    }

    #[test]
    fn test_wall_top_replaces_ground_top() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::Ground, &mut rng);
        assert!(painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::WallTop, &mut rng));

        assert_eq!(cell(&grid, 5, 5).unwrap().top_category(), Some(TopCategory::WallTop));
        assert_eq!(cell(&grid, 5, 6).unwrap().side_category(), Some(SideCategory::WallSide));
        assert_eq!(cell(&grid, 5, 7).unwrap().side_category(), Some(SideCategory::WallSide));
        assert!(cell(&grid, 5, 8).is_none());
        assert!(cell(&grid, 5, 9).is_none());
    }

    #[test]
    fn test_wall_side_displaces_ground_top() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        painter.paint_top(&mut grid, GridPos::new(5, 6), TopCategory::Ground, &mut rng);
        painter.paint_top(&mut grid, GridPos::new(6, 6), TopCategory::Ground, &mut rng);
        painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::WallTop, &mut rng);

        let displaced = cell(&grid, 5, 6).unwrap();
        assert_eq!(displaced.side_category(), Some(SideCategory::WallSide));
        assert_eq!(displaced.side_top_y, Some(5));
        assert_eq!(cell(&grid, 5, 7).unwrap().side_category(), Some(SideCategory::WallSide));
        assert!(cell(&grid, 5, 8).is_none());

        // The remaining ground top lost its left neighbor
        assert_eq!(cell(&grid, 6, 6).unwrap().mask(), Some(0));
        assert!(matches!(side_column(&painter, &grid, 6, 7), Some(1..=3)));
    }

    #[test]
    fn test_ground_side_stops_at_wall() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        painter.paint_top(&mut grid, GridPos::new(0, 2), TopCategory::WallTop, &mut rng);
        painter.paint_top(&mut grid, GridPos::new(0, 0), TopCategory::Ground, &mut rng);

        assert_eq!(cell(&grid, 0, 1).unwrap().side_category(), Some(SideCategory::GroundSide));
        assert_eq!(cell(&grid, 0, 2).unwrap().top_category(), Some(TopCategory::WallTop));
        assert_eq!(cell(&grid, 0, 3).unwrap().side_top_y, Some(2));
        assert_eq!(cell(&grid, 0, 4).unwrap().side_top_y, Some(2));
    }

    #[test]
    fn test_invalid_strip_tiles_are_skipped() {
        let mut ground_side = SideSourceConfig::default_ground_side();
        ground_side.valid_tiles[0] = vec![false, false, true, false, false];
        ground_side.valid_tiles[1] = vec![false; 5];
        let painter = AutotilePainter::new("ts", AutotileSettings::default())
            .with_side(SideCategory::GroundSide, ground_side, COLS);
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        for x in 0..3 {
            painter.paint_top(&mut grid, GridPos::new(x, 0), TopCategory::Ground, &mut rng);
        }
        for x in 0..3 {
            assert_eq!(side_column(&painter, &grid, x, 1), Some(2));
            assert!(cell(&grid, x, 2).is_none());
            assert!(cell(&grid, x, 3).is_some());
        }
    }

    #[test]
    fn test_side_depth_from_settings() {
        let settings = AutotileSettings {
            wall_side_depth: 1,
            ..AutotileSettings::default()
        };
        let painter = AutotilePainter::new("ts", settings)
            .with_side(SideCategory::WallSide, SideSourceConfig::default_wall_side(), COLS);
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        painter.paint_top(&mut grid, GridPos::new(0, 0), TopCategory::WallTop, &mut rng);
        assert!(cell(&grid, 0, 1).is_some());
        assert!(cell(&grid, 0, 2).is_none());

        // No ground strip configured: ground tops stand alone
        painter.paint_top(&mut grid, GridPos::new(4, 0), TopCategory::Ground, &mut rng);
        assert!(cell(&grid, 4, 1).is_none());
    }

    #[test]
    fn test_erasing_side_cell_leaves_gap() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();
        painter.paint_top(&mut grid, GridPos::new(0, 0), TopCategory::Ground, &mut rng);

        let removed = painter.erase(&mut grid, GridPos::new(0, 2), &mut rng).unwrap();
        assert_eq!(removed.side_level, Some(1));
        assert!(cell(&grid, 0, 2).is_none());
        assert!(cell(&grid, 0, 3).is_some());
    }

    #[test]
    fn test_paint_rect() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        let painted = painter.paint_rect(&mut grid, GridPos::new(0, 0), 3, 3, TopCategory::Ground, &mut rng);
        assert_eq!(painted, 9);
        assert_eq!(cell(&grid, 1, 1).unwrap().mask(), Some(255));
        assert_eq!(cell(&grid, 0, 0).unwrap().mask(), Some(neighbors::E | neighbors::SE | neighbors::S));

        // Only the bottom row has a side run
        let sides = grid.iter().filter(|(_, c)| c.side_category().is_some()).count();
        assert_eq!(sides, 3 * 4);
        assert_eq!(side_column(&painter, &grid, 0, 3), Some(0));
        assert_eq!(side_column(&painter, &grid, 2, 3), Some(4));

        let mut full = grid.clone();
        assert_eq!(recompute_all_masks(&mut full), 0);

        assert_eq!(painter.paint_rect(&mut grid, GridPos::new(0, 0), 0, 4, TopCategory::Ground, &mut rng), 0);
    }

    #[test]
    fn test_refresh_all_rebuilds_state() {
        let painter = painter();
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();
        for x in 0..3 {
            grid.insert(GridPos::new(x, 0), TileCell::top("ts", TopCategory::Ground, 0));
        }

        let changed = painter.refresh_all(&mut grid, &mut rng);
        assert_eq!(changed, 3);
        assert_eq!(cell(&grid, 1, 0).unwrap().mask(), Some(neighbors::E | neighbors::W));
        assert_eq!(side_column(&painter, &grid, 0, 4), Some(0));
        assert_eq!(grid.len(), 3 + 3 * 4);

        // Already consistent: nothing moves
        let before = grid.clone();
        assert_eq!(painter.refresh_all(&mut grid, &mut rng), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_for_tileset_reads_metadata() {
        let mut config = TilesetAutotileConfig::default();
        config.wall_side.enabled = false;
        let meta = TilesetMetadata::new(16, 16).with_autotile(config);

        let painter = AutotilePainter::for_tileset("ts", &meta, 320, AutotileSettings::default());
        let ground = painter.side_source(SideCategory::GroundSide).unwrap();
        assert_eq!(ground.tileset_columns, 20);
        assert_eq!(ground.config.rect_origin, Int2::new(14, 0));
        assert!(painter.side_source(SideCategory::WallSide).is_none());

        let plain = AutotilePainter::for_tileset("ts", &TilesetMetadata::new(16, 16), 320, AutotileSettings::default());
        assert!(plain.side_source(SideCategory::GroundSide).is_none());
        let no_width = AutotilePainter::for_tileset("ts", &meta, 0, AutotileSettings::default());
        assert!(no_width.side_source(SideCategory::GroundSide).is_none());
    }

    #[test]
    fn test_transparent_strip_column_never_placed() {
        // Ground strip at (14, 0): strip column 2 has no visible pixels
        let image = RgbaImage::from_fn(19 * 4, 9 * 4, |x, _| {
            Rgba([0, 0, 0, if x / 4 == 16 { 0 } else { 255 }])
        });
        let meta = TilesetMetadata::new(4, 4).with_autotile(TilesetAutotileConfig::default());
        let painter =
            AutotilePainter::for_tileset_image("ts", &meta, &image, AutotileSettings::default());
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        for i in 0..20 {
            painter.paint_top(&mut grid, GridPos::new(i * 2, 0), TopCategory::Ground, &mut rng);
        }
        for i in 0..20 {
            for level in 0..4 {
                let column = side_column(&painter, &grid, i * 2, 1 + level);
                assert!(matches!(column, Some(1) | Some(3)), "{column:?}");
            }
        }
    }

    #[test]
    fn test_strip_rows_above_tileset_are_skipped() {
        let painter = AutotilePainter::new("ts", AutotileSettings::default()).with_side(
            SideCategory::GroundSide,
            SideSourceConfig::new(Int2::new(0, -1), 4),
            COLS,
        );
        let mut grid = TileGrid::new();
        let mut rng = seeded_rng();

        painter.paint_top(&mut grid, GridPos::new(5, 5), TopCategory::Ground, &mut rng);

        assert!(cell(&grid, 5, 6).is_none());
        for level in 1..4 {
            let side = cell(&grid, 5, 6 + level).unwrap();
            assert_eq!(side.side_level, Some(level as u32));
            // Strip row `level` sits at tileset row `level - 1`
            assert_eq!(side.index / COLS, level as u32 - 1);
            assert!(matches!(side.index % COLS, 1..=3));
        }
    }
}
