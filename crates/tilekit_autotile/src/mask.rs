//! Neighbor masks for top tiles
//!
//! Top cells store the gated 8-bit mask of same-category, same-tileset
//! neighbors in `TileCell::index`. The mask is the [`BlobTileType`] value.
//!
//! [`BlobTileType`]: crate::types::BlobTileType

use crate::types::{NeighborPresence, TileQuadrant};
use tilekit_core::{AutotileCategory, GridPos, TileGrid};

/// Neighbor bits, clockwise from north. The values are the
/// [`BlobTileType`](crate::types::BlobTileType) discriminants, so y grows
/// downward and N is `y - 1`.
pub mod neighbors {
    pub const N: u8 = 1 << 0;
    pub const NE: u8 = 1 << 1;
    pub const E: u8 = 1 << 2;
    pub const SE: u8 = 1 << 3;
    pub const S: u8 = 1 << 4;
    pub const SW: u8 = 1 << 5;
    pub const W: u8 = 1 << 6;
    pub const NW: u8 = 1 << 7;

    /// Direction flag with its grid offset, in bit order
    pub const OFFSETS: [(u8, i32, i32); 8] = [
        (N, 0, -1),
        (NE, 1, -1),
        (E, 1, 0),
        (SE, 1, 1),
        (S, 0, 1),
        (SW, -1, 1),
        (W, -1, 0),
        (NW, -1, -1),
    ];
}

/// The diagonal neighbor touching a quadrant's outer corner, and the two edge
/// neighbors along that quadrant's sides
pub const fn quadrant_neighbors(quadrant: TileQuadrant) -> Option<(u8, u8)> {
    use neighbors::*;
    match quadrant {
        TileQuadrant::Q1 => Some((NW, N | W)),
        TileQuadrant::Q2 => Some((NE, N | E)),
        TileQuadrant::Q3 => Some((SW, S | W)),
        TileQuadrant::Q4 => Some((SE, S | E)),
        TileQuadrant::All => None,
    }
}

/// Drop diagonals that cannot change how the tile is drawn.
///
/// A quadrant with a missing edge neighbor is drawn as an outer corner or a
/// border whatever its diagonal holds. Only when both edges are present does
/// the diagonal pick between a full and an inner-corner quadrant, so only then
/// is its bit kept.
pub fn gate_mask(raw: u8) -> u8 {
    TileQuadrant::CORNERS
        .into_iter()
        .filter_map(quadrant_neighbors)
        .filter(|&(_, edges)| raw & edges != edges)
        .fold(raw, |mask, (diagonal, _)| mask & !diagonal)
}

/// Gated mask of an occupancy pattern
pub fn blob_mask_from_neighbors(presence: &NeighborPresence) -> u8 {
    use neighbors::*;

    let flags = [
        (presence.top, N),
        (presence.top_right, NE),
        (presence.right, E),
        (presence.bottom_right, SE),
        (presence.bottom, S),
        (presence.bottom_left, SW),
        (presence.left, W),
        (presence.top_left, NW),
    ];
    let raw = flags
        .iter()
        .filter(|(present, _)| *present)
        .fold(0u8, |acc, (_, bit)| acc | bit);

    gate_mask(raw)
}

/// Gated mask of the cell at (x, y), given a "same terrain" predicate
pub fn calculate_mask<F>(x: i32, y: i32, is_same: F) -> u8
where
    F: Fn(i32, i32) -> bool,
{
    let mut raw = 0u8;
    for (bit, dx, dy) in neighbors::OFFSETS {
        if is_same(x + dx, y + dy) {
            raw |= bit;
        }
    }
    gate_mask(raw)
}

/// Which of the 8 neighbors share `category` (and `tileset_id`, when given).
///
/// Absent cells count as not present.
pub fn neighbor_presence(
    grid: &TileGrid,
    pos: GridPos,
    category: AutotileCategory,
    tileset_id: Option<&str>,
) -> NeighborPresence {
    let has = |dx: i32, dy: i32| {
        grid.get(pos.offset(dx, dy)).is_some_and(|cell| {
            cell.autotile_category == Some(category)
                && tileset_id.map_or(true, |id| cell.tileset_id == id)
        })
    };

    NeighborPresence {
        top: has(0, -1),
        top_right: has(1, -1),
        right: has(1, 0),
        bottom_right: has(1, 1),
        bottom: has(0, 1),
        bottom_left: has(-1, 1),
        left: has(-1, 0),
        top_left: has(-1, -1),
    }
}

/// Mask a top cell at `pos` should hold, or `None` if it is not a top cell
fn compute_mask(grid: &TileGrid, pos: GridPos) -> Option<u8> {
    let cell = grid.get(pos)?;
    let category = cell.top_category()?;
    let presence = neighbor_presence(grid, pos, category.into(), Some(&cell.tileset_id));
    Some(blob_mask_from_neighbors(&presence))
}

/// Recompute the mask of one top cell. Returns whether it changed.
pub fn refresh_mask(grid: &mut TileGrid, pos: GridPos) -> bool {
    let Some(mask) = compute_mask(grid, pos) else {
        return false;
    };
    match grid.get_mut(pos) {
        Some(cell) if cell.index != mask as u32 => {
            cell.index = mask as u32;
            true
        }
        _ => false,
    }
}

/// Recompute `pos` and its 8 neighbors after a placement or erase there
pub fn refresh_masks_around(grid: &mut TileGrid, pos: GridPos) {
    let mut updates: Vec<(GridPos, u8)> = Vec::with_capacity(9);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let p = pos.offset(dx, dy);
            if let Some(mask) = compute_mask(grid, p) {
                updates.push((p, mask));
            }
        }
    }
    for (p, mask) in updates {
        if let Some(cell) = grid.get_mut(p) {
            cell.index = mask as u32;
        }
    }
}

/// Recompute every top cell from scratch. Returns how many cells changed.
pub fn recompute_all_masks(grid: &mut TileGrid) -> usize {
    let updates: Vec<(GridPos, u8)> = grid
        .positions()
        .filter_map(|p| compute_mask(grid, p).map(|mask| (p, mask)))
        .collect();

    let mut changed = 0;
    for (p, mask) in updates {
        if let Some(cell) = grid.get_mut(p) {
            if cell.index != mask as u32 {
                cell.index = mask as u32;
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlobTileType;
    use std::collections::HashSet;
    use tilekit_core::{TileCell, TopCategory};

    fn ground(grid: &mut TileGrid, x: i32, y: i32) {
        grid.insert(GridPos::new(x, y), TileCell::top("ts", TopCategory::Ground, 0));
    }

    #[test]
    fn test_all_raw_patterns_reduce_to_47_blob_masks() {
        let mut seen = HashSet::new();
        for raw in 0..=255u8 {
            let mask = blob_mask_from_neighbors(&NeighborPresence::from_bits(raw));
            assert!(BlobTileType::from_mask(mask).is_some(), "mask {mask} from {raw}");
            seen.insert(mask);
        }
        assert_eq!(seen.len(), 47);
    }

    #[test]
    fn test_cell_masks_are_exactly_the_blob_masks() {
        for raw in 0..=255u8 {
            let cell = TileCell::top("ts", TopCategory::Ground, raw);
            assert_eq!(cell.mask().is_some(), BlobTileType::from_mask(raw).is_some(), "{raw}");
        }
    }

    #[test]
    fn test_gate_keeps_diagonals_between_present_edges() {
        use neighbors::*;
        assert_eq!(gate_mask(0xFF), 0xFF);
        assert_eq!(gate_mask(NE | NW | SE | SW), 0);
        assert_eq!(gate_mask(N | E | NE | SE), N | E | NE);
        for quadrant in TileQuadrant::CORNERS {
            let (diagonal, edges) = quadrant_neighbors(quadrant).unwrap();
            assert_eq!(gate_mask(diagonal | edges), diagonal | edges);
        }
        assert_eq!(quadrant_neighbors(TileQuadrant::All), None);
    }

    #[test]
    fn test_diagonal_gating() {
        let presence = NeighborPresence {
            top: true,
            top_left: true,
            left: false,
            ..Default::default()
        };
        assert_eq!(blob_mask_from_neighbors(&presence) & neighbors::NW, 0);

        let presence = NeighborPresence {
            top: true,
            top_left: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(blob_mask_from_neighbors(&presence) & neighbors::NW, neighbors::NW);
    }

    #[test]
    fn test_calculate_mask_matches_gate() {
        use neighbors::*;
        // Everything except the west column
        let mask = calculate_mask(0, 0, |x, _| x >= 0);
        assert_eq!(mask, N | NE | E | SE | S);
        assert_eq!(BlobTileType::from_mask(mask), Some(BlobTileType::BorderLeft));
    }

    #[test]
    fn test_presence_respects_category_and_tileset() {
        let mut grid = TileGrid::new();
        ground(&mut grid, 1, 0);
        grid.insert(GridPos::new(0, -1), TileCell::top("ts", TopCategory::WallTop, 0));
        grid.insert(GridPos::new(-1, 0), TileCell::top("other", TopCategory::Ground, 0));
        grid.insert(GridPos::new(0, 1), TileCell::manual("ts", 3));

        let presence = neighbor_presence(&grid, GridPos::new(0, 0), AutotileCategory::Ground, Some("ts"));
        assert!(presence.right);
        assert!(!presence.top);
        assert!(!presence.left);
        assert!(!presence.bottom);

        let any_tileset = neighbor_presence(&grid, GridPos::new(0, 0), AutotileCategory::Ground, None);
        assert!(any_tileset.left);
    }

    #[test]
    fn test_single_then_pair() {
        let mut grid = TileGrid::new();
        ground(&mut grid, 5, 5);
        refresh_masks_around(&mut grid, GridPos::new(5, 5));
        assert_eq!(grid.get(GridPos::new(5, 5)).unwrap().index, 0);

        ground(&mut grid, 6, 5);
        refresh_masks_around(&mut grid, GridPos::new(6, 5));
        assert_eq!(grid.get(GridPos::new(5, 5)).unwrap().index, neighbors::E as u32);
        assert_eq!(grid.get(GridPos::new(6, 5)).unwrap().index, neighbors::W as u32);
    }

    #[test]
    fn test_refresh_ignores_non_top_cells() {
        let mut grid = TileGrid::new();
        grid.insert(GridPos::new(0, 0), TileCell::manual("ts", 42));
        ground(&mut grid, 1, 0);

        assert!(!refresh_mask(&mut grid, GridPos::new(0, 0)));
        assert_eq!(grid.get(GridPos::new(0, 0)).unwrap().index, 42);
        assert!(!refresh_mask(&mut grid, GridPos::new(9, 9)));
    }

    #[test]
    fn test_incremental_matches_full_recompute() {
        let mut incremental = TileGrid::new();
        let cells = [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1), (1, 2), (3, 3), (2, 2)];
        for (x, y) in cells {
            ground(&mut incremental, x, y);
            refresh_masks_around(&mut incremental, GridPos::new(x, y));
        }
        incremental.remove(GridPos::new(1, 1));
        refresh_masks_around(&mut incremental, GridPos::new(1, 1));

        let mut full = incremental.clone();
        for (_, cell) in full.iter() {
            assert!(cell.top_category().is_some());
        }
        assert_eq!(recompute_all_masks(&mut full), 0);
        assert_eq!(full, incremental);
    }
}
