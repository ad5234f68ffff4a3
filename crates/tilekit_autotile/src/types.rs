//! Autotile vocabulary: blob types, source roles, quadrant features, depth levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quarter of a tile a feature occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileQuadrant {
    /// Top-left
    Q1,
    /// Top-right
    Q2,
    /// Bottom-left
    Q3,
    /// Bottom-right
    Q4,
    /// The whole tile
    All,
}

impl TileQuadrant {
    /// The four corner quadrants, excluding `All`
    pub const CORNERS: [TileQuadrant; 4] = [
        TileQuadrant::Q1,
        TileQuadrant::Q2,
        TileQuadrant::Q3,
        TileQuadrant::Q4,
    ];
}

/// A quadrant-sized visual fragment cut from a source tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileFeatures {
    Full,
    SingleTile,
    CornerQ1,
    CornerQ2,
    CornerQ3,
    CornerQ4,
    BorderLeftQ1,
    BorderLeftQ3,
    BorderRightQ2,
    BorderRightQ4,
    BorderTopQ1,
    BorderTopQ2,
    BorderBottomQ3,
    BorderBottomQ4,
    InnerCornerQ1,
    InnerCornerQ2,
    InnerCornerQ3,
    InnerCornerQ4,
}

impl TileFeatures {
    pub const ALL: [TileFeatures; 18] = [
        TileFeatures::Full,
        TileFeatures::SingleTile,
        TileFeatures::CornerQ1,
        TileFeatures::CornerQ2,
        TileFeatures::CornerQ3,
        TileFeatures::CornerQ4,
        TileFeatures::BorderLeftQ1,
        TileFeatures::BorderLeftQ3,
        TileFeatures::BorderRightQ2,
        TileFeatures::BorderRightQ4,
        TileFeatures::BorderTopQ1,
        TileFeatures::BorderTopQ2,
        TileFeatures::BorderBottomQ3,
        TileFeatures::BorderBottomQ4,
        TileFeatures::InnerCornerQ1,
        TileFeatures::InnerCornerQ2,
        TileFeatures::InnerCornerQ3,
        TileFeatures::InnerCornerQ4,
    ];

    pub const fn quadrant(self) -> TileQuadrant {
        use TileFeatures::*;
        match self {
            CornerQ1 | BorderLeftQ1 | BorderTopQ1 | InnerCornerQ1 => TileQuadrant::Q1,
            CornerQ2 | BorderRightQ2 | BorderTopQ2 | InnerCornerQ2 => TileQuadrant::Q2,
            CornerQ3 | BorderLeftQ3 | BorderBottomQ3 | InnerCornerQ3 => TileQuadrant::Q3,
            CornerQ4 | BorderRightQ4 | BorderBottomQ4 | InnerCornerQ4 => TileQuadrant::Q4,
            Full | SingleTile => TileQuadrant::All,
        }
    }
}

/// A role a source tile can play in the author's tileset
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TopTileType {
    Full,
    Left,
    Right,
    Top,
    Bottom,
    TopLeftCorner,
    TopRightCorner,
    BottomLeftCorner,
    BottomRightCorner,
    InnerCorners,
    SingleTile,
    VerticalBridge,
    VerticalBridgeTop,
    VerticalBridgeBottom,
    HorizontalBridge,
    HorizontalBridgeLeft,
    HorizontalBridgeRight,
}

impl TopTileType {
    /// Slicing order used when building the feature library
    pub const ALL: [TopTileType; 17] = [
        TopTileType::Full,
        TopTileType::Left,
        TopTileType::Right,
        TopTileType::Top,
        TopTileType::Bottom,
        TopTileType::TopLeftCorner,
        TopTileType::TopRightCorner,
        TopTileType::BottomLeftCorner,
        TopTileType::BottomRightCorner,
        TopTileType::InnerCorners,
        TopTileType::SingleTile,
        TopTileType::VerticalBridge,
        TopTileType::VerticalBridgeTop,
        TopTileType::VerticalBridgeBottom,
        TopTileType::HorizontalBridge,
        TopTileType::HorizontalBridgeLeft,
        TopTileType::HorizontalBridgeRight,
    ];

    /// Features contained in a source tile of this role, in slicing order
    pub const fn features(self) -> &'static [TileFeatures] {
        use TileFeatures::*;
        match self {
            TopTileType::Full => &[Full],
            TopTileType::Left => &[BorderLeftQ1, BorderLeftQ3],
            TopTileType::Right => &[BorderRightQ2, BorderRightQ4],
            TopTileType::Top => &[BorderTopQ1, BorderTopQ2],
            TopTileType::Bottom => &[BorderBottomQ3, BorderBottomQ4],
            TopTileType::TopLeftCorner => &[CornerQ1, BorderTopQ2, BorderLeftQ3],
            TopTileType::TopRightCorner => &[CornerQ2, BorderTopQ1, BorderRightQ4],
            TopTileType::BottomLeftCorner => &[CornerQ3, BorderLeftQ1, BorderBottomQ4],
            TopTileType::BottomRightCorner => &[CornerQ4, BorderBottomQ3, BorderRightQ2],
            TopTileType::InnerCorners => {
                &[InnerCornerQ3, InnerCornerQ4, InnerCornerQ1, InnerCornerQ2]
            }
            TopTileType::SingleTile => &[SingleTile],
            TopTileType::VerticalBridge => {
                &[BorderLeftQ1, BorderRightQ2, BorderRightQ4, BorderLeftQ3]
            }
            TopTileType::VerticalBridgeTop => &[CornerQ1, CornerQ2, BorderLeftQ3, BorderRightQ4],
            TopTileType::VerticalBridgeBottom => {
                &[CornerQ3, CornerQ4, BorderLeftQ1, BorderRightQ2]
            }
            TopTileType::HorizontalBridge => {
                &[BorderTopQ1, BorderTopQ2, BorderBottomQ3, BorderBottomQ4]
            }
            TopTileType::HorizontalBridgeLeft => {
                &[CornerQ1, CornerQ3, BorderTopQ2, BorderBottomQ4]
            }
            TopTileType::HorizontalBridgeRight => {
                &[CornerQ2, CornerQ4, BorderTopQ1, BorderBottomQ3]
            }
        }
    }
}

/// Depth row of a side tile. Not autotiled, only a variant key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum YLevel {
    BottomWallLayer,
    TopWallLayer,
    GroundLayer,
    UndergroundLayer1,
    UndergroundLayer2,
    UndergroundLayer3,
}

impl YLevel {
    /// Order side tiles are sliced and packed in
    pub const ALL: [YLevel; 6] = [
        YLevel::BottomWallLayer,
        YLevel::TopWallLayer,
        YLevel::GroundLayer,
        YLevel::UndergroundLayer1,
        YLevel::UndergroundLayer2,
        YLevel::UndergroundLayer3,
    ];

    /// Height relative to the ground plane
    pub const fn elevation(self) -> i32 {
        match self {
            YLevel::TopWallLayer => 2,
            YLevel::BottomWallLayer => 1,
            YLevel::GroundLayer => 0,
            YLevel::UndergroundLayer1 => -1,
            YLevel::UndergroundLayer2 => -2,
            YLevel::UndergroundLayer3 => -3,
        }
    }
}

/// One of the 47 distinct neighbor configurations.
///
/// The discriminant is the gated 8-bit neighbor mask itself
/// (N=1, NE=2, E=4, SE=8, S=16, SW=32, W=64, NW=128).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum BlobTileType {
    SingleTile = 0,
    BothCornersBottom = 1,
    BothCornersLeft = 4,
    BottomLeftCornerTopRightInnerCorner = 5,
    CornerBottomLeft = 7,
    BothCornersTop = 16,
    BridgeVertical = 17,
    TopLeftCornerBottomRightInnerCorner = 20,
    InnerCornersRightBorderLeft = 21,
    LeftBorderBottomRightInnerCorner = 23,
    CornerTopLeft = 28,
    LeftBorderTopRightInnerCorner = 29,
    BorderLeft = 31,
    BothCornersRight = 64,
    BottomRightCornerTopLeftInnerCorner = 65,
    BridgeHorizontal = 68,
    InnerCornersTopBorderBottom = 69,
    BottomBorderTopLeftInnerCorner = 71,
    TopRightCornerBottomLeftInnerCorner = 80,
    InnerCornersLeftBorderRight = 81,
    InnerCornersBottomBorderTop = 84,
    AllInnerCorners = 85,
    ThreeInnerCornersNotTopRight = 87,
    TopBorderBottomLeftInnerCorner = 92,
    ThreeInnerCornersNotBottomRight = 93,
    BothInnerCornersLeft = 95,
    CornerTopRight = 112,
    RightBorderTopLeftInnerCorner = 113,
    TopBorderBottomRightInnerCorner = 116,
    ThreeInnerCornersNotBottomLeft = 117,
    InnerCornerTopLeftBottomRight = 119,
    BorderTop = 124,
    BothInnerCornersTop = 125,
    TopLeftInnerCorner = 127,
    CornerBottomRight = 193,
    BottomBorderTopRightInnerCorner = 197,
    BorderBottom = 199,
    RightBorderBottomLeftInnerCorner = 209,
    ThreeInnerCornersNotTopLeft = 213,
    BothInnerCornersBottom = 215,
    InnerCornerTopRightBottomLeft = 221,
    BottomLeftInnerCorner = 223,
    BorderRight = 241,
    BothInnerCornersRight = 245,
    BottomRightInnerCorner = 247,
    TopRightInnerCorner = 253,
    Full = 255,
}

impl BlobTileType {
    /// All 47 blob types in ascending mask order
    pub const ALL: [BlobTileType; 47] = [
        BlobTileType::SingleTile,
        BlobTileType::BothCornersBottom,
        BlobTileType::BothCornersLeft,
        BlobTileType::BottomLeftCornerTopRightInnerCorner,
        BlobTileType::CornerBottomLeft,
        BlobTileType::BothCornersTop,
        BlobTileType::BridgeVertical,
        BlobTileType::TopLeftCornerBottomRightInnerCorner,
        BlobTileType::InnerCornersRightBorderLeft,
        BlobTileType::LeftBorderBottomRightInnerCorner,
        BlobTileType::CornerTopLeft,
        BlobTileType::LeftBorderTopRightInnerCorner,
        BlobTileType::BorderLeft,
        BlobTileType::BothCornersRight,
        BlobTileType::BottomRightCornerTopLeftInnerCorner,
        BlobTileType::BridgeHorizontal,
        BlobTileType::InnerCornersTopBorderBottom,
        BlobTileType::BottomBorderTopLeftInnerCorner,
        BlobTileType::TopRightCornerBottomLeftInnerCorner,
        BlobTileType::InnerCornersLeftBorderRight,
        BlobTileType::InnerCornersBottomBorderTop,
        BlobTileType::AllInnerCorners,
        BlobTileType::ThreeInnerCornersNotTopRight,
        BlobTileType::TopBorderBottomLeftInnerCorner,
        BlobTileType::ThreeInnerCornersNotBottomRight,
        BlobTileType::BothInnerCornersLeft,
        BlobTileType::CornerTopRight,
        BlobTileType::RightBorderTopLeftInnerCorner,
        BlobTileType::TopBorderBottomRightInnerCorner,
        BlobTileType::ThreeInnerCornersNotBottomLeft,
        BlobTileType::InnerCornerTopLeftBottomRight,
        BlobTileType::BorderTop,
        BlobTileType::BothInnerCornersTop,
        BlobTileType::TopLeftInnerCorner,
        BlobTileType::CornerBottomRight,
        BlobTileType::BottomBorderTopRightInnerCorner,
        BlobTileType::BorderBottom,
        BlobTileType::RightBorderBottomLeftInnerCorner,
        BlobTileType::ThreeInnerCornersNotTopLeft,
        BlobTileType::BothInnerCornersBottom,
        BlobTileType::InnerCornerTopRightBottomLeft,
        BlobTileType::BottomLeftInnerCorner,
        BlobTileType::BorderRight,
        BlobTileType::BothInnerCornersRight,
        BlobTileType::BottomRightInnerCorner,
        BlobTileType::TopRightInnerCorner,
        BlobTileType::Full,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Look up the blob type for a gated mask. Ungated masks return `None`.
    pub fn from_mask(mask: u8) -> Option<BlobTileType> {
        Self::ALL
            .binary_search_by_key(&mask, |b| b.mask())
            .ok()
            .map(|i| Self::ALL[i])
    }
}

impl fmt::Display for BlobTileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.mask())
    }
}

/// 8-neighbor occupancy around a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborPresence {
    pub top: bool,
    pub top_right: bool,
    pub right: bool,
    pub bottom_right: bool,
    pub bottom: bool,
    pub bottom_left: bool,
    pub left: bool,
    pub top_left: bool,
}

impl NeighborPresence {
    /// Unpack a raw (ungated) 8-bit neighbor pattern
    pub fn from_bits(bits: u8) -> Self {
        Self {
            top: bits & 1 != 0,
            top_right: bits & 2 != 0,
            right: bits & 4 != 0,
            bottom_right: bits & 8 != 0,
            bottom: bits & 16 != 0,
            bottom_left: bits & 32 != 0,
            left: bits & 64 != 0,
            top_left: bits & 128 != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_all_sorted_and_unique() {
        for pair in BlobTileType::ALL.windows(2) {
            assert!(pair[0].mask() < pair[1].mask());
        }
    }

    #[test]
    fn test_from_mask() {
        assert_eq!(BlobTileType::from_mask(0), Some(BlobTileType::SingleTile));
        assert_eq!(BlobTileType::from_mask(255), Some(BlobTileType::Full));
        assert_eq!(BlobTileType::from_mask(68), Some(BlobTileType::BridgeHorizontal));
        // NE without N and E never survives gating
        assert_eq!(BlobTileType::from_mask(2), None);
        for blob in BlobTileType::ALL {
            assert_eq!(BlobTileType::from_mask(blob.mask()), Some(blob));
        }
    }

    #[test]
    fn test_top_roles_decompose_into_distinct_quadrants() {
        for role in TopTileType::ALL {
            let features = role.features();
            assert!(!features.is_empty());
            for (i, a) in features.iter().enumerate() {
                for b in &features[i + 1..] {
                    assert_ne!(a.quadrant(), b.quadrant(), "{role:?} overlaps");
                }
            }
        }
    }

    #[test]
    fn test_quadrants() {
        assert_eq!(TileFeatures::Full.quadrant(), TileQuadrant::All);
        assert_eq!(TileFeatures::SingleTile.quadrant(), TileQuadrant::All);
        assert_eq!(TileFeatures::BorderTopQ2.quadrant(), TileQuadrant::Q2);
        assert_eq!(TileFeatures::BorderBottomQ3.quadrant(), TileQuadrant::Q3);
        assert_eq!(TileFeatures::InnerCornerQ4.quadrant(), TileQuadrant::Q4);
    }
}
