//! The 47 blob recipes: which quadrant features make up each blob tile
//!
//! Table order is atlas packing order.

use crate::types::{BlobTileType, TileFeatures, TopTileType};
use TileFeatures::*;

const TOP_LEFT_CORNER: &[TileFeatures] = &[CornerQ1, BorderTopQ2, BorderLeftQ3];
const TOP_RIGHT_CORNER: &[TileFeatures] = &[CornerQ2, BorderTopQ1, BorderRightQ4];
const BOTTOM_LEFT_CORNER: &[TileFeatures] = &[CornerQ3, BorderLeftQ1, BorderBottomQ4];
const BOTTOM_RIGHT_CORNER: &[TileFeatures] = &[CornerQ4, BorderBottomQ3, BorderRightQ2];

pub const BLOB_TILE_FEATURE_MAP: [(BlobTileType, &[TileFeatures]); 47] = [
    (BlobTileType::SingleTile, &[SingleTile]),
    (BlobTileType::BorderTop, &[BorderTopQ1, BorderTopQ2]),
    (BlobTileType::BorderRight, &[BorderRightQ2, BorderRightQ4]),
    (BlobTileType::BorderBottom, &[BorderBottomQ3, BorderBottomQ4]),
    (BlobTileType::BorderLeft, &[BorderLeftQ1, BorderLeftQ3]),
    (BlobTileType::CornerTopRight, TOP_RIGHT_CORNER),
    (BlobTileType::CornerBottomRight, BOTTOM_RIGHT_CORNER),
    (BlobTileType::CornerBottomLeft, BOTTOM_LEFT_CORNER),
    (BlobTileType::CornerTopLeft, TOP_LEFT_CORNER),
    (
        BlobTileType::BridgeVertical,
        &[BorderLeftQ1, BorderLeftQ3, BorderRightQ2, BorderRightQ4],
    ),
    (
        BlobTileType::BridgeHorizontal,
        &[BorderTopQ1, BorderTopQ2, BorderBottomQ3, BorderBottomQ4],
    ),
    (
        BlobTileType::BothCornersTop,
        &[CornerQ2, CornerQ1, BorderLeftQ3, BorderRightQ4],
    ),
    (
        BlobTileType::BothCornersBottom,
        &[CornerQ4, CornerQ3, BorderLeftQ1, BorderRightQ2],
    ),
    (
        BlobTileType::BothCornersLeft,
        &[CornerQ1, CornerQ3, BorderTopQ2, BorderBottomQ4],
    ),
    (
        BlobTileType::BothCornersRight,
        &[CornerQ2, CornerQ4, BorderTopQ1, BorderBottomQ3],
    ),
    (
        BlobTileType::AllInnerCorners,
        &[InnerCornerQ1, InnerCornerQ2, InnerCornerQ3, InnerCornerQ4],
    ),
    (
        BlobTileType::TopLeftCornerBottomRightInnerCorner,
        &[CornerQ1, BorderTopQ2, BorderLeftQ3, InnerCornerQ4],
    ),
    (
        BlobTileType::TopRightCornerBottomLeftInnerCorner,
        &[CornerQ2, BorderTopQ1, BorderRightQ4, InnerCornerQ3],
    ),
    (
        BlobTileType::BottomLeftCornerTopRightInnerCorner,
        &[CornerQ3, BorderLeftQ1, BorderBottomQ4, InnerCornerQ2],
    ),
    (
        BlobTileType::BottomRightCornerTopLeftInnerCorner,
        &[CornerQ4, BorderBottomQ3, BorderRightQ2, InnerCornerQ1],
    ),
    (
        BlobTileType::InnerCornersBottomBorderTop,
        &[InnerCornerQ3, InnerCornerQ4, BorderTopQ1, BorderTopQ2],
    ),
    (
        BlobTileType::InnerCornersTopBorderBottom,
        &[InnerCornerQ1, InnerCornerQ2, BorderBottomQ3, BorderBottomQ4],
    ),
    (
        BlobTileType::InnerCornersRightBorderLeft,
        &[InnerCornerQ2, InnerCornerQ4, BorderLeftQ1, BorderLeftQ3],
    ),
    (
        BlobTileType::InnerCornersLeftBorderRight,
        &[InnerCornerQ1, InnerCornerQ3, BorderRightQ2, BorderRightQ4],
    ),
    (BlobTileType::InnerCornerTopLeftBottomRight, &[InnerCornerQ1, InnerCornerQ4]),
    (BlobTileType::InnerCornerTopRightBottomLeft, &[InnerCornerQ2, InnerCornerQ3]),
    (
        BlobTileType::ThreeInnerCornersNotTopLeft,
        &[InnerCornerQ2, InnerCornerQ3, InnerCornerQ4],
    ),
    (
        BlobTileType::ThreeInnerCornersNotTopRight,
        &[InnerCornerQ1, InnerCornerQ3, InnerCornerQ4],
    ),
    (
        BlobTileType::ThreeInnerCornersNotBottomRight,
        &[InnerCornerQ1, InnerCornerQ2, InnerCornerQ3],
    ),
    (
        BlobTileType::ThreeInnerCornersNotBottomLeft,
        &[InnerCornerQ1, InnerCornerQ2, InnerCornerQ4],
    ),
    (
        BlobTileType::LeftBorderBottomRightInnerCorner,
        &[BorderLeftQ1, BorderLeftQ3, InnerCornerQ4],
    ),
    (
        BlobTileType::LeftBorderTopRightInnerCorner,
        &[BorderLeftQ1, BorderLeftQ3, InnerCornerQ2],
    ),
    (
        BlobTileType::RightBorderBottomLeftInnerCorner,
        &[BorderRightQ2, BorderRightQ4, InnerCornerQ3],
    ),
    (
        BlobTileType::RightBorderTopLeftInnerCorner,
        &[BorderRightQ2, BorderRightQ4, InnerCornerQ1],
    ),
    (
        BlobTileType::TopBorderBottomRightInnerCorner,
        &[BorderTopQ1, BorderTopQ2, InnerCornerQ4],
    ),
    (
        BlobTileType::TopBorderBottomLeftInnerCorner,
        &[BorderTopQ1, BorderTopQ2, InnerCornerQ3],
    ),
    (
        BlobTileType::BottomBorderTopRightInnerCorner,
        &[BorderBottomQ3, BorderBottomQ4, InnerCornerQ2],
    ),
    (
        BlobTileType::BottomBorderTopLeftInnerCorner,
        &[BorderBottomQ3, BorderBottomQ4, InnerCornerQ1],
    ),
    (BlobTileType::BothInnerCornersBottom, &[InnerCornerQ3, InnerCornerQ4]),
    (BlobTileType::BothInnerCornersTop, &[InnerCornerQ1, InnerCornerQ2]),
    (BlobTileType::BothInnerCornersLeft, &[InnerCornerQ1, InnerCornerQ3]),
    (BlobTileType::BothInnerCornersRight, &[InnerCornerQ2, InnerCornerQ4]),
    (BlobTileType::BottomRightInnerCorner, &[InnerCornerQ4]),
    (BlobTileType::BottomLeftInnerCorner, &[InnerCornerQ3]),
    (BlobTileType::TopRightInnerCorner, &[InnerCornerQ2]),
    (BlobTileType::TopLeftInnerCorner, &[InnerCornerQ1]),
    (BlobTileType::Full, &[Full]),
];

/// Features that make up a blob tile, in blit order
pub fn required_features(blob: BlobTileType) -> &'static [TileFeatures] {
    BLOB_TILE_FEATURE_MAP
        .iter()
        .find(|(b, _)| *b == blob)
        .map(|(_, features)| *features)
        .unwrap_or(&[])
}

/// Position of a blob type in packing order (0 for an unknown type)
pub fn atlas_order_index(blob: BlobTileType) -> usize {
    BLOB_TILE_FEATURE_MAP
        .iter()
        .position(|(b, _)| *b == blob)
        .unwrap_or(0)
}

/// Pure straight edges, which also draw their art from the matching bridge tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StraightBorder {
    Top,
    Bottom,
    Left,
    Right,
}

impl StraightBorder {
    /// Recognize a required list that is exactly one border's two features
    pub fn classify(required: &[TileFeatures]) -> Option<StraightBorder> {
        if required.len() != 2 {
            return None;
        }
        let has = |a: TileFeatures, b: TileFeatures| required.contains(&a) && required.contains(&b);
        if has(BorderBottomQ3, BorderBottomQ4) {
            Some(StraightBorder::Bottom)
        } else if has(BorderTopQ1, BorderTopQ2) {
            Some(StraightBorder::Top)
        } else if has(BorderLeftQ1, BorderLeftQ3) {
            Some(StraightBorder::Left)
        } else if has(BorderRightQ2, BorderRightQ4) {
            Some(StraightBorder::Right)
        } else {
            None
        }
    }

    /// Source roles whose tiles supply this border, edge first
    pub fn source_roles(self) -> [TopTileType; 2] {
        match self {
            StraightBorder::Top => [TopTileType::Top, TopTileType::HorizontalBridge],
            StraightBorder::Bottom => [TopTileType::Bottom, TopTileType::HorizontalBridge],
            StraightBorder::Left => [TopTileType::Left, TopTileType::VerticalBridge],
            StraightBorder::Right => [TopTileType::Right, TopTileType::VerticalBridge],
        }
    }
}
