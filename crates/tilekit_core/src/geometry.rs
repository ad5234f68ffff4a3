//! Integer coordinates and pixel rectangles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// An integer pair.
///
/// Depending on context this is a tile-grid coordinate (`*_origin` fields) or a
/// pixel coordinate / size (multiply a grid coordinate by the tile size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Int2 {
    pub x: i32,
    pub y: i32,
}

impl Int2 {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise product, used to turn a tile-grid position into pixels
    pub const fn scale(self, size: Int2) -> Self {
        Self::new(self.x * size.x, self.y * size.y)
    }

    /// [`Int2::scale`], or `None` if a component overflows
    pub fn checked_scale(self, size: Int2) -> Option<Self> {
        Some(Self::new(
            self.x.checked_mul(size.x)?,
            self.y.checked_mul(size.y)?,
        ))
    }

    pub fn checked_add(self, rhs: Int2) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(rhs.x)?,
            self.y.checked_add(rhs.y)?,
        ))
    }

    /// Both components are divisible by two
    pub const fn is_even(self) -> bool {
        self.x % 2 == 0 && self.y % 2 == 0
    }

    /// Floor-divided half of each component
    pub const fn half(self) -> Self {
        Self::new(self.x.div_euclid(2), self.y.div_euclid(2))
    }
}

impl Add for Int2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Int2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Int2 {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl fmt::Display for Int2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A top-left-origin rectangle in pixels.
///
/// Coordinates are signed so that a malformed configuration (negative origin)
/// can be represented and rejected by bounds checks instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_origin_size(origin: Int2, size: Int2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub const fn origin(&self) -> Int2 {
        Int2::new(self.x, self.y)
    }

    pub const fn size(&self) -> Int2 {
        Int2::new(self.w, self.h)
    }

    /// Check that the rectangle lies entirely inside a `width` x `height` area
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.w >= 0
            && self.h >= 0
            && (self.x as i64 + self.w as i64) <= width as i64
            && (self.y as i64 + self.h as i64) <= height as i64
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.w, self.h, self.x, self.y)
    }
}
