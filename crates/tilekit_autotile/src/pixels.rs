//! Bounds-checked crop and blit on RGBA buffers (top-left origin)

use crate::error::{AutotileError, Result};
use crate::geometry::quadrant_rect;
use crate::types::TileQuadrant;
use image::{imageops, RgbaImage};
use tilekit_core::{Int2, PixelRect};

/// Copy `rect` out of `src`. Any part outside `src` is an error.
pub fn crop(src: &RgbaImage, rect: PixelRect) -> Result<RgbaImage> {
    if !rect.fits_within(src.width(), src.height()) {
        return Err(AutotileError::CropOutOfBounds {
            rect,
            width: src.width(),
            height: src.height(),
        });
    }
    Ok(imageops::crop_imm(src, rect.x as u32, rect.y as u32, rect.w as u32, rect.h as u32).to_image())
}

/// Overwrite the region of `dst` at `pos` with `src`, alpha included
pub fn blit(dst: &mut RgbaImage, src: &RgbaImage, pos: Int2) -> Result<()> {
    let target = PixelRect::new(pos.x, pos.y, src.width() as i32, src.height() as i32);
    if !target.fits_within(dst.width(), dst.height()) {
        return Err(AutotileError::BlitOutOfBounds {
            pos,
            src_w: src.width(),
            src_h: src.height(),
            dst_w: dst.width(),
            dst_h: dst.height(),
        });
    }
    for (x, y, pixel) in src.enumerate_pixels() {
        dst.put_pixel(pos.x as u32 + x, pos.y as u32 + y, *pixel);
    }
    Ok(())
}

/// Cut one quadrant out of a tile-sized image
pub fn slice_quadrant(tile: &RgbaImage, quadrant: TileQuadrant, tile_size: Int2) -> Result<RgbaImage> {
    crop(tile, quadrant_rect(quadrant, tile_size))
}

/// Whether any pixel of `rect` (clipped to the image) has non-zero alpha
pub fn has_opaque_pixel(image: &RgbaImage, rect: PixelRect) -> bool {
    let x0 = rect.x.max(0) as u32;
    let y0 = rect.y.max(0) as u32;
    let x1 = (rect.x as i64 + rect.w as i64).clamp(0, image.width() as i64) as u32;
    let y1 = (rect.y as i64 + rect.h as i64).clamp(0, image.height() as i64) as u32;

    (y0..y1).any(|y| (x0..x1).any(|x| image.get_pixel(x, y)[3] > 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn test_crop_copies_region() {
        let src = checker(8, 8);
        let out = crop(&src, PixelRect::new(2, 3, 4, 2)).unwrap();
        assert_eq!(out.dimensions(), (4, 2));
        assert_eq!(*out.get_pixel(0, 0), Rgba([2, 3, 0, 255]));
        assert_eq!(*out.get_pixel(3, 1), Rgba([5, 4, 0, 255]));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let src = checker(8, 8);
        assert!(matches!(
            crop(&src, PixelRect::new(6, 0, 4, 4)),
            Err(AutotileError::CropOutOfBounds { .. })
        ));
        assert!(crop(&src, PixelRect::new(-1, 0, 2, 2)).is_err());
    }

    #[test]
    fn test_blit_overwrites_including_alpha() {
        let mut dst = checker(4, 4);
        let src = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 0]));
        blit(&mut dst, &src, Int2::new(2, 2)).unwrap();
        assert_eq!(*dst.get_pixel(3, 3), Rgba([9, 9, 9, 0]));
        assert_eq!(*dst.get_pixel(1, 1), Rgba([1, 1, 0, 255]));

        assert!(matches!(
            blit(&mut dst, &src, Int2::new(3, 0)),
            Err(AutotileError::BlitOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_slice_quadrant() {
        let tile = checker(4, 4);
        let q4 = slice_quadrant(&tile, TileQuadrant::Q4, Int2::new(4, 4)).unwrap();
        assert_eq!(q4.dimensions(), (2, 2));
        assert_eq!(*q4.get_pixel(0, 0), Rgba([2, 2, 0, 255]));
    }

    #[test]
    fn test_has_opaque_pixel_clips() {
        let mut image = RgbaImage::new(4, 4);
        assert!(!has_opaque_pixel(&image, PixelRect::new(0, 0, 4, 4)));
        image.put_pixel(3, 3, Rgba([0, 0, 0, 1]));
        assert!(has_opaque_pixel(&image, PixelRect::new(2, 2, 8, 8)));
        assert!(!has_opaque_pixel(&image, PixelRect::new(0, 0, 3, 3)));
        assert!(!has_opaque_pixel(&image, PixelRect::new(10, 10, 4, 4)));
    }
}
