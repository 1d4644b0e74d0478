//! Nearest-neighbor resampling.
//!
//! Each output pixel copies exactly one source pixel, picked by
//! [`source_coord`]. No filtering and no color conversion: the output has
//! the same color type as the input.

use super::calculations::source_coord;
use image::{DynamicImage, ImageBuffer, Pixel};

fn sample<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    width: u32,
    height: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let (src_w, src_h) = src.dimensions();
    ImageBuffer::from_fn(width, height, |x, y| {
        *src.get_pixel(source_coord(x, src_w, width), source_coord(y, src_h, height))
    })
}

/// Resize `img` to exactly `width` × `height`.
///
/// When the requested size equals the current size the image is returned
/// as-is, without copying pixels.
pub fn resize_nearest(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img;
    }
    if img.width() == 0 || img.height() == 0 {
        return DynamicImage::new(width, height, img.color());
    }

    match &img {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(sample(buf, width, height)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(sample(buf, width, height)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(sample(buf, width, height)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(sample(buf, width, height)),
        DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(sample(buf, width, height)),
        DynamicImage::ImageLumaA16(buf) => DynamicImage::ImageLumaA16(sample(buf, width, height)),
        DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(sample(buf, width, height)),
        DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(sample(buf, width, height)),
        DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(sample(buf, width, height)),
        DynamicImage::ImageRgba32F(buf) => {
            DynamicImage::ImageRgba32F(sample(buf, width, height))
        }
        other => DynamicImage::ImageRgba8(sample(&other.to_rgba8(), width, height)),
    }
}
