//! Lanczos3 resampling shared by the canvas and the QR logo composition.

use image::imageops::FilterType;
use image::DynamicImage;
use log::trace;

/// Resizes an image to exactly `width` x `height` using a Lanczos3 filter.
///
/// A zero dimension is derived from the other one so the aspect ratio is kept.
/// When both are zero the image is returned unchanged.
///
/// # Example
///
/// ```rust
/// use image::{DynamicImage, RgbaImage};
/// use picdraw::resize::resize;
///
/// let img = DynamicImage::ImageRgba8(RgbaImage::new(200, 100));
/// let half = resize(&img, 100, 0);
/// assert_eq!((half.width(), half.height()), (100, 50));
/// ```
pub fn resize(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (src_w, src_h) = (image.width(), image.height());
    let (width, height) = match target_dimensions(src_w, src_h, width, height) {
        Some(dims) => dims,
        None => return image.clone(),
    };
    trace!("resize {}x{} -> {}x{}", src_w, src_h, width, height);
    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn target_dimensions(src_w: u32, src_h: u32, width: u32, height: u32) -> Option<(u32, u32)> {
    match (width, height) {
        (0, 0) => None,
        (w, 0) => Some((w, scaled(src_h, w, src_w))),
        (0, h) => Some((scaled(src_w, h, src_h), h)),
        dims => Some(dims),
    }
}

// `value * num / den` biased up by 0.7 before truncation, never below one pixel.
fn scaled(value: u32, num: u32, den: u32) -> u32 {
    if den == 0 {
        return 1;
    }
    let v = (0.7 + value as f64 * num as f64 / den as f64) as u32;
    v.max(1)
}
