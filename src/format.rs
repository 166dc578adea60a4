//! Output formats and the encoder dispatch used by `save` and `to_base64`.

use std::io::Write;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, Rgb, RgbImage};
use log::debug;

use crate::error::Result;

/// Image file type written by [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PicType {
    Jpeg,
    #[default]
    Png,
    Bmp,
}

impl PicType {
    /// Guesses the type from a path's extension (case-insensitive).
    ///
    /// Returns `None` for unknown or missing extensions.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(PicType::Jpeg),
            "png" => Some(PicType::Png),
            "bmp" => Some(PicType::Bmp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            PicType::Jpeg => "jpg",
            PicType::Png => "png",
            PicType::Bmp => "bmp",
        }
    }
}

/// Encodes `image` into `writer`.
///
/// # Arguments
///
/// * `image` - The image to encode.
/// * `writer` - Destination sink.
/// * `quality` - JPEG quality, clamped into 1..=100. Ignored for PNG and BMP.
/// * `format` - The output format.
///
/// JPEG has no alpha channel, so the image is flattened over black first.
pub fn encode<W: Write>(image: &DynamicImage, writer: &mut W, quality: u8, format: PicType) -> Result<()> {
    let (width, height) = (image.width(), image.height());
    debug!("encoding {}x{} image as {:?}", width, height, format);
    match format {
        PicType::Jpeg => {
            let rgb = flatten_over_black(image);
            JpegEncoder::new_with_quality(writer, quality.clamp(1, 100)).write_image(
                rgb.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgb8,
            )?;
        }
        PicType::Png => {
            let rgba = image.to_rgba8();
            PngEncoder::new(writer).write_image(
                rgba.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            )?;
        }
        PicType::Bmp => {
            let rgba = image.to_rgba8();
            BmpEncoder::new(writer).write_image(
                rgba.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(())
}

// Premultiplies each pixel by its alpha, i.e. composites it over opaque black.
fn flatten_over_black(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let scale = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        Rgb([scale(r), scale(g), scale(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 4, Rgba([10, 120, 240, 255])))
    }

    #[test]
    fn test_from_path() {
        assert_eq!(PicType::from_path("a/b/photo.JPG"), Some(PicType::Jpeg));
        assert_eq!(PicType::from_path("x.jpeg"), Some(PicType::Jpeg));
        assert_eq!(PicType::from_path("x.png"), Some(PicType::Png));
        assert_eq!(PicType::from_path("x.bmp"), Some(PicType::Bmp));
        assert_eq!(PicType::from_path("x.gif"), None);
        assert_eq!(PicType::from_path("noext"), None);
    }

    #[test]
    fn test_encoded_bytes_carry_format_signature() {
        for (format, expected) in [
            (PicType::Png, ImageFormat::Png),
            (PicType::Jpeg, ImageFormat::Jpeg),
            (PicType::Bmp, ImageFormat::Bmp),
        ] {
            let mut buf = Vec::new();
            encode(&sample(), &mut buf, 90, format).unwrap();
            assert_eq!(image::guess_format(&buf).unwrap(), expected);
        }
    }

    #[test]
    fn test_png_is_lossless() {
        let mut buf = Vec::new();
        encode(&sample(), &mut buf, 0, PicType::Png).unwrap();
        let back = image::load_from_memory(&buf).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(3, 2), &Rgba([10, 120, 240, 255]));
    }

    #[test]
    fn test_jpeg_quality_zero_is_clamped() {
        let mut buf = Vec::new();
        encode(&sample(), &mut buf, 0, PicType::Jpeg).unwrap();
        let back = image::load_from_memory(&buf).unwrap();
        assert_eq!((back.width(), back.height()), (6, 4));
    }

    #[test]
    fn test_flatten_over_black() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 128]));
        let flat = flatten_over_black(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(flat.get_pixel(1, 0), &Rgb([100, 50, 25]));
    }

    #[test]
    fn test_transparent_jpeg_encodes_black() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0])));
        let mut buf = Vec::new();
        encode(&img, &mut buf, 95, PicType::Jpeg).unwrap();
        let back = image::load_from_memory(&buf).unwrap().to_rgb8();
        assert!(back.get_pixel(4, 4).0.iter().all(|c| *c <= 4), "{:?}", back.get_pixel(4, 4));
    }
}
