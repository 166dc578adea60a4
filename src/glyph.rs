//! Glyph outlines and coverage rasterisation.
//!
//! Outlines come out of the font in design units (y-up). [`glyph_transform`]
//! maps them onto the canvas (y-down) and [`fill_path`] rasterises the result
//! through an anti-aliased coverage mask, blending a solid colour over the
//! target image.

use image::{Pixel, Rgba, RgbaImage};
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};
use ttf_parser::{Face, GlyphId};

/// Converts ttf-parser glyph outlines to tiny-skia paths.
pub struct GlyphOutlineBuilder {
    builder: PathBuilder,
}

impl GlyphOutlineBuilder {
    pub fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }

    /// Returns `None` when no segment was recorded.
    pub fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl Default for GlyphOutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ttf_parser::OutlineBuilder for GlyphOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Outline of `glyph` in design units, or `None` for empty glyphs (spaces).
pub fn outline(face: &Face<'_>, glyph: GlyphId) -> Option<Path> {
    let mut builder = GlyphOutlineBuilder::new();
    face.outline_glyph(glyph, &mut builder)?;
    builder.finish()
}

/// Maps design units to pixels with the origin on the baseline at `(x, y)`.
///
/// The Y axis is flipped to match the image's Y-down coordinates.
#[inline]
pub fn glyph_transform(scale: f32, x: f32, y: f32) -> Transform {
    Transform::from_row(scale, 0.0, 0.0, -scale, x, y)
}

/// Fills `path` (after `transform`) with `color` over `target`.
///
/// Parts of the path outside the image are clipped. Returns `false` when
/// nothing was painted.
pub fn fill_path(target: &mut RgbaImage, path: &Path, transform: Transform, color: Rgba<u8>) -> bool {
    let Some(device) = path.clone().transform(transform) else {
        return false;
    };
    let bounds = device.bounds();
    let left = bounds.left().floor().max(0.0);
    let top = bounds.top().floor().max(0.0);
    let right = bounds.right().ceil().min(target.width() as f32);
    let bottom = bounds.bottom().ceil().min(target.height() as f32);
    if right <= left || bottom <= top {
        return false;
    }

    let (mask_w, mask_h) = ((right - left) as u32, (bottom - top) as u32);
    let Some(mut mask) = Mask::new(mask_w, mask_h) else {
        return false;
    };
    mask.fill_path(&device, FillRule::Winding, true, Transform::from_translate(-left, -top));

    let (origin_x, origin_y) = (left as u32, top as u32);
    let coverage = mask.data();
    let mut painted = false;
    for my in 0..mask_h {
        for mx in 0..mask_w {
            let cov = coverage[(my * mask_w + mx) as usize] as u32;
            if cov == 0 {
                continue;
            }
            let alpha = (color[3] as u32 * cov + 127) / 255;
            if alpha == 0 {
                continue;
            }
            let src = Rgba([color[0], color[1], color[2], alpha as u8]);
            target.get_pixel_mut(origin_x + mx, origin_y + my).blend(&src);
            painted = true;
        }
    }
    painted
}
