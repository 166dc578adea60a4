//! Font loading and single-line text rendering.

use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use log::{debug, trace};
use ttf_parser::{Face, GlyphId};

use crate::error::Result;
use crate::glyph;

/// Size, resolution and colour used when drawing text.
///
/// The defaults are 26 pt at 72 DPI in opaque black.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TextStyle {
    /// Font size in points.
    pub size: f32,
    pub dpi: f32,
    /// RGBA, straight (not premultiplied) alpha.
    pub color: [u8; 4],
}

impl TextStyle {
    pub const DEFAULT_SIZE: f32 = 26.0;
    pub const DEFAULT_DPI: f32 = 72.0;

    /// Height of the em square in pixels.
    pub fn pixel_size(&self) -> f32 {
        self.size * self.dpi / 72.0
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_dpi(mut self, dpi: f32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            dpi: Self::DEFAULT_DPI,
            color: [0, 0, 0, 255],
        }
    }
}

/// A parsed TrueType/OpenType font.
///
/// The raw bytes are kept and the face is re-borrowed on every draw, so a
/// `Font` is an owned value with no lifetime.
#[derive(Clone)]
pub struct Font {
    data: Vec<u8>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("len", &self.data.len()).finish()
    }
}

impl Font {
    /// Validates `data` as a font (face index 0) and takes ownership of it.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0)?;
        debug!(
            "loaded font: {} glyphs, {} units per em",
            face.number_of_glyphs(),
            face.units_per_em()
        );
        Ok(Self { data })
    }

    /// Reads and parses a font file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading font {}", path.display());
        Self::from_bytes(fs::read(path)?)
    }

    fn face(&self) -> Result<Face<'_>> {
        Ok(Face::parse(&self.data, 0)?)
    }

    /// Draws `text` on one line with the baseline origin at `(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `target` - Image to draw on; glyphs outside it are clipped.
    /// * `text` - The text. Control characters are skipped.
    /// * `x`, `y` - Pen origin in pixels; `y` is the baseline.
    /// * `style` - Size, DPI and colour.
    ///
    /// # Returns
    ///
    /// The pen x position after the last glyph.
    pub fn draw(&self, target: &mut RgbaImage, text: &str, x: i32, y: i32, style: &TextStyle) -> Result<f32> {
        let face = self.face()?;
        let color = Rgba(style.color);
        let baseline = y as f32;
        let end = layout(&face, text, x as f32, style, |glyph_id, pen_x, scale| {
            if let Some(path) = glyph::outline(&face, glyph_id) {
                glyph::fill_path(target, &path, glyph::glyph_transform(scale, pen_x, baseline), color);
            }
        });
        trace!("drew {:?} at ({}, {}) to x={}", text, x, y, end);
        Ok(end)
    }

    /// Width in pixels that [`Font::draw`] would advance for `text`.
    pub fn measure(&self, text: &str, style: &TextStyle) -> Result<f32> {
        let face = self.face()?;
        Ok(layout(&face, text, 0.0, style, |_, _, _| {}))
    }
}

// Walks the glyphs of `text`, calling `place(glyph, pen_x, scale)` for each
// and returning the final pen position.
fn layout(
    face: &Face<'_>,
    text: &str,
    start_x: f32,
    style: &TextStyle,
    mut place: impl FnMut(GlyphId, f32, f32),
) -> f32 {
    let units_per_em = face.units_per_em() as f32;
    if units_per_em <= 0.0 {
        return start_x;
    }
    let scale = style.pixel_size() / units_per_em;
    let mut pen_x = start_x;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars().filter(|c| !c.is_control()) {
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        if let Some(left) = prev {
            pen_x += kerning(face, left, glyph) as f32 * scale;
        }
        place(glyph, pen_x, scale);
        pen_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
        prev = Some(glyph);
    }
    pen_x
}

fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i16 {
    let Some(kern) = face.tables().kern else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|st| st.horizontal && !st.variable)
        .find_map(|st| st.glyphs_kerning(left, right))
        .unwrap_or(0)
}

/// DejaVu Sans, shipped under `tests/fonts` for text rendering tests.
#[cfg(test)]
pub(crate) fn test_font() -> Font {
    const DEJAVU_SANS: &[u8] = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fonts/DejaVuSans.ttf"));
    Font::from_bytes(DEJAVU_SANS.to_vec()).unwrap()
}
