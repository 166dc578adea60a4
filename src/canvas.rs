//! The drawing canvas: a decoded image plus an optional font.
//!
//! Every drawing call composites into a fresh RGBA copy of the current image
//! and swaps it in only when the call succeeds, so a failed draw leaves the
//! canvas exactly as it was.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::imageops;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use log::debug;

use crate::error::{Error, Result};
use crate::font::{Font, TextStyle};
use crate::format::{self, PicType};
use crate::qr::{self, QrOptions};
use crate::resize;

/// One entry of a batch text draw: `content` with its baseline origin at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub content: String,
    pub x: i32,
    pub y: i32,
}

impl TextItem {
    pub fn new(content: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            content: content.into(),
            x,
            y,
        }
    }
}

/// An image being composed.
///
/// # Example
///
/// ```rust,no_run
/// use picdraw::{Canvas, PicType};
///
/// let mut base = Canvas::open("1.png")?;
/// base.init_font("font/wryh.ttf")?;
///
/// let mut sticker = Canvas::open("2.png")?;
/// sticker.resize(300, 300);
/// base.draw_image(&sticker, 0, 100);
///
/// base.draw_text("hello", 300, 200)?;
/// base.set_font_color(255, 0, 0, 255);
/// base.set_font_size(40.0);
/// base.draw_text("hello", 400, 400)?;
///
/// base.save("3.png", 100, PicType::Png)?;
/// # Ok::<(), picdraw::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Canvas {
    image: DynamicImage,
    font: Option<Font>,
    style: TextStyle,
}

impl Canvas {
    /// Wraps an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            font: None,
            style: TextStyle::default(),
        }
    }

    /// Opens an image file. The format is detected from the file contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        debug!("opened {} ({}x{})", path.display(), image.width(), image.height());
        Ok(Self::from_image(image))
    }

    /// Decodes a standard base64 encoded image.
    pub fn from_base64(data: &str) -> Result<Self> {
        let bytes = STANDARD.decode(data.trim())?;
        let image = image::load_from_memory(&bytes)?;
        debug!("decoded base64 image ({}x{})", image.width(), image.height());
        Ok(Self::from_image(image))
    }

    /// Starts a canvas from a `size` x `size` QR code.
    ///
    /// The code uses the highest error correction level and a quiet zone;
    /// colours left as `None` stay white (background) and black (foreground).
    pub fn from_qr(
        content: &str,
        size: u32,
        background: Option<Rgba<u8>>,
        foreground: Option<Rgba<u8>>,
    ) -> Result<Self> {
        let options = QrOptions::default().size(size).colors(background, foreground);
        let image = qr::qr_image(content, &options)?;
        Ok(Self::from_image(DynamicImage::ImageRgba8(image)))
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Resamples the image with Lanczos3. A zero dimension keeps the aspect ratio.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = resize::resize(&self.image, width, height);
    }

    /// Loads a font file and resets the text style to its defaults.
    pub fn init_font(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let font = Font::open(path)?;
        self.set_font(font);
        Ok(())
    }

    /// Same as [`Canvas::init_font`] with the font data already in memory.
    pub fn init_font_bytes(&mut self, data: Vec<u8>) -> Result<()> {
        let font = Font::from_bytes(data)?;
        self.set_font(font);
        Ok(())
    }

    pub fn set_font(&mut self, font: Font) {
        self.font = Some(font);
        self.style = TextStyle::default();
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.style.size = size;
    }

    pub fn set_font_dpi(&mut self, dpi: f32) {
        self.style.dpi = dpi;
    }

    pub fn set_font_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        self.style.color = [r, g, b, a];
    }

    /// Draws one line of text with its baseline origin at `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`Error::FontNotLoaded`] if no font has been loaded.
    pub fn draw_text(&mut self, content: &str, x: i32, y: i32) -> Result<()> {
        let font = self.font.as_ref().ok_or(Error::FontNotLoaded)?;
        let mut target = self.image.to_rgba8();
        font.draw(&mut target, content, x, y, &self.style)?;
        self.image = DynamicImage::ImageRgba8(target);
        Ok(())
    }

    /// Draws every item, in order, onto one buffer.
    ///
    /// The canvas is only updated once all items were drawn.
    pub fn draw_text_batch(&mut self, items: &[TextItem]) -> Result<()> {
        let font = self.font.as_ref().ok_or(Error::FontNotLoaded)?;
        let mut target = self.image.to_rgba8();
        for item in items {
            font.draw(&mut target, &item.content, item.x, item.y, &self.style)?;
        }
        debug!("drew {} text items", items.len());
        self.image = DynamicImage::ImageRgba8(target);
        Ok(())
    }

    /// Composites `other` over this canvas with its top-left corner at `(x, y)`.
    ///
    /// Parts falling outside this canvas are clipped.
    pub fn draw_image(&mut self, other: &Canvas, x: i32, y: i32) {
        self.overlay(&other.image.to_rgba8(), x, y);
    }

    /// [`Canvas::draw_image`] for an image that is not wrapped in a canvas.
    pub fn draw_raw_image(&mut self, other: &DynamicImage, x: i32, y: i32) {
        self.overlay(&other.to_rgba8(), x, y);
    }

    fn overlay(&mut self, top: &RgbaImage, x: i32, y: i32) {
        let mut target = self.image.to_rgba8();
        imageops::overlay(&mut target, top, x as i64, y as i64);
        self.image = DynamicImage::ImageRgba8(target);
    }

    /// Encodes the image into `writer`. `quality` only applies to JPEG.
    pub fn encode<W: Write>(&self, writer: &mut W, quality: u8, format: PicType) -> Result<()> {
        format::encode(&self.image, writer, quality, format)
    }

    /// Writes the image to `path`, creating or truncating the file.
    pub fn save(&self, path: impl AsRef<Path>, quality: u8, format: PicType) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(&mut writer, quality, format)?;
        writer.flush()?;
        debug!("saved {} as {:?}", path.display(), format);
        Ok(())
    }

    /// Encodes the image and returns it as standard base64.
    pub fn to_base64(&self, quality: u8, format: PicType) -> Result<String> {
        let mut buf = Cursor::new(Vec::new());
        self.encode(&mut buf, quality, format)?;
        Ok(STANDARD.encode(buf.into_inner()))
    }
}

impl From<DynamicImage> for Canvas {
    fn from(image: DynamicImage) -> Self {
        Self::from_image(image)
    }
}
