//! QR code rendering on top of the `qrcode` matrix encoder.
//!
//! The encoder only produces the module matrix; everything here turns that
//! matrix into pixels: sizing, quiet zone, colours, logo composition, SVG and
//! terminal output.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::imageops;
use image::{DynamicImage, ImageBuffer, ImageReader, Rgba, RgbaImage};
use log::debug;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::{Error, Result};
use crate::format::{self, PicType};
use crate::resize::resize;

/// Width of the quiet zone around the symbol, in modules.
pub const QUIET_ZONE: u32 = 4;

/// Pixel size used by [`build_qr_code`].
pub const FILE_SIZE: u32 = 256;

/// Pixel size of the borderless code produced by [`qr_logo_code`].
pub const LOGO_CODE_SIZE: u32 = 150;

/// Side of the square the logo is resized to in [`qr_logo_code`].
pub const LOGO_SIZE: u32 = 40;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// The error correction level of a QR code symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QrCodeEcc {
    /// Tolerates about 7% erroneous codewords.
    Low,
    /// About 15%.
    Medium,
    /// About 25%.
    Quartile,
    /// About 30%.
    #[default]
    High,
}

impl From<QrCodeEcc> for EcLevel {
    fn from(ecc: QrCodeEcc) -> Self {
        match ecc {
            QrCodeEcc::Low => EcLevel::L,
            QrCodeEcc::Medium => EcLevel::M,
            QrCodeEcc::Quartile => EcLevel::Q,
            QrCodeEcc::High => EcLevel::H,
        }
    }
}

/// How a QR code is rendered.
///
/// # Example
///
/// ```rust
/// use picdraw::qr::{qr_image, QrCodeEcc, QrOptions};
///
/// let options = QrOptions::default()
///     .size(300)
///     .ecc(QrCodeEcc::Medium)
///     .foreground([15, 226, 133, 255]);
/// let img = qr_image("https://example.com", &options).unwrap();
/// assert_eq!(img.dimensions(), (300, 300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QrOptions {
    pub ecc: QrCodeEcc,
    /// Requested width and height in pixels.
    pub size: u32,
    /// Whether to surround the symbol with a quiet zone of [`QUIET_ZONE`] modules.
    pub border: bool,
    pub background: [u8; 4],
    pub foreground: [u8; 4],
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            ecc: QrCodeEcc::High,
            size: FILE_SIZE,
            border: true,
            background: WHITE,
            foreground: BLACK,
        }
    }
}

impl QrOptions {
    pub fn ecc(mut self, ecc: QrCodeEcc) -> Self {
        self.ecc = ecc;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn background(mut self, color: [u8; 4]) -> Self {
        self.background = color;
        self
    }

    pub fn foreground(mut self, color: [u8; 4]) -> Self {
        self.foreground = color;
        self
    }

    /// Applies the colours that are `Some`, keeping the current ones otherwise.
    pub fn colors(mut self, background: Option<Rgba<u8>>, foreground: Option<Rgba<u8>>) -> Self {
        if let Some(bg) = background {
            self.background = bg.0;
        }
        if let Some(fg) = foreground {
            self.foreground = fg.0;
        }
        self
    }

    fn border_modules(&self) -> u32 {
        if self.border {
            QUIET_ZONE
        } else {
            0
        }
    }
}

/// Module matrix of an encoded symbol, dark = `true`.
struct Matrix {
    width: u32,
    modules: Vec<bool>,
}

impl Matrix {
    fn encode(content: &str, ecc: QrCodeEcc) -> Result<Self> {
        let code = QrCode::with_error_correction_level(content.as_bytes(), ecc.into())?;
        let width = code.width() as u32;
        debug!("encoded {} bytes into a {}x{} QR symbol ({:?})", content.len(), width, width, ecc);
        let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        Ok(Self { width, modules })
    }

    /// Out-of-range coordinates are light, which covers the quiet zone.
    fn is_dark(&self, x: i64, y: i64) -> bool {
        let w = self.width as i64;
        if x < 0 || y < 0 || x >= w || y >= w {
            return false;
        }
        self.modules[(y * w + x) as usize]
    }
}

/// Renders `content` as a QR code image of exactly `options.size` pixels square.
///
/// Every module gets the same whole number of pixels, `size / modules`, and
/// the symbol is centred with background padding for the remainder. A size
/// smaller than the symbol (quiet zone included) is raised to one pixel per
/// module.
///
/// # Errors
///
/// Returns [`Error::Qr`] if the content does not fit in any QR version.
pub fn qr_image(content: &str, options: &QrOptions) -> Result<RgbaImage> {
    let matrix = Matrix::encode(content, options.ecc)?;
    let border = options.border_modules();
    let real_size = matrix.width + 2 * border;
    let size = options.size.max(real_size);
    let pixels_per_module = size / real_size;
    let offset = (size - real_size * pixels_per_module) / 2;
    let (bg, fg) = (Rgba(options.background), Rgba(options.foreground));

    // Padding maps to negative or past-the-end modules, which are light.
    let module = |p: u32| (p as i64 - offset as i64).div_euclid(pixels_per_module as i64) - border as i64;
    let mut img = ImageBuffer::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = if matrix.is_dark(module(x), module(y)) { fg } else { bg };
    }
    Ok(img)
}

/// Generates a QR code and saves it as a PNG file.
///
/// # Arguments
///
/// * `content` - The content to encode.
/// * `dir` - Directory to write into; created if it does not exist. Empty means the current directory.
/// * `name` - File name, including its extension.
/// * `background`, `foreground` - Optional colour overrides (white / black otherwise).
///
/// # Returns
///
/// The path of the written file.
///
/// # Example
///
/// ```rust,no_run
/// use picdraw::qr::{build_qr_code, hex_to_rgba};
///
/// let green = hex_to_rgba("0fe285").unwrap();
/// let path = build_qr_code("I am healthy", "generated", "healthy.png", None, Some(green)).unwrap();
/// println!("wrote {}", path.display());
/// ```
pub fn build_qr_code(
    content: &str,
    dir: impl AsRef<Path>,
    name: &str,
    background: Option<Rgba<u8>>,
    foreground: Option<Rgba<u8>>,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    let options = QrOptions::default().size(FILE_SIZE).colors(background, foreground);
    let img = qr_image(content, &options)?;

    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    let file_path = dir.join(name);
    let mut writer = BufWriter::new(File::create(&file_path)?);
    format::encode(&DynamicImage::ImageRgba8(img), &mut writer, 100, PicType::Png)?;
    debug!("wrote QR code to {}", file_path.display());
    Ok(file_path)
}

/// Generates a borderless QR code with a logo composited over its centre.
///
/// The code is rendered at [`LOGO_CODE_SIZE`] pixels with the highest error
/// correction level so the covered modules stay recoverable; the logo is
/// resized to [`LOGO_SIZE`] pixels square.
///
/// # Errors
///
/// QR encoding errors, plus I/O or decode errors for the logo file.
pub fn qr_logo_code(content: &str, logo: impl AsRef<Path>) -> Result<RgbaImage> {
    let logo = ImageReader::open(logo.as_ref())?.with_guessed_format()?.decode()?;
    qr_logo_image(content, &logo)
}

/// Like [`qr_logo_code`] with an already decoded logo.
pub fn qr_logo_image(content: &str, logo: &DynamicImage) -> Result<RgbaImage> {
    let options = QrOptions::default().size(LOGO_CODE_SIZE).border(false);
    let mut img = qr_image(content, &options)?;
    let logo = resize(logo, LOGO_SIZE, LOGO_SIZE).to_rgba8();
    let x = (img.width() as i64 - logo.width() as i64) / 2;
    let y = (img.height() as i64 - logo.height() as i64) / 2;
    imageops::overlay(&mut img, &logo, x, y);
    Ok(img)
}

/// Returns an SVG document depicting the QR code for `content`.
///
/// The view box is measured in modules; `options.size` sets the rendered
/// width and height. The string always uses Unix newlines.
pub fn to_svg_string(content: &str, options: &QrOptions) -> Result<String> {
    let matrix = Matrix::encode(content, options.ecc)?;
    let border = options.border_modules() as i64;
    let dimension = matrix.width as i64 + border * 2;

    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{1}\" height=\"{1}\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension, options.size
    );
    result += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        svg_color(options.background)
    );
    let mut segments = Vec::new();
    for y in 0..matrix.width as i64 {
        for x in 0..matrix.width as i64 {
            if matrix.is_dark(x, y) {
                segments.push(format!("M{},{}h1v1h-1z", x + border, y + border));
            }
        }
    }
    result += &format!(
        "\t<path d=\"{}\" fill=\"{}\"/>\n",
        segments.join(" "),
        svg_color(options.foreground)
    );
    result += "</svg>\n";
    Ok(result)
}

fn svg_color([r, g, b, a]: [u8; 4]) -> String {
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// Renders the QR code as text for a terminal, two characters per module.
///
/// Only `ecc` and `border` are taken from `options`.
pub fn to_text(content: &str, options: &QrOptions) -> Result<String> {
    let matrix = Matrix::encode(content, options.ecc)?;
    let border = options.border_modules() as i64;
    let width = matrix.width as i64;
    let mut out = String::new();
    for y in -border..width + border {
        for x in -border..width + border {
            out += if matrix.is_dark(x, y) { "██" } else { "  " };
        }
        out.push('\n');
    }
    Ok(out)
}

/// Parses a hex colour such as `0fe285`, `#F53E77` or `ffd03880`.
///
/// Alpha defaults to 255 when only six digits are given.
///
/// # Errors
///
/// [`Error::InvalidColor`] for any other length or a non-hex digit.
pub fn hex_to_rgba(color: &str) -> Result<Rgba<u8>> {
    let invalid = || Error::InvalidColor {
        value: color.to_string(),
    };
    let hex = color.strip_prefix('#').unwrap_or(color);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}
