//! # picdraw
//!
//! A Rust library for composing images: load a picture, write text on it,
//! paste other pictures over it, and export the result.
//!
//! `picdraw` wraps a decoded image in a [`Canvas`] that is mutated in place by
//! drawing operations. QR codes can be generated as stand-alone images or used
//! as the starting canvas.
//!
//! ## Features
//!
//! - Load images from files, base64 payloads or memory (any format `image` decodes).
//! - Draw anti-aliased text with any TrueType/OpenType font, at a chosen size, DPI and colour.
//! - Composite images with alpha blending at any offset, clipped to the canvas.
//! - Generate QR codes with custom colours, an embedded logo, SVG or terminal output.
//! - Resize with Lanczos3 resampling.
//! - Export to JPEG (quality 1–100), PNG or BMP, to a file or a base64 string.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! picdraw = "0.1" # Replace with the latest version
//! ```
//!
//! Enable the `serde` feature to (de)serialize [`TextStyle`], [`QrOptions`] and
//! [`PicType`] as part of your own configuration.
//!
//! ## Example
//!
//! Put a QR code and a caption on a poster:
//!
//! ```rust,no_run
//! use picdraw::{Canvas, PicType, TextItem};
//! use picdraw::qr::hex_to_rgba;
//!
//! fn main() -> picdraw::Result<()> {
//!     let mut poster = Canvas::open("poster.png")?;
//!     poster.init_font("font/wryh.ttf")?;
//!
//!     let qr = Canvas::from_qr("https://example.com", 200, None, Some(hex_to_rgba("f53e77")?))?;
//!     poster.draw_image(&qr, 40, 40);
//!
//!     poster.set_font_size(32.0);
//!     poster.draw_text_batch(&[
//!         TextItem::new("Scan me", 260, 100),
//!         TextItem::new("example.com", 260, 150),
//!     ])?;
//!
//!     poster.save("poster-out.jpg", 90, PicType::Jpeg)?;
//!     let _inline = poster.to_base64(90, PicType::Png)?;
//!     Ok(())
//! }
//! ```
//!
//! Generate a QR code file directly:
//!
//! ```rust,no_run
//! use picdraw::qr::{build_qr_code, hex_to_rgba};
//!
//! let path = build_qr_code("Hello, World!", "output", "qr.png", None, hex_to_rgba("0fe285").ok())
//!     .expect("Failed to write QR code");
//! println!("{}", path.display());
//! ```
//!
//! ## Modules
//!
//! - [`canvas`]: The in-place drawing target.
//! - [`qr`]: QR code rendering, logo embedding, SVG/text output, hex colours.
//! - [`font`]: Font loading, text style and text layout.
//! - [`glyph`]: Glyph outlines and coverage rasterisation.
//! - [`resize`]: Lanczos3 resampling.
//! - [`format`]: JPEG/PNG/BMP encoding.

#![forbid(unsafe_code)]

pub mod canvas;
pub mod error;
pub mod font;
pub mod format;
pub mod glyph;
pub mod qr;
pub mod resize;

pub use canvas::{Canvas, TextItem};
pub use error::{Error, Result};
pub use font::{Font, TextStyle};
pub use format::PicType;
pub use qr::{QrCodeEcc, QrOptions};
