//! Error type shared by every fallible operation in the crate.
//!
//! Library errors are wrapped as-is so callers can still match on the
//! underlying cause; the remaining variants cover conditions picdraw detects
//! itself.

use thiserror::Error;

/// Result type alias for picdraw operations.
///
/// # Example
///
/// ```rust
/// use picdraw::Result;
///
/// fn load() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by canvas, QR and encoding operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Opening, reading or creating a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding, encoding or resampling an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A base64 payload could not be decoded.
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The QR payload could not be encoded (usually too long).
    #[error("QR code error: {0}")]
    Qr(#[from] qrcode::types::QrError),

    /// Font data could not be parsed as a TrueType/OpenType face.
    #[error("font error: {0}")]
    Font(#[from] ttf_parser::FaceParsingError),

    /// A text operation was attempted before a font was loaded.
    #[error("no font loaded; call init_font first")]
    FontNotLoaded,

    /// A hex colour string was malformed.
    #[error("invalid color {value:?}: expected RRGGBB or RRGGBBAA")]
    InvalidColor { value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_color_message() {
        let err = Error::InvalidColor {
            value: "zz".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid color \"zz\": expected RRGGBB or RRGGBBAA"
        );
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here.png")?)
        }
        assert!(matches!(open(), Err(Error::Io(_))));
    }
}
