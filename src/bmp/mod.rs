//! BMP container decoding.
//!
//! Only the parts of the format needed for analysis are decoded:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 2    | Signature `BM` (`0x42 0x4D`) |
//! | 2      | 4    | Declared file size (u32 LE) |
//! | 10     | 4    | Pixel data offset (u32 LE) |
//! | 14     | 4    | DIB header size (u32 LE) |
//! | 18     | 4    | Width (i32 LE) |
//! | 22     | 4    | Height (i32 LE, negative = top-down rows) |
//! | 28     | 2    | Bits per pixel (u16 LE) |
//! | 30     | 4    | Compression (u32 LE) |
//!
//! The module is split into:
//! - **Header**: [`read_header`] validates the signature and reads the fixed
//!   fields. It never looks past byte 30.
//! - **Decode**: [`decode_pixels`] turns the pixel data region into a
//!   [`PixelGrid`] of RGB triples, top row first.
//!
//! Supported pixel layouts are uncompressed 24-bit BGR and 32-bit BGRX/BGRA.
//! Palette images and RLE streams are rejected with a typed error.

mod decode;
mod header;

pub use decode::{PixelGrid, Rgb, decode_pixels, row_stride};
pub use header::{BmpHeader, MIN_HEADER_LEN, read_header};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("file too short for a BMP header: {len} bytes")]
    TruncatedHeader { len: usize },
    #[error("missing BM signature")]
    InvalidSignature,
    #[error("unsupported DIB header size {0} (need a 40-byte BITMAPINFOHEADER or newer)")]
    UnsupportedHeader(u32),
    #[error("unsupported color depth: {0} bits per pixel")]
    UnsupportedDepth(u16),
    #[error("unsupported compression scheme {0}")]
    UnsupportedCompression(u32),
    #[error("pixel data offset {offset} points inside the {header_end}-byte header")]
    InvalidPixelOffset { offset: u32, header_end: u64 },
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("pixel data truncated: need {needed} bytes, got {available}")]
    PartialPixelData { needed: u64, available: u64 },
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Resource limits applied before the pixel buffer is allocated.
///
/// All fields default to `None` (no limit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
}

impl Limits {
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), DecodeError> {
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(DecodeError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_default_is_unbounded() {
        assert!(Limits::default().check(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn limits_reject_large_images() {
        let limits = Limits {
            max_pixels: Some(100),
        };
        assert!(limits.check(10, 10).is_ok());
        assert!(matches!(
            limits.check(11, 10),
            Err(DecodeError::LimitExceeded(_))
        ));
    }

    #[test]
    fn truncated_header_message_names_length() {
        let err = DecodeError::TruncatedHeader { len: 3 };
        assert_eq!(
            err.to_string(),
            "file too short for a BMP header: 3 bytes"
        );
    }
}
