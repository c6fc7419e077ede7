//! Scanline decoder for uncompressed 24-bit and 32-bit BMP pixel data.
//!
//! ## Row layout
//!
//! Each stored row (scanline) is padded to a multiple of four bytes:
//!
//! ```text
//! stride = ceil(width * bits_per_pixel / 32) * 4
//! ```
//!
//! A 3-pixel 24-bit row holds 9 bytes of color and 3 bytes of padding.
//!
//! Rows are stored bottom-up when the header height is positive and top-down
//! when it is negative. The decoded [`PixelGrid`] is always top row first.
//!
//! ## Channel order
//!
//! Pixels are stored as B, G, R (24-bit) or B, G, R, X/A (32-bit). The fourth
//! byte is ignored; analysis only looks at color.

use super::header::{BmpHeader, u32_at};
use super::{DecodeError, Limits};

/// BITMAPINFOHEADER size. Smaller DIB headers (OS/2 core) store width,
/// height and depth at different offsets.
const INFO_HEADER_SIZE: u32 = 40;
/// Offset of the compression field (first field after bit depth).
const COMPRESSION_OFFSET: usize = 30;
/// Offset of the R/G/B masks for `BI_BITFIELDS`, right after the info header.
const MASKS_OFFSET: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE as usize;
const FILE_HEADER_SIZE: usize = 14;
const MASKS_LEN: usize = 12;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;
/// Masks that describe exactly the B, G, R, X byte order of `BI_RGB`.
const STANDARD_MASKS: [u32; 3] = [0x00FF_0000, 0x0000_FF00, 0x0000_00FF];

/// One decoded pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Decoded image: `width * height` pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelGrid {
    /// Build a grid from row-major pixels. Returns `None` if the pixel count
    /// doesn't match the dimensions.
    #[cfg(test)]
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        let expected = u64::from(width) * u64::from(height);
        (pixels.len() as u64 == expected).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A grid where every pixel has the same color.
    #[cfg(test)]
    pub(crate) fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![color; count],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y` (row 0 is the top of the image).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate over rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb]> {
        // chunks_exact panics on a zero chunk size; an empty grid has no rows.
        let width = (self.width as usize).max(1);
        self.pixels.chunks_exact(width)
    }
}

/// Bytes per stored scanline, including the padding to a 4-byte boundary.
pub fn row_stride(width: u32, bits_per_pixel: u16) -> u64 {
    (u64::from(width) * u64::from(bits_per_pixel)).div_ceil(32) * 4
}

/// Decode the pixel data region into a [`PixelGrid`].
///
/// `header` must come from [`read_header`](super::read_header) on the same
/// buffer. A zero width or height yields an empty grid.
pub fn decode_pixels(
    bytes: &[u8],
    header: &BmpHeader,
    limits: &Limits,
) -> Result<PixelGrid, DecodeError> {
    let bytes_per_pixel = match header.color_depth {
        24 => 3,
        32 => 4,
        other => return Err(DecodeError::UnsupportedDepth(other)),
    };
    if header.dib_header_size < INFO_HEADER_SIZE {
        return Err(DecodeError::UnsupportedHeader(header.dib_header_size));
    }
    let masks_after_header = check_compression(bytes, header.color_depth)?;
    check_pixel_offset(header, masks_after_header)?;

    if header.width < 0 || header.height == i32::MIN {
        return Err(DecodeError::InvalidDimensions {
            width: header.width,
            height: header.height,
        });
    }
    let width = header.width as u32;
    let height = header.height.unsigned_abs();
    limits.check(width, height)?;

    let stride = row_stride(width, header.color_depth);
    let needed = stride
        .checked_mul(u64::from(height))
        .ok_or(DecodeError::PartialPixelData {
            needed: u64::MAX,
            available: 0,
        })?;
    let offset = u64::from(header.pixel_data_offset);
    let available = (bytes.len() as u64).saturating_sub(offset);
    if available < needed {
        return Err(DecodeError::PartialPixelData { needed, available });
    }

    if width == 0 || height == 0 {
        return Ok(PixelGrid {
            width,
            height,
            pixels: Vec::new(),
        });
    }

    // Both fit in usize: they index into `bytes`.
    let start = offset as usize;
    let data = &bytes[start..start + needed as usize];
    let stride = stride as usize;
    let row_bytes = width as usize * bytes_per_pixel;

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    let scanlines = data.chunks_exact(stride);
    if header.is_top_down() {
        push_rows(&mut pixels, scanlines, row_bytes, bytes_per_pixel);
    } else {
        push_rows(&mut pixels, scanlines.rev(), row_bytes, bytes_per_pixel);
    }

    Ok(PixelGrid {
        width,
        height,
        pixels,
    })
}

/// Append the color bytes of each scanline, skipping its padding.
fn push_rows<'a>(
    pixels: &mut Vec<Rgb>,
    scanlines: impl Iterator<Item = &'a [u8]>,
    row_bytes: usize,
    bytes_per_pixel: usize,
) {
    for line in scanlines {
        pixels.extend(
            line[..row_bytes]
                .chunks_exact(bytes_per_pixel)
                .map(|px| Rgb::new(px[2], px[1], px[0])),
        );
    }
}

/// The pixel data must start after the file header, the DIB header and, for
/// a bare 40-byte info header with bitfields, the three masks that follow it.
fn check_pixel_offset(header: &BmpHeader, masks_after_header: bool) -> Result<(), DecodeError> {
    let mut header_end = FILE_HEADER_SIZE as u64 + u64::from(header.dib_header_size);
    if masks_after_header && header.dib_header_size == INFO_HEADER_SIZE {
        header_end += MASKS_LEN as u64;
    }
    if u64::from(header.pixel_data_offset) < header_end {
        return Err(DecodeError::InvalidPixelOffset {
            offset: header.pixel_data_offset,
            header_end,
        });
    }
    Ok(())
}

/// Accept `BI_RGB`, and bitfields on 32-bit images only when the masks
/// describe the plain BGRX layout. Returns whether bitfield masks are in use.
fn check_compression(bytes: &[u8], depth: u16) -> Result<bool, DecodeError> {
    if bytes.len() < COMPRESSION_OFFSET + 4 {
        return Err(DecodeError::TruncatedHeader { len: bytes.len() });
    }
    let compression = u32_at(bytes, COMPRESSION_OFFSET);
    match compression {
        BI_RGB => Ok(false),
        BI_BITFIELDS | BI_ALPHABITFIELDS if depth == 32 => {
            if bytes.len() < MASKS_OFFSET + MASKS_LEN {
                return Err(DecodeError::TruncatedHeader { len: bytes.len() });
            }
            let masks = [
                u32_at(bytes, MASKS_OFFSET),
                u32_at(bytes, MASKS_OFFSET + 4),
                u32_at(bytes, MASKS_OFFSET + 8),
            ];
            if masks == STANDARD_MASKS {
                Ok(true)
            } else {
                Err(DecodeError::UnsupportedCompression(compression))
            }
        }
        other => Err(DecodeError::UnsupportedCompression(other)),
    }
}
