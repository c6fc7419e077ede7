//! Fixed-offset header fields.

use super::DecodeError;

/// Minimum buffer length needed to read every field in [`BmpHeader`].
pub const MIN_HEADER_LEN: usize = 30;

const SIGNATURE: [u8; 2] = [0x42, 0x4D];

/// Header fields read from the first 30 bytes of a BMP file.
///
/// Nothing here is cross-checked against the buffer: the declared file size
/// in particular is reported as-is and compared later by
/// [`file_size_report`](crate::metadata::file_size_report).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub signature_valid: bool,
    pub declared_file_size: u32,
    pub pixel_data_offset: u32,
    pub dib_header_size: u32,
    pub width: i32,
    pub height: i32,
    pub color_depth: u16,
}

impl BmpHeader {
    /// Rows are stored top row first when the declared height is negative.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }
}

/// Validate the signature and read the fixed header fields.
///
/// The length check comes first, so an empty buffer is a truncated header
/// rather than a bad signature.
pub fn read_header(bytes: &[u8]) -> Result<BmpHeader, DecodeError> {
    if bytes.len() < MIN_HEADER_LEN {
        return Err(DecodeError::TruncatedHeader { len: bytes.len() });
    }
    if bytes[0] != SIGNATURE[0] || bytes[1] != SIGNATURE[1] {
        return Err(DecodeError::InvalidSignature);
    }

    Ok(BmpHeader {
        signature_valid: true,
        declared_file_size: u32_at(bytes, 2),
        pixel_data_offset: u32_at(bytes, 10),
        dib_header_size: u32_at(bytes, 14),
        width: i32_at(bytes, 18),
        height: i32_at(bytes, 22),
        color_depth: u16_at(bytes, 28),
    })
}

pub(crate) fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn i32_at(bytes: &[u8], offset: usize) -> i32 {
    u32_at(bytes, offset) as i32
}
