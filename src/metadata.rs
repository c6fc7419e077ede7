//! Structural metadata derived from a decoded image.
//!
//! Three values are reported per image:
//!
//! - **Color depth**: the bits-per-pixel field from the header, passed through
//!   unchanged.
//! - **Color count**: the number of distinct (R, G, B) triples in the decoded
//!   grid. Alpha is not part of the triple, so two pixels that differ only in
//!   alpha count once.
//! - **File size**: the size declared at header offset 2. It is never trusted
//!   silently: when the real byte length is known and differs, a
//!   [`SizeMismatch`] is attached to the report.
//!
//! A declared size of 0 means the writer didn't record one and is not treated
//! as a mismatch.

use crate::bmp::{BmpHeader, PixelGrid};
use serde::Serialize;
use std::collections::HashSet;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Bits per pixel as declared in the header.
pub fn color_depth(header: &BmpHeader) -> u16 {
    header.color_depth
}

/// Number of distinct colors in the grid.
pub fn color_count(grid: &PixelGrid) -> usize {
    grid.pixels().iter().collect::<HashSet<_>>().len()
}

/// Declared and actual file sizes disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeMismatch {
    pub declared: u32,
    pub actual: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FileSizeReport {
    pub declared_bytes: u32,
    pub size_in_mb: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<SizeMismatch>,
}

/// Report the declared file size, comparing it with `actual_len` when given.
pub fn file_size_report(header: &BmpHeader, actual_len: Option<u64>) -> FileSizeReport {
    let declared = header.declared_file_size;
    let mismatch = actual_len
        .filter(|&actual| declared != 0 && u64::from(declared) != actual)
        .map(|actual| SizeMismatch { declared, actual });

    FileSizeReport {
        declared_bytes: declared,
        size_in_mb: f64::from(declared) / BYTES_PER_MB,
        mismatch,
    }
}
