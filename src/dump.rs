//! Per-image pixel dumps.
//!
//! Every analyzed image can have its full grid written as text, one line per
//! pixel, rows top to bottom and columns left to right:
//!
//! ```text
//! Pixel at (0, 0): R=255, G=0, B=0
//! Pixel at (1, 0): R=0, G=255, B=0
//! Pixel at (0, 1): R=0, G=0, B=255
//! ```
//!
//! ## Dump targets
//!
//! Each image gets its own file, named from its 1-based batch index and file
//! stem: `003-sunset.pixels.txt`. The index keeps names unique within a batch
//! even when two inputs share a file name in different directories.

use crate::bmp::PixelGrid;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const DUMP_SUFFIX: &str = ".pixels.txt";

/// One pixel of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelRecord {
    pub x: u32,
    pub y: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for PixelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pixel at ({}, {}): R={}, G={}, B={}",
            self.x, self.y, self.r, self.g, self.b
        )
    }
}

/// Records for every pixel, `y` outer and `x` inner.
pub fn records(grid: &PixelGrid) -> impl Iterator<Item = PixelRecord> + '_ {
    grid.rows().enumerate().flat_map(|(y, row)| {
        row.iter().enumerate().map(move |(x, p)| PixelRecord {
            x: x as u32,
            y: y as u32,
            r: p.r,
            g: p.g,
            b: p.b,
        })
    })
}

/// Dump file path for the image at `index` (1-based) read from `source`.
pub fn dump_path(dump_dir: &Path, index: usize, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    dump_dir.join(format!("{index:03}-{stem}{DUMP_SUFFIX}"))
}

/// Write every record of `grid` to `writer`.
pub fn write_records(grid: &PixelGrid, writer: &mut impl Write) -> io::Result<()> {
    for record in records(grid) {
        writeln!(writer, "{record}")?;
    }
    Ok(())
}

/// Write the dump for one image and return where it went.
///
/// Creates `dump_dir` if needed. An existing file at the target path (from an
/// earlier run) is replaced.
pub fn write_pixel_dump(
    grid: &PixelGrid,
    dump_dir: &Path,
    index: usize,
    source: &Path,
) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dump_dir)?;
    let path = dump_path(dump_dir, index, source);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_records(grid, &mut writer)?;
    writer.flush()?;
    Ok(path)
}
