//! Shared test utilities: an in-memory BMP writer and fixture helpers.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let bytes = BmpBuilder::new(2, 2, 24).fill(Rgb::new(255, 0, 0)).build();
//! let tmp = TempDir::new().unwrap();
//! let path = write_bmp(tmp.path(), "red.bmp", &bytes);
//! ```

use std::path::{Path, PathBuf};

use crate::bmp::{Rgb, row_stride};

/// Builds BMP files with a 40-byte BITMAPINFOHEADER.
///
/// Pixels are given top row first, like [`PixelGrid`](crate::bmp::PixelGrid);
/// the builder stores them bottom-up unless [`top_down`](Self::top_down) is set.
#[derive(Debug, Clone)]
pub struct BmpBuilder {
    width: u32,
    height: u32,
    depth: u16,
    pixels: Vec<Rgb>,
    top_down: bool,
    declared_size: Option<u32>,
    compression: u32,
    masks: Option<[u32; 3]>,
}

impl BmpBuilder {
    pub fn new(width: u32, height: u32, depth: u16) -> Self {
        Self {
            width,
            height,
            depth,
            pixels: vec![Rgb::default(); (width * height) as usize],
            top_down: false,
            declared_size: None,
            compression: 0,
            masks: None,
        }
    }

    pub fn fill(mut self, color: Rgb) -> Self {
        self.pixels.fill(color);
        self
    }

    pub fn pixels(mut self, pixels: Vec<Rgb>) -> Self {
        assert_eq!(
            pixels.len(),
            (self.width * self.height) as usize,
            "pixel count must match dimensions"
        );
        self.pixels = pixels;
        self
    }

    /// Store rows top-down (negative height in the header).
    pub fn top_down(mut self) -> Self {
        self.top_down = true;
        self
    }

    /// Override the file size field at offset 2.
    pub fn declared_size(mut self, size: u32) -> Self {
        self.declared_size = Some(size);
        self
    }

    pub fn compression(mut self, code: u32) -> Self {
        self.compression = code;
        self
    }

    /// Use `BI_BITFIELDS` with the given R, G, B masks.
    pub fn bitfields(mut self, masks: [u32; 3]) -> Self {
        self.compression = 3;
        self.masks = Some(masks);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let stride = row_stride(self.width, self.depth) as usize;
        let masks_len = if self.masks.is_some() { 12 } else { 0 };
        let pixel_offset = 14 + 40 + masks_len;
        let total = pixel_offset + stride * self.height as usize;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&self.declared_size.unwrap_or(total as u32).to_le_bytes());
        out.extend_from_slice(&[0; 4]);
        out.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

        let height = if self.top_down {
            -(self.height as i32)
        } else {
            self.height as i32
        };
        out.extend_from_slice(&40u32.to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.depth.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&((stride * self.height as usize) as u32).to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&[0; 8]);
        if let Some(masks) = self.masks {
            for mask in masks {
                out.extend_from_slice(&mask.to_le_bytes());
            }
        }

        let bytes_per_pixel = match self.depth {
            24 => Some(3),
            32 => Some(4),
            _ => None,
        };
        let rows: Vec<usize> = if self.top_down {
            (0..self.height as usize).collect()
        } else {
            (0..self.height as usize).rev().collect()
        };
        for y in rows {
            let mut line = vec![0u8; stride];
            if let Some(bpp) = bytes_per_pixel {
                for x in 0..self.width as usize {
                    let px = self.pixels[y * self.width as usize + x];
                    let at = x * bpp;
                    line[at] = px.b;
                    line[at + 1] = px.g;
                    line[at + 2] = px.r;
                    if bpp == 4 {
                        line[at + 3] = 0xFF;
                    }
                }
            }
            out.extend_from_slice(&line);
        }
        out
    }
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_bmp(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// A solid-color 24-bit BMP written to `dir/name`.
pub fn write_solid_bmp(dir: &Path, name: &str, width: u32, height: u32, color: Rgb) -> PathBuf {
    let bytes = BmpBuilder::new(width, height, 24).fill(color).build();
    write_bmp(dir, name, &bytes)
}
