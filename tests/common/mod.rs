//! Fixture writer shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Encode an uncompressed BMP. `pixels` are (r, g, b), top row first.
///
/// Same byte layout as `BmpBuilder::build` in `src/test_helpers.rs` (54-byte
/// header, `BI_RGB`, BGR(X) rows padded to 4 bytes); keep the two in step.
/// Integration tests cannot reach that `#[cfg(test)]` module.
pub fn encode_bmp(width: u32, height: u32, depth: u16, top_down: bool, pixels: &[(u8, u8, u8)]) -> Vec<u8> {
    assert_eq!(pixels.len(), (width * height) as usize);
    let bytes_per_pixel = (depth / 8) as usize;
    let stride = (width as usize * depth as usize).div_ceil(32) * 4;
    let total = 54 + stride * height as usize;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    let stored_height = if top_down {
        -(height as i32)
    } else {
        height as i32
    };
    out.extend_from_slice(&stored_height.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&depth.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&((stride * height as usize) as u32).to_le_bytes());
    out.extend_from_slice(&[0; 16]);

    let rows: Vec<usize> = if top_down {
        (0..height as usize).collect()
    } else {
        (0..height as usize).rev().collect()
    };
    for y in rows {
        let mut line = vec![0u8; stride];
        for x in 0..width as usize {
            let (r, g, b) = pixels[y * width as usize + x];
            let at = x * bytes_per_pixel;
            line[at] = b;
            line[at + 1] = g;
            line[at + 2] = r;
            if bytes_per_pixel == 4 {
                line[at + 3] = 0xFF;
            }
        }
        out.extend_from_slice(&line);
    }
    out
}

/// A solid 24-bit image.
pub fn solid(width: u32, height: u32, color: (u8, u8, u8)) -> Vec<u8> {
    encode_bmp(width, height, 24, false, &vec![color; (width * height) as usize])
}

/// A deterministic pattern with every pixel distinct in at least one channel.
pub fn gradient(width: u32, height: u32) -> Vec<(u8, u8, u8)> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 17) as u8, (y * 29) as u8, ((x + y) * 7) as u8)))
        .collect()
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, bytes).unwrap();
    path
}
