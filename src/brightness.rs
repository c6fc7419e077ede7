//! Perceived brightness.
//!
//! Each pixel is reduced to luma with the ITU-R BT.601 weights, on raw
//! 0–255 channel values (no gamma linearization):
//!
//! ```text
//! luma = 0.299 * R + 0.587 * G + 0.114 * B
//! ```
//!
//! Image brightness is the mean luma over every pixel of the grid, so the
//! result is in `0.0..=255.0`.

use crate::bmp::{PixelGrid, Rgb};
use thiserror::Error;

const RED_WEIGHT: f64 = 0.299;
const GREEN_WEIGHT: f64 = 0.587;
const BLUE_WEIGHT: f64 = 0.114;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("image has no pixels ({width}x{height})")]
pub struct DegenerateImage {
    pub width: u32,
    pub height: u32,
}

/// BT.601 luma of a single pixel.
pub fn luma(pixel: Rgb) -> f64 {
    RED_WEIGHT * f64::from(pixel.r)
        + GREEN_WEIGHT * f64::from(pixel.g)
        + BLUE_WEIGHT * f64::from(pixel.b)
}

/// Mean luma over the whole grid.
pub fn compute_brightness(grid: &PixelGrid) -> Result<f64, DegenerateImage> {
    if grid.is_empty() {
        return Err(DegenerateImage {
            width: grid.width(),
            height: grid.height(),
        });
    }
    let total: f64 = grid.pixels().iter().map(|&p| luma(p)).sum();
    Ok(total / grid.pixel_count() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn white_is_full_brightness() {
        let grid = PixelGrid::filled(4, 3, Rgb::new(255, 255, 255));
        assert_close(compute_brightness(&grid).unwrap(), 255.0);
    }

    #[test]
    fn black_is_zero() {
        let grid = PixelGrid::filled(4, 3, Rgb::new(0, 0, 0));
        assert_eq!(compute_brightness(&grid).unwrap(), 0.0);
    }

    #[test]
    fn pure_red_uses_red_weight() {
        let grid = PixelGrid::filled(2, 2, Rgb::new(255, 0, 0));
        assert_close(compute_brightness(&grid).unwrap(), 0.299 * 255.0);
        assert_close(compute_brightness(&grid).unwrap(), 76.245);
    }

    #[test]
    fn green_outweighs_red_and_blue() {
        let green = luma(Rgb::new(0, 255, 0));
        let red = luma(Rgb::new(255, 0, 0));
        let blue = luma(Rgb::new(0, 0, 255));
        assert!(green > red && red > blue);
    }

    #[test]
    fn average_covers_every_pixel() {
        // Half black, half white
        let black = Rgb::new(0, 0, 0);
        let white = Rgb::new(255, 255, 255);
        let grid = PixelGrid::new(2, 2, vec![black, white, white, black]).unwrap();
        assert_close(compute_brightness(&grid).unwrap(), 127.5);
    }

    #[test]
    fn empty_grid_is_degenerate() {
        let err = compute_brightness(&PixelGrid::filled(0, 5, Rgb::default())).unwrap_err();
        assert_eq!(
            err,
            DegenerateImage {
                width: 0,
                height: 5
            }
        );
    }
}
