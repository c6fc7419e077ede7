//! Cross-checks the scanline decoder against the `image` crate's BMP decoder.

mod common;

use bmp_rank::bmp::{Limits, decode_pixels, read_header};
use image::ImageFormat;

/// Decode with both decoders and compare every pixel.
fn assert_matches_reference(bytes: &[u8]) {
    let header = read_header(bytes).unwrap();
    let ours = decode_pixels(bytes, &header, &Limits::default()).unwrap();
    let reference = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)
        .unwrap()
        .to_rgb8();

    assert_eq!(ours.width(), reference.width());
    assert_eq!(ours.height(), reference.height());
    for (x, y, px) in reference.enumerate_pixels() {
        let ours_px = ours.get(x, y).unwrap();
        assert_eq!(
            [ours_px.r, ours_px.g, ours_px.b],
            px.0,
            "pixel ({x}, {y}) differs"
        );
    }
}

#[test]
fn bottom_up_24_bit_with_padding() {
    // width 3 → 9 bytes per row, padded to 12
    let bytes = common::encode_bmp(3, 4, 24, false, &common::gradient(3, 4));
    assert_matches_reference(&bytes);
}

#[test]
fn top_down_24_bit() {
    let bytes = common::encode_bmp(5, 3, 24, true, &common::gradient(5, 3));
    assert_matches_reference(&bytes);
}

#[test]
fn bottom_up_32_bit() {
    let bytes = common::encode_bmp(5, 3, 32, false, &common::gradient(5, 3));
    assert_matches_reference(&bytes);
}

#[test]
fn top_down_32_bit() {
    let bytes = common::encode_bmp(4, 2, 32, true, &common::gradient(4, 2));
    assert_matches_reference(&bytes);
}

#[test]
fn single_pixel() {
    let bytes = common::encode_bmp(1, 1, 24, false, &[(12, 34, 56)]);
    assert_matches_reference(&bytes);
}

#[test]
fn wide_single_row() {
    let bytes = common::encode_bmp(33, 1, 24, false, &common::gradient(33, 1));
    assert_matches_reference(&bytes);
}

#[test]
fn tall_single_column() {
    let bytes = common::encode_bmp(1, 17, 24, false, &common::gradient(1, 17));
    assert_matches_reference(&bytes);
}
