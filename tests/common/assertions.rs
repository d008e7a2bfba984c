//! Assertion helpers for tests.

use std::path::Path;

use image::RgbaImage;
use pretty_assertions::assert_eq;

/// Assert the file is a PNG and decode it.
pub fn assert_png(path: &Path) -> RgbaImage {
    let bytes = std::fs::read(path).expect("Failed to read output");
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    image::load_from_memory(&bytes)
        .expect("Failed to decode PNG")
        .to_rgba8()
}

/// Assert the opaque RGB color of one pixel.
pub fn assert_rgb_at(image: &RgbaImage, x: u32, y: u32, expected: [u8; 3]) {
    let [r, g, b, a] = image.get_pixel(x, y).0;
    assert_eq!(([r, g, b], a), (expected, 255), "pixel ({x}, {y})");
}
