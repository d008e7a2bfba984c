//! Image preparation before bead matching.

use bead_pattern::Rgb;
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

use crate::models::FilterOptions;

/// Apply the enabled filters in a fixed order: greyscale, blur, sharpen,
/// gamma, contrast, brightness.
pub fn apply_filters(mut image: DynamicImage, filters: &FilterOptions) -> RgbaImage {
    if filters.greyscale {
        image = image.grayscale();
    }
    if filters.blur > 0.0 {
        image = image.blur(filters.blur);
    }
    if filters.sharpen > 0.0 {
        image = image.unsharpen(filters.sharpen, 0);
    }

    let mut rgba = image.to_rgba8();
    if filters.gamma > 0.0 {
        apply_lut(&mut rgba, &gamma_lut(filters.gamma));
    }
    if filters.contrast != 0.0 {
        apply_lut(&mut rgba, &contrast_lut(filters.contrast));
    }
    if filters.brightness != 0.0 {
        apply_lut(&mut rgba, &brightness_lut(filters.brightness));
    }

    if !filters.is_identity() {
        tracing::debug!(?filters, "Image filters applied");
    }
    rgba
}

/// Lanczos3 resample to exactly `width` x `height`.
pub fn resize(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    image::imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Row-major pixel colors, alpha dropped.
pub fn to_rgb_pixels(image: &RgbaImage) -> Vec<Rgb> {
    image.pixels().map(|pixel| Rgb::from(pixel.0)).collect()
}

type Lut = [u8; 256];

fn build_lut(f: impl Fn(f64) -> f64) -> Lut {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = f(i as f64).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// `255 * (v / 255) ^ (1 / gamma)`
fn gamma_lut(gamma: f32) -> Lut {
    let exponent = 1.0 / f64::from(gamma).max(0.0001);
    build_lut(|v| 255.0 * (v / 255.0).powf(exponent))
}

/// Stretch around mid-grey by `(100 + percent) / 100`.
fn contrast_lut(percent: f32) -> Lut {
    let factor = (100.0 + f64::from(percent.clamp(-100.0, 100.0))) / 100.0;
    build_lut(|v| ((v / 255.0 - 0.5) * factor + 0.5) * 255.0)
}

/// Shift by `percent` of the full range.
fn brightness_lut(percent: f32) -> Lut {
    let shift = 255.0 * f64::from(percent.clamp(-100.0, 100.0)) / 100.0;
    build_lut(|v| v + shift)
}

fn apply_lut(image: &mut RgbaImage, lut: &Lut) {
    for pixel in image.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = lut[*channel as usize];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_identity_filters_keep_pixels() {
        let out = apply_filters(solid(3, 2, [10, 20, 30, 255]), &FilterOptions::default());
        assert_eq!(out.dimensions(), (3, 2));
        assert!(out.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn test_greyscale_equalizes_channels() {
        let filters = FilterOptions {
            greyscale: true,
            ..Default::default()
        };
        let out = apply_filters(solid(1, 1, [200, 40, 90, 255]), &filters);
        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 255);
    }

    #[test]
    fn test_gamma_lut() {
        let lut = gamma_lut(1.0);
        assert!(lut.iter().enumerate().all(|(i, &v)| v as usize == i));

        let bright = gamma_lut(2.0);
        assert_eq!(bright[0], 0);
        assert_eq!(bright[255], 255);
        assert!(bright[64] > 64);
    }

    #[test]
    fn test_contrast_lut() {
        let flat = contrast_lut(-100.0);
        assert!(flat.iter().all(|&v| v == 128));

        let steep = contrast_lut(100.0);
        assert_eq!(steep[0], 0);
        assert_eq!(steep[255], 255);
        assert!(steep[100] < 100);
        assert!(steep[160] > 160);
    }

    #[test]
    fn test_brightness_lut() {
        assert_eq!(brightness_lut(100.0)[0], 255);
        assert_eq!(brightness_lut(-100.0)[255], 0);
        assert_eq!(brightness_lut(10.0)[100], 126);
    }

    #[test]
    fn test_brightness_leaves_alpha() {
        let filters = FilterOptions {
            brightness: 50.0,
            ..Default::default()
        };
        let out = apply_filters(solid(1, 1, [0, 0, 0, 77]), &filters);
        assert_eq!(out.get_pixel(0, 0).0, [128, 128, 128, 77]);
    }

    #[test]
    fn test_resize_dimensions() {
        let image = RgbaImage::from_pixel(40, 20, Rgba([9, 9, 9, 255]));
        let out = resize(&image, 10, 5);
        assert_eq!(out.dimensions(), (10, 5));
    }

    #[test]
    fn test_to_rgb_pixels_row_major() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, Rgba([1, 2, 3, 4]));
        assert_eq!(
            to_rgb_pixels(&image),
            vec![Rgb::new(0, 0, 0), Rgb::new(1, 2, 3)]
        );
    }
}
