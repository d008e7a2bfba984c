//! Output raster and the bead-style block pattern.

use crate::color::Rgb;

/// Edge length in output pixels of one bead in bead style.
pub const BEAD_SIZE: u32 = 8;

/// Light grey drawn at the corners and the hole of every bead block.
pub const BEAD_FILL: Rgb = Rgb::new(225, 225, 225);

/// Whether a texel of an 8x8 bead block shows the fill color.
///
/// The four corners and the 2x2 center are fill; the other 60 texels
/// carry the bead color.
///
/// ```text
/// F . . . . . . F
/// . . . . . . . .
/// . . . . . . . .
/// . . . F F . . .
/// . . . F F . . .
/// . . . . . . . .
/// . . . . . . . .
/// F . . . . . . F
/// ```
#[inline]
pub fn is_fill_texel(x: u32, y: u32) -> bool {
    (x % 7 == 0 && y % 7 == 0) || ((3..5).contains(&x) && (3..5).contains(&y))
}

/// RGBA8 output image, row-major, always fully opaque.
///
/// # Example
///
/// ```
/// use bead_pattern::pipeline::BeadRaster;
///
/// let raster = BeadRaster::new(2, 1);
/// assert_eq!(raster.as_raw().len(), 2 * 1 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeadRaster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BeadRaster {
    /// Whether a `width` x `height` RGBA8 buffer is addressable.
    pub(crate) fn fits(width: u32, height: u32) -> bool {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|texels| texels.checked_mul(4))
            .is_some()
    }

    /// Allocate a black, opaque raster.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let data = std::iter::repeat([0, 0, 0, 255])
            .take(len)
            .flatten()
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA of the pixel at (`x`, `y`).
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} raster",
            self.width,
            self.height
        );
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]
    }

    /// Color of the pixel at (`x`, `y`), alpha dropped.
    pub fn rgb(&self, x: u32, y: u32) -> Rgb {
        Rgb::from(self.pixel(x, y))
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Disjoint mutable bands of `rows` output rows each, top to bottom.
    ///
    /// Each band can be handed to a different worker; no two bands overlap,
    /// so writes need no locking.
    pub(crate) fn bands_mut(&mut self, rows: u32) -> std::slice::ChunksMut<'_, u8> {
        let band_len = (self.width as usize * rows as usize * 4).max(1);
        self.data.chunks_mut(band_len)
    }
}

/// Writes one input pixel's bead color into a band of output rows.
///
/// `band` holds the output rows produced by one input row, `band_width` is
/// the output width in pixels and `x` the input column.
pub(crate) fn paint(band: &mut [u8], band_width: u32, x: u32, rgb: Rgb, bead_style: bool) {
    let stride = band_width as usize * 4;
    let color = rgb.to_rgba();

    if !bead_style {
        let offset = x as usize * 4;
        band[offset..offset + 4].copy_from_slice(&color);
        return;
    }

    let fill = BEAD_FILL.to_rgba();
    for ty in 0..BEAD_SIZE {
        let row = &mut band[ty as usize * stride..(ty as usize + 1) * stride];
        for tx in 0..BEAD_SIZE {
            let offset = ((x * BEAD_SIZE + tx) * 4) as usize;
            let texel = if is_fill_texel(tx, ty) { &fill } else { &color };
            row[offset..offset + 4].copy_from_slice(texel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_pattern_has_eight_fill_texels() {
        let fill: Vec<(u32, u32)> = (0..BEAD_SIZE)
            .flat_map(|y| (0..BEAD_SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| is_fill_texel(x, y))
            .collect();
        assert_eq!(
            fill,
            vec![(0, 0), (7, 0), (3, 3), (4, 3), (3, 4), (4, 4), (0, 7), (7, 7)]
        );
    }

    #[test]
    fn test_new_raster_is_opaque_black() {
        let raster = BeadRaster::new(3, 2);
        assert_eq!(raster.width(), 3);
        assert_eq!(raster.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(raster.pixel(x, y), [0, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn test_paint_plain_pixel() {
        let mut raster = BeadRaster::new(3, 1);
        let band = raster.bands_mut(1).next().unwrap();
        paint(band, 3, 1, Rgb::new(9, 8, 7), false);
        assert_eq!(raster.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(raster.pixel(1, 0), [9, 8, 7, 255]);
        assert_eq!(raster.pixel(2, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_paint_bead_block() {
        let mut raster = BeadRaster::new(16, 8);
        let band = raster.bands_mut(BEAD_SIZE).next().unwrap();
        paint(band, 16, 1, Rgb::new(255, 0, 0), true);

        // left block untouched
        assert_eq!(raster.rgb(1, 1), Rgb::new(0, 0, 0));
        // right block painted
        assert_eq!(raster.rgb(8, 0), BEAD_FILL);
        assert_eq!(raster.rgb(15, 7), BEAD_FILL);
        assert_eq!(raster.rgb(11, 3), BEAD_FILL);
        assert_eq!(raster.rgb(9, 1), Rgb::new(255, 0, 0));
        assert_eq!(raster.rgb(10, 3), Rgb::new(255, 0, 0));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_pixel_out_of_bounds() {
        BeadRaster::new(1, 1).pixel(1, 0);
    }
}
