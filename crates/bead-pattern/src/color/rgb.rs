//! 8-bit sRGB color type

use std::fmt;

/// An 8-bit sRGB color.
///
/// This is the representation of source pixels, palette swatches and output
/// pixels. It is a plain value type and is used as the key of the match
/// caches, so it derives `Eq` and `Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Create a color from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color as an `[R, G, B]` array.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// The color as fully opaque `[R, G, B, A]`.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Uppercase `#RRGGBB` notation, as used in HTML attributes.
    ///
    /// ```
    /// use bead_pattern::color::Rgb;
    /// assert_eq!(Rgb::new(225, 225, 225).to_hex(), "#E1E1E1");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    #[inline]
    fn from(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<[u8; 4]> for Rgb {
    /// Drops the alpha channel.
    #[inline]
    fn from(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_is_opaque() {
        assert_eq!(Rgb::new(1, 2, 3).to_rgba(), [1, 2, 3, 255]);
    }

    #[test]
    fn test_from_rgba_drops_alpha() {
        assert_eq!(Rgb::from([10, 20, 30, 0]), Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb::new(0, 0, 0).to_hex(), "#000000");
        assert_eq!(Rgb::new(255, 0, 171).to_hex(), "#FF00AB");
    }
}
