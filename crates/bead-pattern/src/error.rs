//! Unified error type for the bead-pattern public API.

use thiserror::Error;

use crate::palette::PaletteError;

/// Everything that can stop a pattern run.
///
/// Per-pixel matching itself cannot fail; errors come from the palette
/// (before any work is dispatched), from inconsistent input, or from a
/// worker thread dying.
#[derive(Debug, Error)]
pub enum PatternError {
    /// Palette unreadable, malformed or empty after filtering
    #[error(transparent)]
    Palette(#[from] PaletteError),

    /// The pixel buffer does not match the stated dimensions
    #[error("pixel buffer holds {actual} pixels, expected {width}x{height}")]
    DimensionMismatch { width: u32, height: u32, actual: usize },

    /// The output raster dimensions do not fit in memory addressing
    #[error("a {width}x{height} pattern at scale {scale} is too large to render")]
    TooLarge { width: u32, height: u32, scale: u32 },

    /// At least one worker panicked; the partial output was discarded
    #[error("{failed} pixel worker(s) panicked")]
    WorkerPanicked { failed: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_error_is_transparent() {
        let error: PatternError = PaletteError::Empty.into();
        assert_eq!(error.to_string(), PaletteError::Empty.to_string());
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let error = PatternError::DimensionMismatch {
            width: 2,
            height: 3,
            actual: 5,
        };
        assert_eq!(error.to_string(), "pixel buffer holds 5 pixels, expected 2x3");
    }

    #[test]
    fn test_too_large_message() {
        let error = PatternError::TooLarge {
            width: 4,
            height: 0,
            scale: 8,
        };
        assert_eq!(error.to_string(), "a 4x0 pattern at scale 8 is too large to render");
    }
}
