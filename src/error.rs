use std::path::PathBuf;

use bead_pattern::{PaletteError, PatternError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error(transparent)]
    Palette(#[from] PaletteError),

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("{boards} boards of {board_dimension} beads exceed the maximum image size")]
    BoardsTooLarge { boards: u32, board_dimension: u32 },

    #[error("Usage report error: {0}")]
    Report(#[from] serde_json::Error),

    #[error("bead names were not collected, cannot write instructions")]
    MissingBeadNames,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_names_path() {
        let error = AppError::Write {
            path: PathBuf::from("out.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "failed to write out.png: denied");
    }

    #[test]
    fn test_palette_error_is_transparent() {
        let error: AppError = PaletteError::Empty.into();
        assert_eq!(error.to_string(), PaletteError::Empty.to_string());
    }

    #[test]
    fn test_unsupported_dimensions() {
        let error = AppError::UnsupportedDimensions {
            width: 0,
            height: 7,
        };
        assert_eq!(error.to_string(), "Unsupported dimensions: 0x7");
    }

    #[test]
    fn test_boards_too_large() {
        let error = AppError::BoardsTooLarge {
            boards: 200_000_000,
            board_dimension: 29,
        };
        assert_eq!(
            error.to_string(),
            "200000000 boards of 29 beads exceed the maximum image size"
        );
    }

    #[test]
    fn test_from_pattern_error() {
        let error: AppError = PatternError::WorkerPanicked { failed: 2 }.into();
        match error {
            AppError::Pattern(_) => {}
            _ => panic!("Expected Pattern variant"),
        }
    }
}
